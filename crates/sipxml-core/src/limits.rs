// sipxml - Incremental XML Pull Parser
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Resource limits for incremental parsing.

/// Configurable limits for parser security.
///
/// These limits bound the memory a hostile document can make the parser
/// hold: element nesting, name and text buffers, and attribute lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth (default: 256).
    pub max_depth: usize,
    /// Maximum length of a name in characters (default: 1024).
    pub max_name_length: usize,
    /// Maximum length of a single text run, comment or attribute value in
    /// characters (default: 10M).
    pub max_text_length: usize,
    /// Maximum number of attributes on one element (default: 1024).
    pub max_attributes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_name_length: 1024,
            max_text_length: 10 * 1024 * 1024, // 10M chars
            max_attributes: 1024,
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_name_length: usize::MAX,
            max_text_length: usize::MAX,
            max_attributes: usize::MAX,
        }
    }
}
