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

//! Tree command - document element as an indented tree

use super::read_file;
use sipxml_stream::{NodeKind, ReaderConfig, XmlReader};

/// Read the document element and everything inside it, then print it.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or is not well-formed.
pub fn tree(file: &str) -> Result<(), String> {
    let content = read_file(file)?;
    let mut reader = XmlReader::from_str(&content, ReaderConfig::default());

    match reader.move_to_content().map_err(|e| e.to_string())? {
        NodeKind::Element => {}
        _ => return Err(format!("'{}' has no document element", file)),
    }
    let tree = reader.read_subtree().map_err(|e| e.to_string())?;
    print!("{}", tree);

    // Trailing comments must still be well-formed.
    while reader.read().map_err(|e| e.to_string())? {}
    Ok(())
}
