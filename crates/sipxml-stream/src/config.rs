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

//! Reader configuration.

use sipxml_core::Limits;

/// Configuration for [`XmlReader`](crate::XmlReader) and
/// [`XmlStreamReader`](crate::XmlStreamReader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Parser resource limits.
    pub limits: Limits,

    /// Number of characters fed to the parser at a time when a whole string
    /// is available.
    ///
    /// Nodes become readable as soon as the chunk that completes them has been
    /// fed, so smaller chunks lower latency at the cost of more locking.
    ///
    /// Default: 8192 characters
    pub chunk_size: usize,

    /// Buffer size for reading input.
    ///
    /// Default: 64KB
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            chunk_size: 8 * 1024,
            buffer_size: 64 * 1024,
        }
    }
}

impl ReaderConfig {
    /// Configuration with no resource limits (for testing and trusted input).
    pub fn unlimited() -> Self {
        Self {
            limits: Limits::unlimited(),
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.limits, Limits::default());
        assert_eq!(config.chunk_size, 8192);
        assert_eq!(config.buffer_size, 65536);
    }

    #[test]
    fn test_unlimited() {
        let config = ReaderConfig::unlimited();
        assert_eq!(config.limits.max_depth, usize::MAX);
        assert_eq!(config.chunk_size, 8192);
    }

    #[test]
    fn test_chunk_size_never_zero() {
        assert_eq!(ReaderConfig::default().with_chunk_size(0).chunk_size, 1);
        assert_eq!(ReaderConfig::default().with_chunk_size(16).chunk_size, 16);
    }
}
