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

//! Nodes command - one line per pull-reader node

use super::read_file;
use sipxml_stream::{ReaderConfig, XmlReader};

/// Print every node of a file, indented by depth.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or is not well-formed. Nodes
/// read before the error have already been printed.
pub fn nodes(file: &str, chunk_size: usize) -> Result<(), String> {
    let content = read_file(file)?;
    let config = ReaderConfig::default().with_chunk_size(chunk_size);
    let mut reader = XmlReader::from_str(&content, config);

    while reader.read().map_err(|e| e.to_string())? {
        if let Some(node) = reader.node() {
            println!("{}{}", "  ".repeat(node.depth()), node);
        }
    }
    Ok(())
}
