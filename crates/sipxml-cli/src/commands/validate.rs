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

//! Validate command - well-formedness check

use colored::Colorize;
use sipxml_stream::{NodeKind, XmlStreamReader};
use std::fs::File;
use tracing::debug;

/// Check that an XML file is well-formed.
///
/// The file is streamed line by line, so it is never held in memory as a
/// whole and the size limit of [`read_file`](super::read_file) does not apply.
///
/// # Errors
///
/// Returns `Err` if the file cannot be opened or read, or is not well-formed.
///
/// # Output
///
/// Prints ✓ or ✗ with the file name, then the number of elements, the
/// deepest nesting level and the root element's name.
pub fn validate(file: &str) -> Result<(), String> {
    let source = File::open(file).map_err(|e| format!("Failed to open '{}': {}", file, e))?;

    let mut elements = 0usize;
    let mut max_depth = 0usize;
    let mut root = None;

    for node in XmlStreamReader::new(source) {
        let node = match node {
            Ok(node) => node,
            Err(e) => {
                println!("{} {}", "✗".red().bold(), file);
                return Err(e.to_string());
            }
        };
        if node.kind() == NodeKind::Element {
            elements += 1;
            max_depth = max_depth.max(node.depth());
            if root.is_none() {
                root = Some(node.name().to_string());
            }
        }
    }
    debug!("Validated '{}': {} elements", file, elements);

    println!("{} {}", "✓".green().bold(), file);
    println!("  Root: {}", root.unwrap_or_default());
    println!("  Elements: {}", elements);
    println!("  Max depth: {}", max_depth);
    Ok(())
}
