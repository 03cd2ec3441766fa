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

//! sipxml CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **validate**: stream a file through the parser and report whether it is
//!   well-formed
//! - **nodes**: print every node the pull reader produces
//! - **events**: print the raw listener events of the grammar engine
//! - **tree**: read the document element into a tree and print it
//!
//! # Examples
//!
//! ```no_run
//! use sipxml_cli::commands::{nodes, validate};
//!
//! # fn main() -> Result<(), String> {
//! validate("catalog.xml")?;
//! nodes("catalog.xml", 64)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! Commands that load a whole file refuse files larger than
//! `SIPXML_MAX_FILE_SIZE` bytes (1 GB by default).
//!
//! # Error Handling
//!
//! All commands return `Result<(), String>`. Parse errors carry their line
//! and column.

pub mod cli;
pub mod commands;
