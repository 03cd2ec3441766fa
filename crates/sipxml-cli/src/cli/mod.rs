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

//! CLI command definitions and argument parsing.

use crate::commands;
use clap::Subcommand;

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use sipxml_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Check that an XML file is well-formed
    ///
    /// Streams the file line by line through the parser and prints a summary
    /// of what was read.
    Validate {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Print one line per node
    ///
    /// Each line shows the node kind, depth, name, namespace, value and
    /// attributes, indented by depth.
    Nodes {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Number of characters fed to the parser at a time
        #[arg(long, default_value_t = 8192)]
        chunk_size: usize,
    },

    /// Print the parser's listener events (debug)
    Events {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Print the document element as an indented tree
    Tree {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` with a printable message if the file cannot be read or
    /// is not well-formed.
    pub fn execute(self) -> Result<(), String> {
        match self {
            Commands::Validate { file } => commands::validate(&file),
            Commands::Nodes { file, chunk_size } => commands::nodes(&file, chunk_size),
            Commands::Events { file } => commands::events(&file),
            Commands::Tree { file } => commands::tree(&file),
        }
    }
}
