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

//! sipxml Command Line Interface

use clap::Parser;
use sipxml_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// sipxml - incremental XML pull parser
///
/// Parses XML one character at a time and reports nodes, raw parser events
/// or element trees.
///
/// # Examples
///
/// ```bash
/// # Check that a document is well-formed
/// sipxml validate catalog.xml
///
/// # Print one line per node, feeding 64 characters at a time
/// sipxml nodes catalog.xml --chunk-size 64
///
/// # Show the parser's listener events
/// sipxml events catalog.xml
/// ```
#[derive(Parser)]
#[command(name = "sipxml")]
#[command(author, version, about = "sipxml - incremental XML pull parser", long_about = None)]
struct Cli {
    /// Log parser lifecycle events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "sipxml=debug,sipxml_core=debug,sipxml_stream=debug,sipxml_cli=debug"
    } else {
        "sipxml=warn,sipxml_core=warn,sipxml_stream=warn,sipxml_cli=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
