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

//! Events command - raw grammar engine events

use super::read_file;
use colored::Colorize;
use sipxml_core::{ParseEvent, PushParser, RecordingListener};

/// Print the listener events the grammar engine emits for a file.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or is not well-formed. The
/// events up to and including the parse error are printed first.
pub fn events(file: &str) -> Result<(), String> {
    let content = read_file(file)?;

    let mut parser = PushParser::new(RecordingListener::new());
    let result = parser.feed_str(&content).and_then(|_| parser.finish());

    for event in parser.into_listener().into_events() {
        match event {
            ParseEvent::ParseError { .. } => println!("{}", event.to_string().red()),
            _ => println!("{}", event),
        }
    }
    result.map_err(|e| e.to_string())
}
