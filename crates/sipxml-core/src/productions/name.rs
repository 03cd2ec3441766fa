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

//! `Name ::= NameStartChar (NameChar)*`

use super::ParseAction;
use crate::chars::{is_name_char, is_name_start_char};
use crate::error::{XmlError, XmlResult};
use crate::limits::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Start,
    Body,
    Done,
}

/// Accumulates one XML name.
///
/// Ends without consuming the first character that cannot continue the
/// name. The caller decides whether that character is legal.
#[derive(Debug, Clone)]
pub struct NameParser {
    mode: Mode,
    buffer: String,
    len: usize,
}

impl Default for NameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NameParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Start,
            buffer: String::new(),
            len: 0,
        }
    }

    pub fn parse_char(&mut self, c: char, limits: &Limits) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Start => {
                if !is_name_start_char(c) {
                    return Err(XmlError::unexpected(c, "name"));
                }
                self.mode = Mode::Body;
                self.append(c, limits)?;
                Ok(ParseAction::Continue)
            }
            Mode::Body => {
                if is_name_char(c) {
                    self.append(c, limits)?;
                    Ok(ParseAction::Continue)
                } else {
                    self.mode = Mode::Done;
                    Ok(ParseAction::End)
                }
            }
            Mode::Done => Ok(ParseAction::End),
        }
    }

    fn append(&mut self, c: char, limits: &Limits) -> XmlResult<()> {
        if self.len >= limits.max_name_length {
            return Err(XmlError::limit(format!(
                "name exceeds the maximum length of {} characters",
                limits.max_name_length
            )));
        }
        self.buffer.push(c);
        self.len += 1;
        Ok(())
    }

    /// Whether the name has ended.
    pub fn is_complete(&self) -> bool {
        self.mode == Mode::Done
    }

    /// The name read so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Takes the name and resets the parser for reuse.
    pub fn take(&mut self) -> String {
        self.mode = Mode::Start;
        self.len = 0;
        std::mem::take(&mut self.buffer)
    }
}
