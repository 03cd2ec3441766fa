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

//! `element ::= EmptyElemTag | STag content ETag`
//!
//! Attributes and content are delegated to their own productions. Content
//! ends by handing back the `/` of the end tag, whose `<` it has already
//! consumed.

use super::{AttributeParser, Context, ElementContentParser, NameParser, ParseAction};
use crate::chars::is_whitespace;
use crate::error::{XmlError, XmlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Open,
    Name,
    InTag,
    EmptyClose,
    EndTagSlash,
    EndName,
    AfterEndName,
    Done,
}

#[derive(Debug, Clone)]
pub struct ElementParser {
    mode: Mode,
    name: NameParser,
    start_name: String,
    saw_whitespace: bool,
}

impl Default for ElementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Open,
            name: NameParser::new(),
            start_name: String::new(),
            saw_whitespace: false,
        }
    }

    /// Name of the start tag, once read.
    pub fn start_name(&self) -> &str {
        &self.start_name
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Open => {
                if c != '<' {
                    return Err(XmlError::expected('<', c));
                }
                self.mode = Mode::Name;
                Ok(ParseAction::Continue)
            }
            Mode::Name => match self.name.parse_char(c, ctx.limits())? {
                ParseAction::Continue => Ok(ParseAction::Continue),
                _ => {
                    self.start_name = self.name.take();
                    ctx.listener().push_element_name(&self.start_name)?;
                    self.mode = Mode::InTag;
                    self.parse_char(c, ctx)
                }
            },
            Mode::InTag => match c {
                '/' => {
                    self.mode = Mode::EmptyClose;
                    Ok(ParseAction::Continue)
                }
                '>' => {
                    ctx.listener().push_close_start_tag()?;
                    ctx.delegate(ElementContentParser::new(), &[]);
                    self.mode = Mode::EndTagSlash;
                    Ok(ParseAction::Continue)
                }
                _ if is_whitespace(c) => {
                    self.saw_whitespace = true;
                    Ok(ParseAction::Continue)
                }
                _ if !self.saw_whitespace => Err(XmlError::expected_whitespace(c, "start tag")),
                _ => {
                    self.saw_whitespace = false;
                    ctx.delegate(AttributeParser::new(), &[c]);
                    Ok(ParseAction::Continue)
                }
            },
            Mode::EmptyClose => {
                if c != '>' {
                    return Err(XmlError::expected('>', c));
                }
                ctx.listener().push_close_empty_element()?;
                self.mode = Mode::Done;
                Ok(ParseAction::LastCharacter)
            }
            Mode::EndTagSlash => {
                if c != '/' {
                    return Err(XmlError::expected('/', c));
                }
                self.mode = Mode::EndName;
                Ok(ParseAction::Continue)
            }
            Mode::EndName => match self.name.parse_char(c, ctx.limits())? {
                ParseAction::Continue => Ok(ParseAction::Continue),
                _ => {
                    let end_name = self.name.take();
                    if end_name != self.start_name {
                        return Err(XmlError::syntax(format!(
                            "end tag name '{}' does not match start tag name '{}'",
                            end_name, self.start_name
                        )));
                    }
                    self.mode = Mode::AfterEndName;
                    self.parse_char(c, ctx)
                }
            },
            Mode::AfterEndName => match c {
                '>' => {
                    ctx.listener().push_end_element()?;
                    self.mode = Mode::Done;
                    Ok(ParseAction::LastCharacter)
                }
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::expected('>', c)),
            },
            Mode::Done => Ok(ParseAction::End),
        }
    }
}
