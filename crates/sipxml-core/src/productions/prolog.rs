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

//! `document ::= prolog element`, up to the start of the root element.
//!
//! The prolog is the bottom of every engine stack. When it sees the root
//! element's start tag it hands over to [`ElementParser`] and leaves the
//! stack, so the stack empties exactly when the root element closes.
//!
//! A byte order mark as the very first character is skipped.

use super::{
    CommentParser, Context, DocTypeParser, ElementParser, ParseAction, XmlDeclarationParser,
};
use crate::chars::is_whitespace;
use crate::error::{XmlError, XmlResult};

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Start,
    LeftAngle,
    Question,
    QuestionX,
    QuestionXm,
    Bang,
    Done,
}

#[derive(Debug, Clone)]
pub struct PrologParser {
    mode: Mode,
    first_char: bool,
    at_document_start: bool,
    saw_doctype: bool,
}

impl Default for PrologParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PrologParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Start,
            first_char: true,
            at_document_start: true,
            saw_doctype: false,
        }
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        if std::mem::replace(&mut self.first_char, false) && c == BYTE_ORDER_MARK {
            return Ok(ParseAction::Continue);
        }
        match self.mode {
            Mode::Start => {
                if is_whitespace(c) {
                    self.at_document_start = false;
                    return Ok(ParseAction::Continue);
                }
                if c != '<' {
                    return Err(XmlError::expected('<', c));
                }
                self.mode = Mode::LeftAngle;
                Ok(ParseAction::Continue)
            }
            Mode::LeftAngle => match c {
                '?' => {
                    self.mode = Mode::Question;
                    Ok(ParseAction::Continue)
                }
                '!' => {
                    self.mode = Mode::Bang;
                    Ok(ParseAction::Continue)
                }
                _ => {
                    // Root element: it replaces the prolog on the stack.
                    ctx.delegate(ElementParser::new(), &['<', c]);
                    self.mode = Mode::Done;
                    Ok(ParseAction::LastCharacter)
                }
            },
            Mode::Question => self.match_xml_target(c, 'x', Mode::QuestionX),
            Mode::QuestionX => self.match_xml_target(c, 'm', Mode::QuestionXm),
            Mode::QuestionXm => {
                if c != 'l' {
                    return Err(XmlError::not_implemented("processing instructions"));
                }
                if !self.at_document_start {
                    return Err(XmlError::syntax(
                        "the XML declaration is only allowed at the start of the document",
                    ));
                }
                ctx.delegate(XmlDeclarationParser::new(), &['<', '?', 'x', 'm', 'l']);
                self.item_started();
                Ok(ParseAction::Continue)
            }
            Mode::Bang => {
                if c == '-' {
                    ctx.delegate(CommentParser::new(), &['<', '!', '-']);
                } else if self.saw_doctype {
                    return Err(XmlError::syntax(
                        "encountered a second document type declaration",
                    ));
                } else {
                    self.saw_doctype = true;
                    ctx.delegate(DocTypeParser::new(), &['<', '!', c]);
                }
                self.item_started();
                Ok(ParseAction::Continue)
            }
            Mode::Done => Ok(ParseAction::End),
        }
    }

    fn match_xml_target(&mut self, c: char, expected: char, next: Mode) -> XmlResult<ParseAction> {
        if c != expected {
            return Err(XmlError::not_implemented("processing instructions"));
        }
        self.mode = next;
        Ok(ParseAction::Continue)
    }

    fn item_started(&mut self) {
        self.at_document_start = false;
        self.mode = Mode::Start;
    }
}
