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

//! `Comment ::= '<!--' ((Char - '-') | ('-' (Char - '-')))* '-->'`

use super::{push_text_char, Context, Keyword, LineBreaks, ParseAction};
use crate::error::{XmlError, XmlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Open,
    Body,
    Dash,
    DoubleDash,
    Done,
}

/// Parses a comment from its opening `<` to the closing `>`.
#[derive(Debug, Clone)]
pub struct CommentParser {
    mode: Mode,
    open: Keyword,
    text: String,
    text_len: usize,
    line_breaks: LineBreaks,
}

impl Default for CommentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Open,
            open: Keyword::new("<!--"),
            text: String::new(),
            text_len: 0,
            line_breaks: LineBreaks::default(),
        }
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Open => {
                if self.open.accept(c)? {
                    self.mode = Mode::Body;
                }
                Ok(ParseAction::Continue)
            }
            Mode::Body => {
                if c == '-' {
                    self.mode = Mode::Dash;
                } else {
                    self.append(c, ctx)?;
                }
                Ok(ParseAction::Continue)
            }
            Mode::Dash => {
                if c == '-' {
                    self.mode = Mode::DoubleDash;
                } else {
                    self.append('-', ctx)?;
                    self.append(c, ctx)?;
                    self.mode = Mode::Body;
                }
                Ok(ParseAction::Continue)
            }
            Mode::DoubleDash => {
                if c != '>' {
                    return Err(XmlError::syntax("'--' is not allowed inside a comment"));
                }
                ctx.listener().push_comment(&self.text)?;
                self.mode = Mode::Done;
                Ok(ParseAction::LastCharacter)
            }
            Mode::Done => Ok(ParseAction::End),
        }
    }

    fn append(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<()> {
        match self.line_breaks.accept(c) {
            Some(c) => push_text_char(&mut self.text, &mut self.text_len, c, ctx.limits()),
            None => Ok(()),
        }
    }
}
