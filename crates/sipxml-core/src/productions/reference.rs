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

//! `Reference ::= EntityRef | CharRef`
//!
//! Recognizes `&name;`, `&#digits;` and `&#xhex;`. The same machine serves
//! element content and attribute values; only the listener method it reports
//! to differs.

use super::{Context, NameParser, ParseAction};
use crate::chars::{is_decimal_digit, is_hex_digit, is_xml_char};
use crate::error::{XmlError, XmlResult};

/// Where a reference appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceContext {
    Text,
    Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ampersand,
    AfterAmpersand,
    Name,
    Hash,
    Decimal,
    HexStart,
    Hex,
    Done,
}

#[derive(Debug, Clone)]
pub struct ReferenceParser {
    context: ReferenceContext,
    mode: Mode,
    name: NameParser,
    code_point: u32,
}

impl ReferenceParser {
    pub fn new(context: ReferenceContext) -> Self {
        Self {
            context,
            mode: Mode::Ampersand,
            name: NameParser::new(),
            code_point: 0,
        }
    }

    pub fn text() -> Self {
        Self::new(ReferenceContext::Text)
    }

    pub fn attribute() -> Self {
        Self::new(ReferenceContext::Attribute)
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Ampersand => {
                if c != '&' {
                    return Err(XmlError::expected('&', c));
                }
                self.mode = Mode::AfterAmpersand;
                Ok(ParseAction::Continue)
            }
            Mode::AfterAmpersand => match c {
                '#' => {
                    self.mode = Mode::Hash;
                    Ok(ParseAction::Continue)
                }
                ';' => Err(XmlError::syntax("empty entity reference")),
                _ => {
                    self.mode = Mode::Name;
                    self.name.parse_char(c, ctx.limits())
                }
            },
            Mode::Name => match self.name.parse_char(c, ctx.limits())? {
                ParseAction::Continue => Ok(ParseAction::Continue),
                _ if c == ';' => {
                    let name = self.name.take();
                    match self.context {
                        ReferenceContext::Text => ctx.listener().push_entity_ref(&name)?,
                        ReferenceContext::Attribute => {
                            ctx.listener().push_attribute_entity_ref(&name)?
                        }
                    }
                    self.mode = Mode::Done;
                    Ok(ParseAction::LastCharacter)
                }
                _ => Err(XmlError::expected(';', c)),
            },
            Mode::Hash => match c {
                'x' => {
                    self.mode = Mode::HexStart;
                    Ok(ParseAction::Continue)
                }
                ';' => Err(XmlError::syntax("empty character reference")),
                _ if is_decimal_digit(c) => {
                    self.mode = Mode::Decimal;
                    self.accumulate(c, 10)
                }
                _ => Err(XmlError::unexpected(c, "character reference")),
            },
            Mode::Decimal => match c {
                ';' => self.finish(ctx),
                _ if is_decimal_digit(c) => self.accumulate(c, 10),
                _ => Err(XmlError::unexpected(c, "character reference")),
            },
            Mode::HexStart => match c {
                ';' => Err(XmlError::syntax("empty character reference")),
                _ if is_hex_digit(c) => {
                    self.mode = Mode::Hex;
                    self.accumulate(c, 16)
                }
                _ => Err(XmlError::unexpected(c, "character reference")),
            },
            Mode::Hex => match c {
                ';' => self.finish(ctx),
                _ if is_hex_digit(c) => self.accumulate(c, 16),
                _ => Err(XmlError::unexpected(c, "character reference")),
            },
            Mode::Done => Ok(ParseAction::End),
        }
    }

    fn accumulate(&mut self, c: char, radix: u32) -> XmlResult<ParseAction> {
        let digit = c.to_digit(radix).unwrap_or(0);
        self.code_point = self
            .code_point
            .checked_mul(radix)
            .and_then(|v| v.checked_add(digit))
            .filter(|v| *v <= 0x10FFFF)
            .ok_or_else(|| XmlError::syntax("character reference is out of range"))?;
        Ok(ParseAction::Continue)
    }

    fn finish(&mut self, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        let value = char::from_u32(self.code_point)
            .filter(|c| is_xml_char(*c))
            .ok_or_else(|| {
                XmlError::syntax(format!(
                    "character reference &#x{:X}; does not name a legal XML character",
                    self.code_point
                ))
            })?;
        match self.context {
            ReferenceContext::Text => ctx.listener().push_char_ref(value)?,
            ReferenceContext::Attribute => ctx.listener().push_attribute_char_ref(value)?,
        }
        self.mode = Mode::Done;
        Ok(ParseAction::LastCharacter)
    }
}
