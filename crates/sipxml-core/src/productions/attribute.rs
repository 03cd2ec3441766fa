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

//! `Attribute ::= Name Eq AttValue`

use super::{push_text_char, Context, LineBreaks, NameParser, ParseAction, ReferenceParser};
use crate::chars::is_whitespace;
use crate::error::{XmlError, XmlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Name,
    BeforeEq,
    AfterEq,
    Value,
    Reference,
    Done,
}

/// Parses one attribute, starting at the first character of its name and
/// ending on the closing quote.
#[derive(Debug, Clone)]
pub struct AttributeParser {
    mode: Mode,
    name: NameParser,
    quote: char,
    text: String,
    value_len: usize,
    line_breaks: LineBreaks,
    reference: ReferenceParser,
}

impl Default for AttributeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Name,
            name: NameParser::new(),
            quote: '"',
            text: String::new(),
            value_len: 0,
            line_breaks: LineBreaks::default(),
            reference: ReferenceParser::attribute(),
        }
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Name => match self.name.parse_char(c, ctx.limits())? {
                ParseAction::Continue => Ok(ParseAction::Continue),
                _ => {
                    self.mode = Mode::BeforeEq;
                    self.parse_char(c, ctx)
                }
            },
            Mode::BeforeEq => match c {
                '=' => {
                    self.mode = Mode::AfterEq;
                    Ok(ParseAction::Continue)
                }
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::expected('=', c)),
            },
            Mode::AfterEq => match c {
                '"' | '\'' => {
                    self.quote = c;
                    let name = self.name.take();
                    ctx.listener().push_attribute_name(&name, c)?;
                    self.mode = Mode::Value;
                    Ok(ParseAction::Continue)
                }
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::expected_quote(c)),
            },
            Mode::Value => {
                let Some(c) = self.line_breaks.accept(c) else {
                    return Ok(ParseAction::Continue);
                };
                if c == self.quote {
                    self.flush(ctx)?;
                    self.mode = Mode::Done;
                    return Ok(ParseAction::LastCharacter);
                }
                match c {
                    '<' => Err(XmlError::unexpected(c, "attribute value")),
                    '&' => {
                        self.flush(ctx)?;
                        self.reference = ReferenceParser::attribute();
                        self.reference.parse_char(c, ctx)?;
                        self.mode = Mode::Reference;
                        Ok(ParseAction::Continue)
                    }
                    _ => {
                        // The limit covers the whole value, not just one run.
                        push_text_char(&mut self.text, &mut self.value_len, c, ctx.limits())?;
                        Ok(ParseAction::Continue)
                    }
                }
            }
            Mode::Reference => {
                if self.reference.parse_char(c, ctx)? == ParseAction::LastCharacter {
                    self.mode = Mode::Value;
                }
                Ok(ParseAction::Continue)
            }
            Mode::Done => Ok(ParseAction::End),
        }
    }

    fn flush(&mut self, ctx: &mut Context<'_>) -> XmlResult<()> {
        if !self.text.is_empty() {
            ctx.listener().push_attribute_text(&self.text)?;
            self.text.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XmlErrorKind;
    use crate::limits::Limits;
    use crate::listener::ParseEvent;
    use crate::productions::testing::{run, run_with_limits};

    fn name(name: &str, quote: char) -> ParseEvent {
        ParseEvent::AttributeName {
            name: name.into(),
            quote,
        }
    }

    // ==================== Basic attribute tests ====================

    #[test]
    fn test_simple_attribute() {
        let (events, result) = run(AttributeParser::new(), "x='1'");
        assert!(!result.unwrap());
        assert_eq!(
            events,
            vec![name("x", '\''), ParseEvent::AttributeText("1".into())]
        );
    }

    #[test]
    fn test_whitespace_around_eq() {
        let (events, _) = run(AttributeParser::new(), "id \t= \"a b\"");
        assert_eq!(
            events,
            vec![name("id", '"'), ParseEvent::AttributeText("a b".into())]
        );
    }

    #[test]
    fn test_empty_value() {
        let (events, result) = run(AttributeParser::new(), "x=\"\"");
        assert!(result.is_ok());
        assert_eq!(events, vec![name("x", '"')]);
    }

    #[test]
    fn test_other_quote_is_literal() {
        let (events, _) = run(AttributeParser::new(), "x=\"it's\"");
        assert_eq!(
            events,
            vec![name("x", '"'), ParseEvent::AttributeText("it's".into())]
        );
    }

    // ==================== Reference tests ====================

    #[test]
    fn test_references_interleave_with_text() {
        let (events, _) = run(AttributeParser::new(), "v='a&amp;b&#65;&ent;c'");
        assert_eq!(
            events,
            vec![
                name("v", '\''),
                ParseEvent::AttributeText("a".into()),
                ParseEvent::AttributeEntityRef("amp".into()),
                ParseEvent::AttributeText("b".into()),
                ParseEvent::AttributeCharRef('A'),
                ParseEvent::AttributeEntityRef("ent".into()),
                ParseEvent::AttributeText("c".into()),
            ]
        );
    }

    // ==================== Normalization tests ====================

    #[test]
    fn test_line_breaks_normalized() {
        let (events, _) = run(AttributeParser::new(), "v='a\r\nb\rc'");
        assert_eq!(
            events,
            vec![name("v", '\''), ParseEvent::AttributeText("a\nb\nc".into())]
        );
    }

    // ==================== Error tests ====================

    #[test]
    fn test_lt_in_value() {
        let (_, result) = run(AttributeParser::new(), "v='a<b'");
        assert_eq!(
            result.unwrap_err().message,
            "unexpected character '<' in attribute value"
        );
    }

    #[test]
    fn test_missing_eq() {
        let (_, result) = run(AttributeParser::new(), "v 'a'");
        assert_eq!(result.unwrap_err().message, "expected '=' but found '\\''");
    }

    #[test]
    fn test_unquoted_value() {
        let (_, result) = run(AttributeParser::new(), "v=a");
        assert_eq!(
            result.unwrap_err().message,
            "expected a quote character but found 'a'"
        );
    }

    #[test]
    fn test_value_length_limit() {
        let limits = Limits {
            max_text_length: 3,
            ..Limits::default()
        };
        let (_, result) = run_with_limits(AttributeParser::new(), "v='ab&amp;cd'", limits);
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::Limit);
    }
}
