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

//! `content ::= CharData? ((element | Reference | Comment) CharData?)*`
//!
//! Runs until `</`, consuming the `<` and returning `End` on the `/` so the
//! enclosing element can read its end tag.

use super::{
    push_text_char, CommentParser, Context, ElementParser, LineBreaks, ParseAction,
    ReferenceParser,
};
use crate::error::{XmlError, XmlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    LeftAngle,
    Bang,
}

#[derive(Debug, Clone)]
pub struct ElementContentParser {
    mode: Mode,
    text: String,
    text_len: usize,
    line_breaks: LineBreaks,
}

impl Default for ElementContentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementContentParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Text,
            text: String::new(),
            text_len: 0,
            line_breaks: LineBreaks::default(),
        }
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Text => {
                let Some(c) = self.line_breaks.accept(c) else {
                    return Ok(ParseAction::Continue);
                };
                match c {
                    '<' => {
                        self.flush(ctx)?;
                        self.mode = Mode::LeftAngle;
                    }
                    '&' => {
                        self.flush(ctx)?;
                        ctx.delegate(ReferenceParser::text(), &['&']);
                    }
                    '>' if self.text.ends_with("]]") => {
                        return Err(XmlError::syntax("']]>' is not allowed in character data"));
                    }
                    _ => push_text_char(&mut self.text, &mut self.text_len, c, ctx.limits())?,
                }
                Ok(ParseAction::Continue)
            }
            Mode::LeftAngle => match c {
                '/' => {
                    self.mode = Mode::Text;
                    Ok(ParseAction::End)
                }
                '!' => {
                    self.mode = Mode::Bang;
                    Ok(ParseAction::Continue)
                }
                '?' => Err(XmlError::not_implemented("processing instructions")),
                _ => {
                    ctx.delegate(ElementParser::new(), &['<', c]);
                    self.mode = Mode::Text;
                    Ok(ParseAction::Continue)
                }
            },
            Mode::Bang => match c {
                '-' => {
                    ctx.delegate(CommentParser::new(), &['<', '!', '-']);
                    self.mode = Mode::Text;
                    Ok(ParseAction::Continue)
                }
                '[' => Err(XmlError::not_implemented("CDATA sections")),
                _ => Err(XmlError::unexpected(c, "element content")),
            },
        }
    }

    fn flush(&mut self, ctx: &mut Context<'_>) -> XmlResult<()> {
        if !self.text.is_empty() {
            ctx.listener().push_text(&self.text)?;
            self.text.clear();
            self.text_len = 0;
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

    #[test]
    fn test_text_flushed_at_markup() {
        let (events, result) = run(ElementContentParser::new(), "hello<");
        assert!(result.unwrap());
        assert_eq!(events, vec![ParseEvent::Text("hello".into())]);
    }

    #[test]
    fn test_references_split_text() {
        let (events, _) = run(ElementContentParser::new(), "a&lt;b&#65;<");
        assert_eq!(
            events,
            vec![
                ParseEvent::Text("a".into()),
                ParseEvent::EntityRef("lt".into()),
                ParseEvent::Text("b".into()),
                ParseEvent::CharRef('A'),
            ]
        );
    }

    #[test]
    fn test_end_tag_hands_back_slash() {
        let (events, result) = run(ElementContentParser::new(), "x</");
        assert_eq!(events, vec![ParseEvent::Text("x".into())]);
        // The slash reached an empty stack as document epilogue content.
        assert!(result.is_err());
    }

    #[test]
    fn test_child_element_and_comment() {
        let (events, _) = run(ElementContentParser::new(), "<b/><!--c-->t<");
        assert_eq!(
            events,
            vec![
                ParseEvent::ElementName("b".into()),
                ParseEvent::CloseEmptyElement,
                ParseEvent::Comment("c".into()),
                ParseEvent::Text("t".into()),
            ]
        );
    }

    #[test]
    fn test_line_breaks_normalized() {
        let (events, _) = run(ElementContentParser::new(), "a\r\nb\rc\n<");
        assert_eq!(events, vec![ParseEvent::Text("a\nb\nc\n".into())]);
    }

    #[test]
    fn test_brackets_allowed() {
        let (events, _) = run(ElementContentParser::new(), "a]]b]>c<");
        assert_eq!(events, vec![ParseEvent::Text("a]]b]>c".into())]);
    }

    // ==================== Error tests ====================

    #[test]
    fn test_cdata_close_rejected() {
        let (_, result) = run(ElementContentParser::new(), "a]]>");
        assert_eq!(
            result.unwrap_err().message,
            "']]>' is not allowed in character data"
        );
    }

    #[test]
    fn test_cdata_not_implemented() {
        let (_, result) = run(ElementContentParser::new(), "<![CDATA[");
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::NotImplemented);
    }

    #[test]
    fn test_pi_not_implemented() {
        let (_, result) = run(ElementContentParser::new(), "<?pi?>");
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::NotImplemented);
    }

    #[test]
    fn test_text_length_limit() {
        let limits = Limits {
            max_text_length: 4,
            ..Limits::default()
        };
        let (_, result) = run_with_limits(ElementContentParser::new(), "abcd<b/>efgh<", limits.clone());
        assert!(result.is_ok());

        let (_, result) = run_with_limits(ElementContentParser::new(), "abcde", limits);
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::Limit);
    }
}
