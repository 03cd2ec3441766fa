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

//! `doctypedecl ::= '<!DOCTYPE' S Name (S ExternalID)? S? '>'`
//!
//! Internal subsets (`[ ... ]`) are not supported.

use super::{Context, Keyword, NameParser, ParseAction};
use crate::chars::{is_pubid_char, is_whitespace};
use crate::error::{XmlError, XmlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    Public,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Open,
    AfterKeyword,
    BeforeName,
    Name,
    AfterName,
    ExternalKeyword(Literal),
    AfterExternalKeyword(Literal),
    BeforeLiteral(Literal),
    InLiteral(Literal),
    AfterPublicLiteral,
    Done,
}

/// Parses a document type declaration from its opening `<`.
#[derive(Debug, Clone)]
pub struct DocTypeParser {
    mode: Mode,
    keyword: Keyword,
    name: NameParser,
    root: String,
    quote: char,
    literal: String,
    public_id: Option<String>,
    system_id: Option<String>,
}

impl Default for DocTypeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocTypeParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Open,
            keyword: Keyword::new("<!DOCTYPE"),
            name: NameParser::new(),
            root: String::new(),
            quote: '"',
            literal: String::new(),
            public_id: None,
            system_id: None,
        }
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Open => {
                if self.keyword.accept(c)? {
                    self.mode = Mode::AfterKeyword;
                }
                Ok(ParseAction::Continue)
            }
            Mode::AfterKeyword => {
                if !is_whitespace(c) {
                    return Err(XmlError::expected_whitespace(c, "document type declaration"));
                }
                self.mode = Mode::BeforeName;
                Ok(ParseAction::Continue)
            }
            Mode::BeforeName => {
                if is_whitespace(c) {
                    return Ok(ParseAction::Continue);
                }
                self.mode = Mode::Name;
                self.name.parse_char(c, ctx.limits())
            }
            Mode::Name => match self.name.parse_char(c, ctx.limits())? {
                ParseAction::Continue => Ok(ParseAction::Continue),
                _ => {
                    if !is_whitespace(c) && c != '>' {
                        return Err(XmlError::unexpected(c, "document type declaration"));
                    }
                    self.root = self.name.take();
                    self.mode = Mode::AfterName;
                    self.parse_char(c, ctx)
                }
            },
            Mode::AfterName => match c {
                '>' => self.finish(ctx),
                '[' => Err(XmlError::not_implemented("internal DTD subsets")),
                'P' if self.no_external_id() => self.start_keyword(Literal::Public, c),
                'S' if self.no_external_id() => self.start_keyword(Literal::System, c),
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::unexpected(c, "document type declaration")),
            },
            Mode::ExternalKeyword(kind) => {
                if self.keyword.accept(c)? {
                    self.mode = Mode::AfterExternalKeyword(kind);
                }
                Ok(ParseAction::Continue)
            }
            Mode::AfterExternalKeyword(kind) => {
                if !is_whitespace(c) {
                    return Err(XmlError::expected_whitespace(c, "external identifier"));
                }
                self.mode = Mode::BeforeLiteral(kind);
                Ok(ParseAction::Continue)
            }
            Mode::BeforeLiteral(kind) => match c {
                '"' | '\'' => {
                    self.quote = c;
                    self.literal.clear();
                    self.mode = Mode::InLiteral(kind);
                    Ok(ParseAction::Continue)
                }
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::expected_quote(c)),
            },
            Mode::InLiteral(kind) => {
                if c == self.quote {
                    let literal = std::mem::take(&mut self.literal);
                    match kind {
                        Literal::Public => {
                            self.public_id = Some(literal);
                            self.mode = Mode::AfterPublicLiteral;
                        }
                        Literal::System => {
                            self.system_id = Some(literal);
                            self.mode = Mode::AfterName;
                        }
                    }
                    return Ok(ParseAction::Continue);
                }
                if kind == Literal::Public && !is_pubid_char(c) {
                    return Err(XmlError::unexpected(c, "public identifier"));
                }
                self.literal.push(c);
                Ok(ParseAction::Continue)
            }
            Mode::AfterPublicLiteral => {
                if !is_whitespace(c) {
                    return Err(XmlError::expected_whitespace(c, "external identifier"));
                }
                self.mode = Mode::BeforeLiteral(Literal::System);
                Ok(ParseAction::Continue)
            }
            Mode::Done => Ok(ParseAction::End),
        }
    }

    fn no_external_id(&self) -> bool {
        self.public_id.is_none() && self.system_id.is_none()
    }

    fn start_keyword(&mut self, kind: Literal, c: char) -> XmlResult<ParseAction> {
        self.keyword = Keyword::new(match kind {
            Literal::Public => "PUBLIC",
            Literal::System => "SYSTEM",
        });
        self.keyword.accept(c)?;
        self.mode = Mode::ExternalKeyword(kind);
        Ok(ParseAction::Continue)
    }

    fn finish(&mut self, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        ctx.listener().push_doctype(
            &self.root,
            self.public_id.as_deref(),
            self.system_id.as_deref(),
        )?;
        self.mode = Mode::Done;
        Ok(ParseAction::LastCharacter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XmlErrorKind;
    use crate::listener::ParseEvent;
    use crate::productions::testing::run;

    fn doctype(name: &str, public_id: Option<&str>, system_id: Option<&str>) -> ParseEvent {
        ParseEvent::DocType {
            name: name.into(),
            public_id: public_id.map(Into::into),
            system_id: system_id.map(Into::into),
        }
    }

    // ==================== Accepted declarations ====================

    #[test]
    fn test_name_only() {
        let (events, result) = run(DocTypeParser::new(), "<!DOCTYPE html>");
        assert!(!result.unwrap());
        assert_eq!(events, vec![doctype("html", None, None)]);
    }

    #[test]
    fn test_trailing_whitespace() {
        let (events, _) = run(DocTypeParser::new(), "<!DOCTYPE  note \n>");
        assert_eq!(events, vec![doctype("note", None, None)]);
    }

    #[test]
    fn test_system_id() {
        let (events, _) = run(DocTypeParser::new(), "<!DOCTYPE note SYSTEM \"note.dtd\">");
        assert_eq!(events, vec![doctype("note", None, Some("note.dtd"))]);
    }

    #[test]
    fn test_public_id() {
        let (events, _) = run(
            DocTypeParser::new(),
            "<!DOCTYPE html PUBLIC '-//W3C//DTD XHTML 1.0 Strict//EN' \
             'http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd'>",
        );
        assert_eq!(
            events,
            vec![doctype(
                "html",
                Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
                Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd")
            )]
        );
    }

    // ==================== Rejected declarations ====================

    #[test]
    fn test_internal_subset_not_implemented() {
        let (_, result) = run(DocTypeParser::new(), "<!DOCTYPE a [");
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::NotImplemented);
    }

    #[test]
    fn test_bad_pubid_char() {
        let (_, result) = run(DocTypeParser::new(), "<!DOCTYPE a PUBLIC \"{\"");
        assert_eq!(
            result.unwrap_err().message,
            "unexpected character '{' in public identifier"
        );
    }

    #[test]
    fn test_public_requires_system_literal() {
        let (_, result) = run(DocTypeParser::new(), "<!DOCTYPE a PUBLIC \"x\">");
        assert_eq!(
            result.unwrap_err().message,
            "expected whitespace in external identifier but found '>'"
        );
    }

    #[test]
    fn test_misspelled_keyword() {
        let (_, result) = run(DocTypeParser::new(), "<!DOCTYPO");
        assert_eq!(result.unwrap_err().message, "expected 'E' but found 'O'");
    }

    #[test]
    fn test_keyword_needs_whitespace() {
        let (_, result) = run(DocTypeParser::new(), "<!DOCTYPEa>");
        assert!(result.is_err());
    }

    #[test]
    fn test_second_external_id_rejected() {
        let (_, result) = run(DocTypeParser::new(), "<!DOCTYPE a SYSTEM 'x' SYSTEM 'y'>");
        assert_eq!(
            result.unwrap_err().message,
            "unexpected character 'S' in document type declaration"
        );
    }
}
