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

//! `XMLDecl ::= '<?xml' VersionInfo EncodingDecl? SDDecl? S? '?>'`
//!
//! The pseudo-attributes must appear in that order, each preceded by
//! whitespace. The version value is reported as written.

use super::{Context, Keyword, ParseAction};
use crate::chars::{
    is_encoding_char, is_encoding_start_char, is_name_char, is_version_char, is_whitespace,
};
use crate::error::{XmlError, XmlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pseudo {
    Version,
    Encoding,
    Standalone,
}

impl Pseudo {
    fn keyword(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Encoding => "encoding",
            Self::Standalone => "standalone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Open,
    BeforeVersion,
    PseudoName(Pseudo),
    BeforeEq(Pseudo),
    AfterEq(Pseudo),
    Value(Pseudo),
    AfterValue,
    BetweenPseudo,
    QuestionMark,
    Done,
}

/// Parses the XML declaration from its opening `<`.
#[derive(Debug, Clone)]
pub struct XmlDeclarationParser {
    mode: Mode,
    keyword: Keyword,
    saw_whitespace: bool,
    quote: char,
    value: String,
    version: Option<String>,
    encoding: Option<String>,
    standalone: Option<bool>,
}

impl Default for XmlDeclarationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlDeclarationParser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Open,
            keyword: Keyword::new("<?xml"),
            saw_whitespace: false,
            quote: '"',
            value: String::new(),
            version: None,
            encoding: None,
            standalone: None,
        }
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Open => {
                if self.keyword.accept(c)? {
                    self.mode = Mode::BeforeVersion;
                }
                Ok(ParseAction::Continue)
            }
            Mode::BeforeVersion => {
                if is_whitespace(c) {
                    self.saw_whitespace = true;
                    return Ok(ParseAction::Continue);
                }
                if !self.saw_whitespace {
                    // `<?xml-stylesheet ...?>` and friends
                    if is_name_char(c) {
                        return Err(XmlError::not_implemented("processing instructions"));
                    }
                    return Err(XmlError::expected_whitespace(c, "XML declaration"));
                }
                if c != 'v' {
                    return Err(XmlError::syntax(
                        "the XML declaration must start with a version",
                    ));
                }
                self.start_pseudo(Pseudo::Version, c)
            }
            Mode::PseudoName(pseudo) => {
                if self.keyword.accept(c)? {
                    self.mode = Mode::BeforeEq(pseudo);
                }
                Ok(ParseAction::Continue)
            }
            Mode::BeforeEq(pseudo) => match c {
                '=' => {
                    self.mode = Mode::AfterEq(pseudo);
                    Ok(ParseAction::Continue)
                }
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::expected('=', c)),
            },
            Mode::AfterEq(pseudo) => match c {
                '"' | '\'' => {
                    self.quote = c;
                    self.value.clear();
                    self.mode = Mode::Value(pseudo);
                    Ok(ParseAction::Continue)
                }
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::expected_quote(c)),
            },
            Mode::Value(pseudo) => {
                if c == self.quote {
                    self.store(pseudo)?;
                    self.mode = Mode::AfterValue;
                    return Ok(ParseAction::Continue);
                }
                self.check_value_char(pseudo, c)?;
                self.value.push(c);
                Ok(ParseAction::Continue)
            }
            Mode::AfterValue => match c {
                '?' => {
                    self.mode = Mode::QuestionMark;
                    Ok(ParseAction::Continue)
                }
                _ if is_whitespace(c) => {
                    self.mode = Mode::BetweenPseudo;
                    Ok(ParseAction::Continue)
                }
                _ => Err(XmlError::expected_whitespace(c, "XML declaration")),
            },
            Mode::BetweenPseudo => match c {
                '?' => {
                    self.mode = Mode::QuestionMark;
                    Ok(ParseAction::Continue)
                }
                'e' if self.encoding.is_none() && self.standalone.is_none() => {
                    self.start_pseudo(Pseudo::Encoding, c)
                }
                's' if self.standalone.is_none() => self.start_pseudo(Pseudo::Standalone, c),
                _ if is_whitespace(c) => Ok(ParseAction::Continue),
                _ => Err(XmlError::unexpected(c, "XML declaration")),
            },
            Mode::QuestionMark => {
                if c != '>' {
                    return Err(XmlError::expected('>', c));
                }
                let version = self.version.as_deref().unwrap_or_default();
                ctx.listener()
                    .push_xml_declaration(version, self.encoding.as_deref(), self.standalone)?;
                self.mode = Mode::Done;
                Ok(ParseAction::LastCharacter)
            }
            Mode::Done => Ok(ParseAction::End),
        }
    }

    fn start_pseudo(&mut self, pseudo: Pseudo, c: char) -> XmlResult<ParseAction> {
        self.keyword = Keyword::new(pseudo.keyword());
        self.keyword.accept(c)?;
        self.mode = Mode::PseudoName(pseudo);
        Ok(ParseAction::Continue)
    }

    fn check_value_char(&self, pseudo: Pseudo, c: char) -> XmlResult<()> {
        let ok = match pseudo {
            Pseudo::Version => is_version_char(c),
            Pseudo::Encoding if self.value.is_empty() => is_encoding_start_char(c),
            Pseudo::Encoding => is_encoding_char(c),
            Pseudo::Standalone => {
                let mut candidate = self.value.clone();
                candidate.push(c);
                "yes".starts_with(&candidate) || "no".starts_with(&candidate)
            }
        };
        if ok {
            Ok(())
        } else {
            let context = match pseudo {
                Pseudo::Version => "version number",
                Pseudo::Encoding => "encoding name",
                Pseudo::Standalone => "standalone declaration",
            };
            Err(XmlError::unexpected(c, context))
        }
    }

    fn store(&mut self, pseudo: Pseudo) -> XmlResult<()> {
        let value = std::mem::take(&mut self.value);
        match pseudo {
            Pseudo::Version if value.is_empty() => {
                Err(XmlError::syntax("the XML declaration version is empty"))
            }
            Pseudo::Version => {
                self.version = Some(value);
                Ok(())
            }
            Pseudo::Encoding if value.is_empty() => {
                Err(XmlError::syntax("the XML declaration encoding is empty"))
            }
            Pseudo::Encoding => {
                self.encoding = Some(value);
                Ok(())
            }
            Pseudo::Standalone => {
                self.standalone = match value.as_str() {
                    "yes" => Some(true),
                    "no" => Some(false),
                    _ => {
                        return Err(XmlError::syntax(
                            "standalone must be either 'yes' or 'no'",
                        ))
                    }
                };
                Ok(())
            }
        }
    }
}
