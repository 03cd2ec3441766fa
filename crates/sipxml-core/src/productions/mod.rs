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

//! Grammar production state machines.
//!
//! Each machine implements one XML production and consumes exactly one
//! character per call, answering with a [`ParseAction`]:
//!
//! | Action          | Character consumed | Production complete |
//! |-----------------|--------------------|---------------------|
//! | `Continue`      | yes                | no                  |
//! | `End`           | no                 | yes                 |
//! | `LastCharacter` | yes                | yes                 |
//!
//! A machine hands a sub-production to the engine with
//! [`Context::delegate`]. The engine pushes the new machine on top of the
//! stack once the current call returns and replays the given characters into
//! it. When the delegating machine returns `LastCharacter` in the same call it
//! is popped first, so the sub-production replaces it.
//!
//! `Name` is not a stack production: the machines that need a name embed a
//! [`NameParser`] and drive it directly.

mod attribute;
mod comment;
mod content;
mod doctype;
mod element;
mod misc;
mod name;
mod prolog;
mod reference;
mod xml_decl;

pub use attribute::AttributeParser;
pub use comment::CommentParser;
pub use content::ElementContentParser;
pub use doctype::DocTypeParser;
pub use element::ElementParser;
pub use misc::MiscParser;
pub use name::NameParser;
pub use prolog::PrologParser;
pub use reference::{ReferenceContext, ReferenceParser};
pub use xml_decl::XmlDeclarationParser;

use crate::error::{XmlError, XmlResult};
use crate::limits::Limits;
use crate::listener::ParseListener;
use smallvec::SmallVec;

/// Outcome of offering one character to a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAction {
    /// Character consumed; the production needs more input.
    Continue,
    /// Production complete; the character was not consumed and must be
    /// offered to the enclosing production.
    End,
    /// Production complete; the character was its last one.
    LastCharacter,
}

/// A pending sub-production and the characters to replay into it.
#[derive(Debug)]
pub(crate) struct Delegation {
    pub(crate) production: Production,
    pub(crate) replay: SmallVec<[char; 4]>,
}

/// What a production can reach while it handles a character.
pub struct Context<'a> {
    listener: &'a mut (dyn ParseListener + 'a),
    limits: &'a Limits,
    delegations: &'a mut Vec<Delegation>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        listener: &'a mut (dyn ParseListener + 'a),
        limits: &'a Limits,
        delegations: &'a mut Vec<Delegation>,
    ) -> Self {
        Self {
            listener,
            limits,
            delegations,
        }
    }

    /// The event listener.
    pub fn listener(&mut self) -> &mut (dyn ParseListener + 'a) {
        &mut *self.listener
    }

    /// The resource limits in force.
    pub fn limits(&self) -> &Limits {
        self.limits
    }

    /// Asks the engine to push `production` and replay `replay` into it.
    pub fn delegate(&mut self, production: impl Into<Production>, replay: &[char]) {
        self.delegations.push(Delegation {
            production: production.into(),
            replay: SmallVec::from_slice(replay),
        });
    }
}

/// A production that can live on the engine stack.
#[derive(Debug)]
pub enum Production {
    Prolog(PrologParser),
    XmlDeclaration(XmlDeclarationParser),
    DocType(DocTypeParser),
    Comment(CommentParser),
    Element(ElementParser),
    ElementContent(ElementContentParser),
    Attribute(AttributeParser),
    Reference(ReferenceParser),
    Misc(MiscParser),
}

impl Production {
    /// Offers one character to the machine.
    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self {
            Self::Prolog(p) => p.parse_char(c, ctx),
            Self::XmlDeclaration(p) => p.parse_char(c, ctx),
            Self::DocType(p) => p.parse_char(c, ctx),
            Self::Comment(p) => p.parse_char(c, ctx),
            Self::Element(p) => p.parse_char(c, ctx),
            Self::ElementContent(p) => p.parse_char(c, ctx),
            Self::Attribute(p) => p.parse_char(c, ctx),
            Self::Reference(p) => p.parse_char(c, ctx),
            Self::Misc(p) => p.parse_char(c, ctx),
        }
    }

    /// Grammar name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prolog(_) => "prolog",
            Self::XmlDeclaration(_) => "XMLDecl",
            Self::DocType(_) => "doctypedecl",
            Self::Comment(_) => "Comment",
            Self::Element(_) => "element",
            Self::ElementContent(_) => "content",
            Self::Attribute(_) => "Attribute",
            Self::Reference(_) => "Reference",
            Self::Misc(_) => "Misc",
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

macro_rules! impl_from_parser {
    ($($variant:ident => $parser:ty),* $(,)?) => {
        $(
            impl From<$parser> for Production {
                fn from(parser: $parser) -> Self {
                    Self::$variant(parser)
                }
            }
        )*
    };
}

impl_from_parser! {
    Prolog => PrologParser,
    XmlDeclaration => XmlDeclarationParser,
    DocType => DocTypeParser,
    Comment => CommentParser,
    Element => ElementParser,
    ElementContent => ElementContentParser,
    Attribute => AttributeParser,
    Reference => ReferenceParser,
    Misc => MiscParser,
}

/// Matches a fixed literal such as `<!DOCTYPE` one character at a time.
#[derive(Debug, Clone)]
pub(crate) struct Keyword {
    text: &'static str,
    matched: usize,
}

impl Keyword {
    pub(crate) const fn new(text: &'static str) -> Self {
        Self { text, matched: 0 }
    }

    /// Returns `true` once the whole literal has been matched.
    pub(crate) fn accept(&mut self, c: char) -> XmlResult<bool> {
        match self.text[self.matched..].chars().next() {
            Some(expected) if expected == c => {
                self.matched += c.len_utf8();
                Ok(self.is_complete())
            }
            Some(expected) => Err(XmlError::expected(expected, c)),
            None => Ok(true),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.matched == self.text.len()
    }
}

/// Line-end normalization: CR and CRLF become a single LF.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LineBreaks {
    after_cr: bool,
}

impl LineBreaks {
    /// Returns the normalized character, or `None` for the LF of a CRLF pair.
    pub(crate) fn accept(&mut self, c: char) -> Option<char> {
        let after_cr = std::mem::replace(&mut self.after_cr, c == '\r');
        match c {
            '\r' => Some('\n'),
            '\n' if after_cr => None,
            other => Some(other),
        }
    }
}

/// Appends `c` to a text buffer, enforcing the text length limit.
pub(crate) fn push_text_char(
    buffer: &mut String,
    len: &mut usize,
    c: char,
    limits: &Limits,
) -> XmlResult<()> {
    if *len >= limits.max_text_length {
        return Err(XmlError::limit(format!(
            "text exceeds the maximum length of {} characters",
            limits.max_text_length
        )));
    }
    buffer.push(c);
    *len += 1;
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Production;
    use crate::engine::PushParser;
    use crate::error::XmlResult;
    use crate::limits::Limits;
    use crate::listener::{ParseEvent, RecordingListener};

    /// Runs one production from an empty stack over `input`.
    pub(crate) fn run(
        production: impl Into<Production>,
        input: &str,
    ) -> (Vec<ParseEvent>, XmlResult<bool>) {
        run_with_limits(production, input, Limits::default())
    }

    pub(crate) fn run_with_limits(
        production: impl Into<Production>,
        input: &str,
        limits: Limits,
    ) -> (Vec<ParseEvent>, XmlResult<bool>) {
        let mut parser =
            PushParser::starting_with(RecordingListener::new(), limits, production.into());
        let result = parser.feed_str(input);
        let events = parser
            .into_listener()
            .into_events()
            .into_iter()
            .filter(|e| !matches!(e, ParseEvent::ParseError { .. }))
            .collect();
        (events, result)
    }
}
