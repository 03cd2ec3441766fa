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

//! Grammar event notifications.
//!
//! Production machines report every completed grammar piece to a
//! [`ParseListener`]. Events arrive in document order. A listener may reject
//! an event by returning an error; the engine stamps the current position on
//! it and fails exactly as it would for a grammar violation.
//!
//! # Examples
//!
//! ```
//! use sipxml_core::{ParseEvent, PushParser, RecordingListener};
//!
//! let mut parser = PushParser::new(RecordingListener::default());
//! parser.feed_str("<a x='1'>hi</a>").unwrap();
//! parser.finish().unwrap();
//!
//! let events = parser.into_listener().into_events();
//! assert_eq!(events[0], ParseEvent::ElementName("a".into()));
//! assert_eq!(events.last(), Some(&ParseEvent::EndElement));
//! ```

use crate::error::XmlResult;

/// Receiver of production events.
pub trait ParseListener {
    /// A start tag name was read.
    fn push_element_name(&mut self, name: &str) -> XmlResult<()>;

    /// An attribute name was read; `quote` is the delimiter of its value.
    fn push_attribute_name(&mut self, name: &str, quote: char) -> XmlResult<()>;

    /// A run of literal attribute value text.
    fn push_attribute_text(&mut self, text: &str) -> XmlResult<()>;

    /// An `&name;` reference inside an attribute value.
    fn push_attribute_entity_ref(&mut self, name: &str) -> XmlResult<()>;

    /// A `&#n;` or `&#xh;` reference inside an attribute value.
    fn push_attribute_char_ref(&mut self, code_point: char) -> XmlResult<()>;

    /// The `>` of a start tag that has content.
    fn push_close_start_tag(&mut self) -> XmlResult<()>;

    /// A run of character data.
    fn push_text(&mut self, text: &str) -> XmlResult<()>;

    /// A character reference in content.
    fn push_char_ref(&mut self, code_point: char) -> XmlResult<()>;

    /// An entity reference in content.
    fn push_entity_ref(&mut self, name: &str) -> XmlResult<()>;

    /// The `/>` of an empty-element tag.
    fn push_close_empty_element(&mut self) -> XmlResult<()>;

    /// A matching end tag.
    fn push_end_element(&mut self) -> XmlResult<()>;

    /// A complete comment; `text` excludes the delimiters.
    fn push_comment(&mut self, text: &str) -> XmlResult<()>;

    /// A document type declaration without internal subset.
    fn push_doctype(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> XmlResult<()>;

    /// The XML declaration.
    fn push_xml_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<bool>,
    ) -> XmlResult<()>;

    /// A fatal error. No further events follow.
    fn push_parse_error(&mut self, line: usize, column: usize, message: &str);
}

/// One recorded listener call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    ElementName(String),
    AttributeName { name: String, quote: char },
    AttributeText(String),
    AttributeEntityRef(String),
    AttributeCharRef(char),
    CloseStartTag,
    Text(String),
    CharRef(char),
    EntityRef(String),
    CloseEmptyElement,
    EndElement,
    Comment(String),
    DocType {
        name: String,
        public_id: Option<String>,
        system_id: Option<String>,
    },
    XmlDeclaration {
        version: String,
        encoding: Option<String>,
        standalone: Option<bool>,
    },
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Listener that keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    events: Vec<ParseEvent>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ParseEvent> {
        self.events
    }

    /// Removes and returns the events recorded so far.
    pub fn drain(&mut self) -> Vec<ParseEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, event: ParseEvent) -> XmlResult<()> {
        self.events.push(event);
        Ok(())
    }
}

impl ParseListener for RecordingListener {
    fn push_element_name(&mut self, name: &str) -> XmlResult<()> {
        self.record(ParseEvent::ElementName(name.to_string()))
    }

    fn push_attribute_name(&mut self, name: &str, quote: char) -> XmlResult<()> {
        self.record(ParseEvent::AttributeName {
            name: name.to_string(),
            quote,
        })
    }

    fn push_attribute_text(&mut self, text: &str) -> XmlResult<()> {
        self.record(ParseEvent::AttributeText(text.to_string()))
    }

    fn push_attribute_entity_ref(&mut self, name: &str) -> XmlResult<()> {
        self.record(ParseEvent::AttributeEntityRef(name.to_string()))
    }

    fn push_attribute_char_ref(&mut self, code_point: char) -> XmlResult<()> {
        self.record(ParseEvent::AttributeCharRef(code_point))
    }

    fn push_close_start_tag(&mut self) -> XmlResult<()> {
        self.record(ParseEvent::CloseStartTag)
    }

    fn push_text(&mut self, text: &str) -> XmlResult<()> {
        self.record(ParseEvent::Text(text.to_string()))
    }

    fn push_char_ref(&mut self, code_point: char) -> XmlResult<()> {
        self.record(ParseEvent::CharRef(code_point))
    }

    fn push_entity_ref(&mut self, name: &str) -> XmlResult<()> {
        self.record(ParseEvent::EntityRef(name.to_string()))
    }

    fn push_close_empty_element(&mut self) -> XmlResult<()> {
        self.record(ParseEvent::CloseEmptyElement)
    }

    fn push_end_element(&mut self) -> XmlResult<()> {
        self.record(ParseEvent::EndElement)
    }

    fn push_comment(&mut self, text: &str) -> XmlResult<()> {
        self.record(ParseEvent::Comment(text.to_string()))
    }

    fn push_doctype(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> XmlResult<()> {
        self.record(ParseEvent::DocType {
            name: name.to_string(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.map(str::to_string),
        })
    }

    fn push_xml_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<bool>,
    ) -> XmlResult<()> {
        self.record(ParseEvent::XmlDeclaration {
            version: version.to_string(),
            encoding: encoding.map(str::to_string),
            standalone,
        })
    }

    fn push_parse_error(&mut self, line: usize, column: usize, message: &str) {
        self.events.push(ParseEvent::ParseError {
            line,
            column,
            message: message.to_string(),
        });
    }
}

impl std::fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElementName(name) => write!(f, "ElementName {}", name),
            Self::AttributeName { name, quote } => {
                write!(f, "AttributeName {} (quote {})", name, quote)
            }
            Self::AttributeText(text) => write!(f, "AttributeText {:?}", text),
            Self::AttributeEntityRef(name) => write!(f, "AttributeEntityRef {}", name),
            Self::AttributeCharRef(c) => write!(f, "AttributeCharRef U+{:04X}", *c as u32),
            Self::CloseStartTag => write!(f, "CloseStartTag"),
            Self::Text(text) => write!(f, "Text {:?}", text),
            Self::CharRef(c) => write!(f, "CharRef U+{:04X}", *c as u32),
            Self::EntityRef(name) => write!(f, "EntityRef {}", name),
            Self::CloseEmptyElement => write!(f, "CloseEmptyElement"),
            Self::EndElement => write!(f, "EndElement"),
            Self::Comment(text) => write!(f, "Comment {:?}", text),
            Self::DocType {
                name,
                public_id,
                system_id,
            } => {
                write!(f, "DocType {}", name)?;
                if let Some(public_id) = public_id {
                    write!(f, " PUBLIC {:?}", public_id)?;
                }
                if let Some(system_id) = system_id {
                    write!(f, " SYSTEM {:?}", system_id)?;
                }
                Ok(())
            }
            Self::XmlDeclaration {
                version,
                encoding,
                standalone,
            } => {
                write!(f, "XmlDeclaration version={}", version)?;
                if let Some(encoding) = encoding {
                    write!(f, " encoding={}", encoding)?;
                }
                if let Some(standalone) = standalone {
                    write!(f, " standalone={}", if *standalone { "yes" } else { "no" })?;
                }
                Ok(())
            }
            Self::ParseError {
                line,
                column,
                message,
            } => write!(f, "ParseError {}:{} {}", line, column, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_listener_records_in_order() {
        let mut listener = RecordingListener::new();
        listener.push_element_name("a").unwrap();
        listener.push_attribute_name("x", '\'').unwrap();
        listener.push_attribute_text("1").unwrap();
        listener.push_close_empty_element().unwrap();

        assert_eq!(
            listener.events(),
            &[
                ParseEvent::ElementName("a".into()),
                ParseEvent::AttributeName {
                    name: "x".into(),
                    quote: '\''
                },
                ParseEvent::AttributeText("1".into()),
                ParseEvent::CloseEmptyElement,
            ]
        );
    }

    #[test]
    fn test_drain_empties_listener() {
        let mut listener = RecordingListener::new();
        listener.push_text("hi").unwrap();
        assert_eq!(listener.drain(), vec![ParseEvent::Text("hi".into())]);
        assert!(listener.events().is_empty());
    }

    #[test]
    fn test_parse_error_recorded() {
        let mut listener = RecordingListener::new();
        listener.push_parse_error(2, 5, "boom");
        assert_eq!(
            listener.into_events(),
            vec![ParseEvent::ParseError {
                line: 2,
                column: 5,
                message: "boom".into()
            }]
        );
    }

    // ==================== Display tests ====================

    #[test]
    fn test_display_char_ref() {
        assert_eq!(ParseEvent::CharRef('A').to_string(), "CharRef U+0041");
    }

    #[test]
    fn test_display_doctype() {
        let event = ParseEvent::DocType {
            name: "html".into(),
            public_id: Some("-//x".into()),
            system_id: Some("x.dtd".into()),
        };
        assert_eq!(
            event.to_string(),
            "DocType html PUBLIC \"-//x\" SYSTEM \"x.dtd\""
        );
    }

    #[test]
    fn test_display_xml_declaration() {
        let event = ParseEvent::XmlDeclaration {
            version: "1.0".into(),
            encoding: Some("UTF-8".into()),
            standalone: Some(true),
        };
        assert_eq!(
            event.to_string(),
            "XmlDeclaration version=1.0 encoding=UTF-8 standalone=yes"
        );
    }
}
