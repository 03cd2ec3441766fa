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

//! The parser stack engine.
//!
//! [`PushParser`] owns a stack of production machines and offers each input
//! character to the machine on top. Machines complete by returning
//! [`ParseAction::End`] or [`ParseAction::LastCharacter`] and start
//! sub-productions through [`Context::delegate`]. The engine tracks the
//! text position, checks every character against the XML `Char` production
//! and turns the first error into a permanent failure.
//!
//! Input may arrive in any split: one character at a time, in runs, or as a
//! whole document. The listener sees the same events either way.
//!
//! # Examples
//!
//! ```
//! use sipxml_core::{PushParser, RecordingListener};
//!
//! let mut parser = PushParser::new(RecordingListener::new());
//! assert!(parser.feed_str("<root>").unwrap());
//! assert!(!parser.feed_str("</root>").unwrap());
//! parser.finish().unwrap();
//! assert!(parser.is_complete());
//! ```

use crate::chars::{is_whitespace, is_xml_char};
use crate::error::{XmlError, XmlResult};
use crate::limits::Limits;
use crate::listener::ParseListener;
use crate::position::TextPosition;
use crate::productions::{
    Context, Delegation, MiscParser, ParseAction, Production, PrologParser,
};
use tracing::{debug, trace, warn};

/// Incremental, character-at-a-time XML parser.
#[derive(Debug)]
pub struct PushParser<L: ParseListener> {
    listener: L,
    limits: Limits,
    stack: Vec<Production>,
    delegations: Vec<Delegation>,
    position: TextPosition,
    open_elements: usize,
    complete: bool,
    failure: Option<XmlError>,
}

impl<L: ParseListener> PushParser<L> {
    /// Create a parser with default limits.
    pub fn new(listener: L) -> Self {
        Self::with_limits(listener, Limits::default())
    }

    /// Create a parser with the given limits.
    pub fn with_limits(listener: L, limits: Limits) -> Self {
        Self {
            listener,
            limits,
            stack: vec![Production::Prolog(PrologParser::new())],
            delegations: Vec::new(),
            position: TextPosition::start(),
            open_elements: 0,
            complete: false,
            failure: None,
        }
    }

    /// Create a parser whose stack starts with a single production.
    #[cfg(test)]
    pub(crate) fn starting_with(listener: L, limits: Limits, production: Production) -> Self {
        let mut parser = Self::with_limits(listener, limits);
        parser.stack.clear();
        parser.open_elements = usize::from(production.is_element());
        parser.stack.push(production);
        parser
    }

    /// Offer one character.
    ///
    /// Returns whether more input is expected: `false` once the document
    /// element has closed and the epilogue is at rest.
    pub fn feed(&mut self, c: char) -> XmlResult<bool> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.position.advance(c);

        let result = if is_xml_char(c) {
            self.dispatch(c)
        } else {
            Err(XmlError::syntax(format!(
                "invalid character U+{:04X}",
                c as u32
            )))
        };
        result.map_err(|error| self.fail(error))
    }

    /// Offer a run of characters, stopping at the first error.
    pub fn feed_str(&mut self, text: &str) -> XmlResult<bool> {
        let mut more = !self.stack.is_empty();
        for c in text.chars() {
            more = self.feed(c)?;
        }
        Ok(more)
    }

    /// Signal end of input.
    ///
    /// Fails if the document element has not been closed.
    pub fn finish(&mut self) -> XmlResult<()> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        if !self.stack.is_empty() {
            return Err(self.fail(XmlError::unexpected_eof()));
        }
        debug!(
            "End of input at line {}, column {}",
            self.position.line(),
            self.position.column()
        );
        Ok(())
    }

    /// Position of the most recently fed character.
    pub fn position(&self) -> TextPosition {
        self.position
    }

    /// Whether the document element has been closed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The error that stopped the parser, if any.
    pub fn error(&self) -> Option<&XmlError> {
        self.failure.as_ref()
    }

    /// Number of productions on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    fn dispatch(&mut self, c: char) -> XmlResult<bool> {
        loop {
            let Some(top) = self.stack.last_mut() else {
                return self.epilogue(c);
            };
            let action = {
                let mut ctx = Context::new(&mut self.listener, &self.limits, &mut self.delegations);
                top.parse_char(c, &mut ctx)?
            };

            match action {
                ParseAction::Continue => {
                    self.run_delegations()?;
                    return Ok(true);
                }
                ParseAction::LastCharacter => {
                    self.pop();
                    self.run_delegations()?;
                    return Ok(self.more_expected());
                }
                ParseAction::End => {
                    self.pop();
                    self.run_delegations()?;
                    if self.stack.is_empty() {
                        self.mark_complete();
                    }
                }
            }
        }
    }

    fn run_delegations(&mut self) -> XmlResult<()> {
        if self.delegations.is_empty() {
            return Ok(());
        }
        // Replayed characters were already counted when they were fed.
        for Delegation { production, replay } in std::mem::take(&mut self.delegations) {
            self.push(production)?;
            for c in replay {
                self.dispatch(c)?;
            }
        }
        Ok(())
    }

    fn epilogue(&mut self, c: char) -> XmlResult<bool> {
        if is_whitespace(c) {
            return Ok(false);
        }
        if c != '<' {
            return Err(XmlError::unexpected(c, "content after the document element"));
        }
        self.push(Production::Misc(MiscParser::new()))?;
        self.dispatch(c)
    }

    fn push(&mut self, production: Production) -> XmlResult<()> {
        if production.is_element() {
            if self.open_elements >= self.limits.max_depth {
                return Err(XmlError::limit(format!(
                    "element nesting exceeds the maximum depth of {}",
                    self.limits.max_depth
                )));
            }
            self.open_elements += 1;
        }
        trace!(
            "Push {} (stack depth {})",
            production.name(),
            self.stack.len() + 1
        );
        self.stack.push(production);
        Ok(())
    }

    fn pop(&mut self) {
        if let Some(production) = self.stack.pop() {
            if production.is_element() {
                self.open_elements -= 1;
            }
            trace!(
                "Pop {} (stack depth {})",
                production.name(),
                self.stack.len()
            );
        }
    }

    fn more_expected(&mut self) -> bool {
        if self.stack.is_empty() {
            self.mark_complete();
            false
        } else {
            true
        }
    }

    fn mark_complete(&mut self) {
        if !self.complete {
            self.complete = true;
            debug!(
                "Document element closed at line {}, column {}",
                self.position.line(),
                self.position.column()
            );
        }
    }

    fn fail(&mut self, error: XmlError) -> XmlError {
        let error = error.at(self.position);
        warn!(
            "Parse failed at line {}, column {}: {}",
            error.line(),
            error.column(),
            error.message
        );
        self.listener
            .push_parse_error(error.line(), error.column(), &error.message);
        self.stack.clear();
        self.delegations.clear();
        self.failure = Some(error.clone());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XmlErrorKind;
    use crate::listener::{ParseEvent, RecordingListener};

    fn parse_whole(input: &str) -> (Vec<ParseEvent>, XmlResult<()>) {
        let mut parser = PushParser::new(RecordingListener::new());
        let result = parser.feed_str(input).and_then(|_| parser.finish());
        (parser.into_listener().into_events(), result)
    }

    fn parse_chars(input: &str) -> (Vec<ParseEvent>, XmlResult<()>) {
        let mut parser = PushParser::new(RecordingListener::new());
        let mut result = Ok(());
        for c in input.chars() {
            if let Err(e) = parser.feed(c) {
                result = Err(e);
                break;
            }
        }
        if result.is_ok() {
            result = parser.finish();
        }
        (parser.into_listener().into_events(), result)
    }

    // ==================== Completion tests ====================

    #[test]
    fn test_empty_root() {
        let mut parser = PushParser::new(RecordingListener::new());
        assert!(parser.feed('<').unwrap());
        assert!(parser.feed('a').unwrap());
        assert!(parser.feed('/').unwrap());
        assert!(!parser.feed('>').unwrap());
        assert!(parser.is_complete());
        assert_eq!(parser.depth(), 0);
        parser.finish().unwrap();
    }

    #[test]
    fn test_trailing_whitespace_at_rest() {
        let mut parser = PushParser::new(RecordingListener::new());
        assert!(!parser.feed_str("<a/>\n  \r\n").unwrap());
        parser.finish().unwrap();
    }

    #[test]
    fn test_trailing_comment() {
        let (events, result) = parse_whole("<a/><!-- done -->\n");
        result.unwrap();
        assert_eq!(events.last(), Some(&ParseEvent::Comment(" done ".into())));
    }

    #[test]
    fn test_unfinished_document() {
        let (events, result) = parse_whole("<a><b>");
        let err = result.unwrap_err();
        assert_eq!(err.message, "unexpected end of input");
        assert!(matches!(events.last(), Some(ParseEvent::ParseError { .. })));
    }

    #[test]
    fn test_empty_input_is_incomplete() {
        let (_, result) = parse_whole("");
        assert_eq!(result.unwrap_err().message, "unexpected end of input");
    }

    #[test]
    fn test_unfinished_epilogue_comment() {
        let (_, result) = parse_whole("<a/><!-- open");
        assert!(result.is_err());
    }

    // ==================== Epilogue tests ====================

    #[test]
    fn test_text_after_root_rejected() {
        let (_, result) = parse_whole("<a/>x");
        assert_eq!(
            result.unwrap_err().message,
            "unexpected character 'x' in content after the document element"
        );
    }

    #[test]
    fn test_second_root_rejected() {
        let (_, result) = parse_whole("<a/><b/>");
        assert!(result.is_err());
    }

    // ==================== Position tests ====================

    #[test]
    fn test_error_position() {
        let (_, result) = parse_whole("<a>\n  <b></c>");
        let err = result.unwrap_err();
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 9);
    }

    #[test]
    fn test_replay_does_not_advance_position() {
        let mut parser = PushParser::new(RecordingListener::new());
        parser.feed_str("<a><!--x--><b/>").unwrap();
        assert_eq!(parser.position(), TextPosition::new(1, 15));
    }

    #[test]
    fn test_crlf_position() {
        let (_, result) = parse_whole("<a>\r\n\r\n<</a>");
        let err = result.unwrap_err();
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 2);
    }

    // ==================== Failure tests ====================

    #[test]
    fn test_failure_is_permanent() {
        let mut parser = PushParser::new(RecordingListener::new());
        let first = parser.feed_str("<a></b>").unwrap_err();
        let again = parser.feed('x').unwrap_err();
        assert_eq!(first, again);
        assert_eq!(parser.finish().unwrap_err(), first);
        assert_eq!(parser.error(), Some(&first));
    }

    #[test]
    fn test_parse_error_reported_once() {
        let mut parser = PushParser::new(RecordingListener::new());
        let _ = parser.feed_str("<a></b>");
        let _ = parser.feed('x');
        let _ = parser.finish();
        let errors = parser
            .listener()
            .events()
            .iter()
            .filter(|e| matches!(e, ParseEvent::ParseError { .. }))
            .count();
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_invalid_character() {
        let (_, result) = parse_whole("<a>\u{1}</a>");
        let err = result.unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Syntax);
        assert_eq!(err.message, "invalid character U+0001");
    }

    // ==================== Listener error tests ====================

    struct RejectingListener(RecordingListener);

    impl ParseListener for RejectingListener {
        fn push_element_name(&mut self, name: &str) -> XmlResult<()> {
            if name == "bad" {
                return Err(XmlError::namespace("rejected"));
            }
            self.0.push_element_name(name)
        }
        fn push_attribute_name(&mut self, name: &str, quote: char) -> XmlResult<()> {
            self.0.push_attribute_name(name, quote)
        }
        fn push_attribute_text(&mut self, text: &str) -> XmlResult<()> {
            self.0.push_attribute_text(text)
        }
        fn push_attribute_entity_ref(&mut self, name: &str) -> XmlResult<()> {
            self.0.push_attribute_entity_ref(name)
        }
        fn push_attribute_char_ref(&mut self, code_point: char) -> XmlResult<()> {
            self.0.push_attribute_char_ref(code_point)
        }
        fn push_close_start_tag(&mut self) -> XmlResult<()> {
            self.0.push_close_start_tag()
        }
        fn push_text(&mut self, text: &str) -> XmlResult<()> {
            self.0.push_text(text)
        }
        fn push_char_ref(&mut self, code_point: char) -> XmlResult<()> {
            self.0.push_char_ref(code_point)
        }
        fn push_entity_ref(&mut self, name: &str) -> XmlResult<()> {
            self.0.push_entity_ref(name)
        }
        fn push_close_empty_element(&mut self) -> XmlResult<()> {
            self.0.push_close_empty_element()
        }
        fn push_end_element(&mut self) -> XmlResult<()> {
            self.0.push_end_element()
        }
        fn push_comment(&mut self, text: &str) -> XmlResult<()> {
            self.0.push_comment(text)
        }
        fn push_doctype(
            &mut self,
            name: &str,
            public_id: Option<&str>,
            system_id: Option<&str>,
        ) -> XmlResult<()> {
            self.0.push_doctype(name, public_id, system_id)
        }
        fn push_xml_declaration(
            &mut self,
            version: &str,
            encoding: Option<&str>,
            standalone: Option<bool>,
        ) -> XmlResult<()> {
            self.0.push_xml_declaration(version, encoding, standalone)
        }
        fn push_parse_error(&mut self, line: usize, column: usize, message: &str) {
            self.0.push_parse_error(line, column, message)
        }
    }

    #[test]
    fn test_listener_error_is_stamped() {
        let mut parser = PushParser::new(RejectingListener(RecordingListener::new()));
        let err = parser.feed_str("<a><bad/>").unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Namespace);
        assert_eq!(err.position, Some(TextPosition::new(1, 8)));
        assert!(parser.feed('x').is_err());
    }

    // ==================== Resumability tests ====================

    #[test]
    fn test_char_at_a_time_matches_bulk() {
        let input = "<?xml version='1.0'?><!--c--><r a='1&amp;2'>t&lt;&#65;<e/>x</r>";
        let (bulk_events, bulk) = parse_whole(input);
        let (char_events, chars) = parse_chars(input);
        bulk.unwrap();
        chars.unwrap();
        assert_eq!(bulk_events, char_events);
    }
}
