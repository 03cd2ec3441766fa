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

//! Error types for incremental XML parsing.

use crate::position::TextPosition;
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred while parsing or reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlErrorKind {
    /// Structural grammar violation.
    Syntax,
    /// Unresolvable namespace prefix.
    Namespace,
    /// API misuse, such as a second outstanding read.
    Usage,
    /// Grammar corner the parser does not support (internal subset, PI, CDATA).
    NotImplemented,
    /// A configured resource limit was exceeded.
    Limit,
    /// I/O error from an upstream character source.
    Io,
}

impl fmt::Display for XmlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Namespace => write!(f, "NamespaceError"),
            Self::Usage => write!(f, "UsageError"),
            Self::NotImplemented => write!(f, "NotImplementedError"),
            Self::Limit => write!(f, "LimitError"),
            Self::Io => write!(f, "IOError"),
        }
    }
}

/// An error raised by the parser engine, a production, or the reader.
///
/// Document errors carry the line and column of the character that was
/// being processed. Errors that are not tied to input (usage errors) have
/// no position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}: {message}", describe_position(.position))]
pub struct XmlError {
    /// The kind of error.
    pub kind: XmlErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Position of the offending character, if known.
    pub position: Option<TextPosition>,
}

fn describe_position(position: &Option<TextPosition>) -> String {
    match position {
        Some(pos) => format!(" at line {}, column {}", pos.line(), pos.column()),
        None => String::new(),
    }
}

impl XmlError {
    /// Create a new error without a position.
    pub fn new(kind: XmlErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    /// Stamp a position onto the error unless it already has one.
    pub fn at(mut self, position: TextPosition) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }

    /// Line of the offending character, or 0 when unknown.
    pub fn line(&self) -> usize {
        self.position.map_or(0, |p| p.line())
    }

    /// Column of the offending character, or 0 when unknown.
    pub fn column(&self) -> usize {
        self.position.map_or(0, |p| p.column())
    }

    /// Whether this error terminates the document (everything except usage errors).
    pub fn is_fatal_document_error(&self) -> bool {
        self.kind != XmlErrorKind::Usage
    }

    // Convenience constructors for each error kind
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(XmlErrorKind::Syntax, message)
    }

    pub fn namespace(message: impl Into<String>) -> Self {
        Self::new(XmlErrorKind::Namespace, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(XmlErrorKind::Usage, message)
    }

    pub fn not_implemented(feature: &str) -> Self {
        Self::new(
            XmlErrorKind::NotImplemented,
            format!("{} are not supported", feature),
        )
    }

    pub fn limit(message: impl Into<String>) -> Self {
        Self::new(XmlErrorKind::Limit, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(XmlErrorKind::Io, message)
    }

    // Grammar errors shared by several productions

    /// A specific character was required.
    pub fn expected(expected: char, found: char) -> Self {
        Self::syntax(format!(
            "expected '{}' but found '{}'",
            expected.escape_debug(),
            found.escape_debug()
        ))
    }

    /// A character is not allowed at this point of a production.
    pub fn unexpected(found: char, context: &str) -> Self {
        Self::syntax(format!(
            "unexpected character '{}' in {}",
            found.escape_debug(),
            context
        ))
    }

    /// Whitespace was required between two parts of a production.
    pub fn expected_whitespace(found: char, context: &str) -> Self {
        Self::syntax(format!(
            "expected whitespace in {} but found '{}'",
            context,
            found.escape_debug()
        ))
    }

    /// An opening quote was required.
    pub fn expected_quote(found: char) -> Self {
        Self::syntax(format!(
            "expected a quote character but found '{}'",
            found.escape_debug()
        ))
    }

    /// The input ended before the document element was complete.
    pub fn unexpected_eof() -> Self {
        Self::syntax("unexpected end of input")
    }
}

/// Result type for sipxml operations.
pub type XmlResult<T> = Result<T, XmlError>;
