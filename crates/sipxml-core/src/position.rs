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

//! Line and column tracking for character-at-a-time input.
//!
//! Lines are 1-based. Columns count the characters seen on the current line,
//! so the first character of a line is at column 1 and a line break itself
//! resets the column to 0 on the new line. CR, LF and the CRLF pair each
//! count as a single line break.
//!
//! # Examples
//!
//! ```
//! use sipxml_core::TextPosition;
//!
//! let mut pos = TextPosition::start();
//! for c in "ab\r\ncd".chars() {
//!     pos.advance(c);
//! }
//! assert_eq!(pos.line(), 2);
//! assert_eq!(pos.column(), 2);
//! ```

use std::fmt;

/// A position in the character stream.
///
/// Equality compares line and column only.
#[derive(Debug, Clone, Copy)]
pub struct TextPosition {
    line: usize,
    column: usize,
    after_cr: bool,
}

impl TextPosition {
    /// Creates a position at the given line and column.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            after_cr: false,
        }
    }

    /// Position before the first character (line 1, column 0).
    #[inline]
    pub const fn start() -> Self {
        Self::new(1, 0)
    }

    /// Returns the line number.
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number.
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Moves past one character.
    pub fn advance(&mut self, c: char) {
        match c {
            '\n' if self.after_cr => {}
            '\r' | '\n' => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        self.after_cr = c == '\r';
    }
}

impl PartialEq for TextPosition {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.column == other.column
    }
}

impl Eq for TextPosition {}

impl std::hash::Hash for TextPosition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.line.hash(state);
        self.column.hash(state);
    }
}

impl Default for TextPosition {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after(input: &str) -> TextPosition {
        let mut pos = TextPosition::start();
        for c in input.chars() {
            pos.advance(c);
        }
        pos
    }

    #[test]
    fn test_start() {
        let pos = TextPosition::start();
        assert_eq!(pos.line(), 1);
        assert_eq!(pos.column(), 0);
        assert_eq!(pos, TextPosition::default());
    }

    #[test]
    fn test_columns_advance() {
        assert_eq!(after("abc"), TextPosition::new(1, 3));
    }

    #[test]
    fn test_lf_breaks_line() {
        assert_eq!(after("ab\nc"), TextPosition::new(2, 1));
    }

    #[test]
    fn test_lone_cr_breaks_line() {
        assert_eq!(after("ab\rc"), TextPosition::new(2, 1));
    }

    #[test]
    fn test_crlf_counts_once() {
        assert_eq!(after("a\r\nb"), TextPosition::new(2, 1));
    }

    #[test]
    fn test_cr_cr_counts_twice() {
        assert_eq!(after("\r\r"), TextPosition::new(3, 0));
    }

    #[test]
    fn test_lf_cr_counts_twice() {
        assert_eq!(after("\n\r"), TextPosition::new(3, 0));
    }

    #[test]
    fn test_equality_ignores_pending_cr() {
        assert_eq!(after("x\r"), TextPosition::new(2, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(TextPosition::new(4, 9).to_string(), "4:9");
    }
}
