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

//! Character classes from the XML 1.0 (Fifth Edition) grammar.
//!
//! All predicates are pure and operate on a single `char`.

/// `S ::= (#x20 | #x9 | #xD | #xA)+`
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// `NameStartChar`
#[inline]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// `NameChar`
#[inline]
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// `Char`: the characters allowed anywhere in a document.
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

#[inline]
pub fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// `PubidChar`
#[inline]
pub fn is_pubid_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ' ' | '\r'
                | '\n'
                | '-'
                | '\''
                | '('
                | ')'
                | '+'
                | ','
                | '.'
                | '/'
                | ':'
                | '='
                | '?'
                | ';'
                | '!'
                | '*'
                | '#'
                | '@'
                | '$'
                | '_'
                | '%'
        )
}

/// First character of `EncName`.
#[inline]
pub fn is_encoding_start_char(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Remaining characters of `EncName`.
#[inline]
pub fn is_encoding_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// `VersionNum` characters.
#[inline]
pub fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Whitespace tests ====================

    #[test]
    fn test_whitespace() {
        for c in [' ', '\t', '\r', '\n'] {
            assert!(is_whitespace(c));
        }
        assert!(!is_whitespace('\u{A0}'));
        assert!(!is_whitespace('x'));
    }

    // ==================== Name tests ====================

    #[test]
    fn test_name_start_ascii() {
        assert!(is_name_start_char('a'));
        assert!(is_name_start_char('Z'));
        assert!(is_name_start_char('_'));
        assert!(is_name_start_char(':'));
        assert!(!is_name_start_char('1'));
        assert!(!is_name_start_char('-'));
        assert!(!is_name_start_char('.'));
    }

    #[test]
    fn test_name_start_non_ascii() {
        assert!(is_name_start_char('é'));
        assert!(is_name_start_char('日'));
        assert!(is_name_start_char('\u{10000}'));
        assert!(!is_name_start_char('\u{D7}'));
        assert!(!is_name_start_char('\u{F7}'));
        assert!(!is_name_start_char('\u{B7}'));
    }

    #[test]
    fn test_name_char_extras() {
        assert!(is_name_char('-'));
        assert!(is_name_char('.'));
        assert!(is_name_char('7'));
        assert!(is_name_char('\u{B7}'));
        assert!(is_name_char('\u{301}'));
        assert!(is_name_char('\u{203F}'));
        assert!(!is_name_char(' '));
        assert!(!is_name_char('='));
        assert!(!is_name_char('>'));
        assert!(!is_name_char('/'));
    }

    // ==================== Char tests ====================

    #[test]
    fn test_xml_char() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('a'));
        assert!(is_xml_char('\u{10FFFF}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{B}'));
        assert!(!is_xml_char('\u{FFFE}'));
        assert!(!is_xml_char('\u{FFFF}'));
    }

    // ==================== Digit tests ====================

    #[test]
    fn test_digits() {
        assert!(is_decimal_digit('0'));
        assert!(!is_decimal_digit('a'));
        assert!(is_hex_digit('a'));
        assert!(is_hex_digit('F'));
        assert!(!is_hex_digit('g'));
    }

    // ==================== Literal character tests ====================

    #[test]
    fn test_pubid_char() {
        for c in "-//W3C//DTD XHTML 1.0 Strict//EN".chars() {
            assert!(is_pubid_char(c), "{c:?} should be a PubidChar");
        }
        assert!(!is_pubid_char('"'));
        assert!(!is_pubid_char('<'));
        assert!(!is_pubid_char('\t'));
    }

    #[test]
    fn test_encoding_chars() {
        assert!(is_encoding_start_char('U'));
        assert!(!is_encoding_start_char('8'));
        assert!(is_encoding_char('8'));
        assert!(is_encoding_char('-'));
        assert!(!is_encoding_char(' '));
    }

    #[test]
    fn test_version_chars() {
        assert!(is_version_char('1'));
        assert!(is_version_char('.'));
        assert!(!is_version_char(' '));
        assert!(!is_version_char('"'));
    }
}
