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

//! One markup item after the document element (`Misc` in the epilogue).
//!
//! Whitespace between items is consumed by the engine itself; this machine
//! starts at a `<`.

use super::{CommentParser, Context, ParseAction};
use crate::error::{XmlError, XmlResult};

const AFTER_ROOT: &str = "content after the document element";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Start,
    LeftAngle,
    Bang,
    Done,
}

#[derive(Debug, Clone)]
pub struct MiscParser {
    mode: Mode,
}

impl Default for MiscParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MiscParser {
    pub fn new() -> Self {
        Self { mode: Mode::Start }
    }

    pub fn parse_char(&mut self, c: char, ctx: &mut Context<'_>) -> XmlResult<ParseAction> {
        match self.mode {
            Mode::Start => {
                if c != '<' {
                    return Err(XmlError::unexpected(c, AFTER_ROOT));
                }
                self.mode = Mode::LeftAngle;
                Ok(ParseAction::Continue)
            }
            Mode::LeftAngle => match c {
                '!' => {
                    self.mode = Mode::Bang;
                    Ok(ParseAction::Continue)
                }
                '?' => Err(XmlError::not_implemented("processing instructions")),
                _ => Err(XmlError::unexpected(c, AFTER_ROOT)),
            },
            Mode::Bang => {
                if c != '-' {
                    return Err(XmlError::unexpected(c, AFTER_ROOT));
                }
                ctx.delegate(CommentParser::new(), &['<', '!', '-']);
                self.mode = Mode::Done;
                Ok(ParseAction::LastCharacter)
            }
            Mode::Done => Ok(ParseAction::End),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XmlErrorKind;
    use crate::listener::ParseEvent;
    use crate::productions::testing::run;

    #[test]
    fn test_trailing_comment() {
        let (events, result) = run(MiscParser::new(), "<!--end-->");
        assert!(!result.unwrap());
        assert_eq!(events, vec![ParseEvent::Comment("end".into())]);
    }

    #[test]
    fn test_second_root_rejected() {
        let (_, result) = run(MiscParser::new(), "<b/>");
        assert_eq!(
            result.unwrap_err().message,
            "unexpected character 'b' in content after the document element"
        );
    }

    #[test]
    fn test_doctype_after_root_rejected() {
        let (_, result) = run(MiscParser::new(), "<!DOCTYPE a>");
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::Syntax);
    }

    #[test]
    fn test_processing_instruction_not_implemented() {
        let (_, result) = run(MiscParser::new(), "<?pi?>");
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::NotImplemented);
    }
}
