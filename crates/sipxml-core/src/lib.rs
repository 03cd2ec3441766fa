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

//! Incremental XML grammar engine.
//!
//! This crate parses XML one character at a time. It never needs the whole
//! document in memory and can stop and resume at any character boundary.
//!
//! - [`chars`]: XML character classes
//! - [`productions`]: one state machine per grammar production
//! - [`PushParser`]: the stack engine that drives the machines
//! - [`ParseListener`]: the events the machines report
//!
//! Turning events into a pull-style node cursor is the job of the
//! `sipxml-stream` crate.
//!
//! # Example
//!
//! ```
//! use sipxml_core::{ParseEvent, PushParser, RecordingListener};
//!
//! let mut parser = PushParser::new(RecordingListener::new());
//! for c in "<greeting lang='en'>hello</greeting>".chars() {
//!     parser.feed(c).unwrap();
//! }
//! parser.finish().unwrap();
//!
//! let events = parser.into_listener().into_events();
//! assert!(events.contains(&ParseEvent::Text("hello".into())));
//! ```

pub mod chars;
mod engine;
mod error;
mod limits;
mod listener;
mod position;
pub mod productions;

pub use engine::PushParser;
pub use error::{XmlError, XmlErrorKind, XmlResult};
pub use limits::Limits;
pub use listener::{ParseEvent, ParseListener, RecordingListener};
pub use position::TextPosition;
pub use productions::ParseAction;
