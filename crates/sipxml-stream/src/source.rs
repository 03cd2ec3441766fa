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

//! Node iterator over a byte source.
//!
//! [`XmlStreamReader`] reads one line at a time from a buffered source and
//! feeds it to the parser only when the node queue has run dry, so memory use
//! is bounded by the longest line rather than the document.
//!
//! # Examples
//!
//! ```rust
//! use sipxml_stream::{NodeKind, XmlStreamReader};
//! use std::io::Cursor;
//!
//! let input = "<list>\n  <item>tea</item>\n</list>\n";
//! let kinds: Vec<NodeKind> = XmlStreamReader::new(Cursor::new(input))
//!     .map(|node| node.unwrap().kind())
//!     .filter(|kind| *kind != NodeKind::Text)
//!     .collect();
//!
//! assert_eq!(
//!     kinds,
//!     vec![
//!         NodeKind::Element,
//!         NodeKind::Element,
//!         NodeKind::EndElement,
//!         NodeKind::EndElement,
//!     ]
//! );
//! ```

use crate::config::ReaderConfig;
use crate::node::Node;
use crate::queue::{channel, XmlFeeder};
use crate::reader::XmlReader;
use sipxml_core::{XmlError, XmlResult};
use std::io::{BufRead, BufReader, Read};
use tracing::debug;

/// Pull-driven node iterator over any [`Read`] source.
///
/// Yields every node in document order. After an error has been yielded the
/// iterator is exhausted.
pub struct XmlStreamReader<R: Read> {
    source: BufReader<R>,
    line: String,
    lines_read: usize,
    feeder: XmlFeeder,
    reader: XmlReader,
    failed: bool,
}

impl<R: Read> XmlStreamReader<R> {
    /// Create a reader with the default configuration.
    pub fn new(source: R) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Create a reader with a custom configuration.
    pub fn with_config(source: R, config: ReaderConfig) -> Self {
        let buffer_size = config.buffer_size;
        let (feeder, reader) = channel(config);
        Self {
            source: BufReader::with_capacity(buffer_size, source),
            line: String::new(),
            lines_read: 0,
            feeder,
            reader,
            failed: false,
        }
    }

    /// Number of lines handed to the parser so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// The underlying cursor, positioned on the last node yielded.
    pub fn reader(&self) -> &XmlReader {
        &self.reader
    }

    /// Feed the next line, or end the input when the source is exhausted.
    fn fill(&mut self) {
        self.line.clear();
        match self.source.read_line(&mut self.line) {
            Ok(0) => {
                debug!("Source exhausted after {} lines", self.lines_read);
                let _ = self.feeder.finish();
            }
            Ok(_) => {
                self.lines_read += 1;
                // Errors are recorded in the queue and come back from the reader.
                let _ = self.feeder.feed(&self.line);
            }
            Err(e) => self.feeder.abort(XmlError::io(e.to_string())),
        }
    }

    fn next_node(&mut self) -> XmlResult<Option<Node>> {
        loop {
            match self.reader.try_read()? {
                Some(true) => return Ok(self.reader.node().cloned()),
                Some(false) => return Ok(None),
                None if self.feeder.is_closed() => return Ok(None),
                None => self.fill(),
            }
        }
    }
}

impl<R: Read> Iterator for XmlStreamReader<R> {
    type Item = XmlResult<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_node() {
            Ok(Some(node)) => Some(Ok(node)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
