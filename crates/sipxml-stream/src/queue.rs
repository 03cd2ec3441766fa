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

//! The node queue shared by a feeder and a reader.
//!
//! [`channel`] creates both ends. The [`XmlFeeder`] owns the parser and moves
//! every completed node into the queue after each call; the
//! [`XmlReader`](crate::XmlReader) takes them out in order. Both ends may live
//! on different threads. A reader waiting for a node blocks on a condition
//! variable until the feeder publishes a node, an error, or the end of input.

use crate::builder::NodeBuilder;
use crate::config::ReaderConfig;
use crate::node::Node;
use crate::reader::XmlReader;
use parking_lot::{Condvar, Mutex, MutexGuard};
use sipxml_core::{PushParser, TextPosition, XmlError, XmlResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of a completed read: a node, the end of input, or the fatal error.
pub(crate) type ReadOutcome = XmlResult<Option<Node>>;

#[derive(Debug, Default)]
pub(crate) struct QueueState {
    nodes: VecDeque<Node>,
    finished: bool,
    error: Option<XmlError>,
    pub(crate) read_pending: bool,
}

impl QueueState {
    /// Outcome available to a reader right now, if any.
    ///
    /// Nodes completed before a failure are delivered before the failure.
    pub(crate) fn poll(&mut self) -> Option<ReadOutcome> {
        if let Some(node) = self.nodes.pop_front() {
            return Some(Ok(Some(node)));
        }
        if let Some(error) = &self.error {
            return Some(Err(error.clone()));
        }
        if self.finished {
            return Some(Ok(None));
        }
        None
    }

    /// Put back a node that was taken but never installed.
    pub(crate) fn unread(&mut self, node: Node) {
        self.nodes.push_front(node);
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Shared {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock()
    }

    /// Block until an outcome is available.
    pub(crate) fn wait(&self) -> ReadOutcome {
        let mut state = self.state.lock();
        loop {
            if let Some(outcome) = state.poll() {
                return outcome;
            }
            self.ready.wait(&mut state);
        }
    }

    fn notify(&self) {
        self.ready.notify_all();
    }
}

/// Create a connected feeder and reader.
pub fn channel(config: ReaderConfig) -> (XmlFeeder, XmlReader) {
    let shared = Arc::new(Shared::default());
    let builder = NodeBuilder::new(config.limits.clone());
    let feeder = XmlFeeder {
        parser: PushParser::with_limits(builder, config.limits.clone()),
        shared: Arc::clone(&shared),
        closed: false,
    };
    (feeder, XmlReader::new(shared, config))
}

/// Producer end of the node queue.
///
/// Dropping a feeder that was never finished ends the input, so a waiting
/// reader sees either the end of the document or an "unexpected end of
/// input" error instead of blocking forever.
#[derive(Debug)]
pub struct XmlFeeder {
    parser: PushParser<NodeBuilder>,
    shared: Arc<Shared>,
    closed: bool,
}

impl XmlFeeder {
    /// Feed one character. Returns whether more input is expected.
    pub fn feed_char(&mut self, c: char) -> XmlResult<bool> {
        let result = self.parser.feed(c);
        self.publish(&result);
        result
    }

    /// Feed a run of characters, stopping at the first error.
    pub fn feed(&mut self, text: &str) -> XmlResult<bool> {
        let result = self.parser.feed_str(text);
        self.publish(&result);
        result
    }

    /// Signal end of input and close the queue.
    pub fn finish(&mut self) -> XmlResult<()> {
        if self.closed {
            return self.parser.error().map_or(Ok(()), |e| Err(e.clone()));
        }
        let result = self.parser.finish();
        self.publish(&result);
        self.close();
        result
    }

    /// Stop with an error that did not come from the parser, such as a
    /// failed read from the character source.
    pub fn abort(&mut self, error: XmlError) {
        let error = error.at(self.parser.position());
        {
            let mut state = self.shared.lock();
            if state.error.is_none() {
                state.error = Some(error);
            }
        }
        self.close();
    }

    /// Position of the last character fed.
    pub fn position(&self) -> TextPosition {
        self.parser.position()
    }

    /// Whether the document element has been closed.
    pub fn is_complete(&self) -> bool {
        self.parser.is_complete()
    }

    /// Whether [`finish`](Self::finish) or [`abort`](Self::abort) has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn publish<T>(&mut self, result: &XmlResult<T>) {
        let mut state = self.shared.lock();
        let before = state.len();
        state.nodes.extend(self.parser.listener_mut().drain());
        if let Err(error) = result {
            if state.error.is_none() {
                state.error = Some(error.clone());
            }
        }
        let published = state.len() - before;
        drop(state);
        if published > 0 || result.is_err() {
            trace!("Published {} nodes", published);
            self.shared.notify();
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.shared.lock().finished = true;
        self.shared.notify();
        debug!(
            "Node queue closed at line {}, column {}",
            self.parser.position().line(),
            self.parser.position().column()
        );
    }
}

impl Drop for XmlFeeder {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.finish();
        }
    }
}

/// Split `text` into pieces of at most `size` characters.
pub(crate) fn char_chunks(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let size = size.max(1);
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(i, _)| i);
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}
