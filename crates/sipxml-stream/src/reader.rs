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

//! Pull cursor over the node queue.
//!
//! [`XmlReader`] holds one current node. [`XmlReader::read`] replaces it with
//! the next node from the queue, blocking while the feeder has not produced
//! one yet. Only one read may be outstanding at a time: a read is started
//! with [`XmlReader::begin_read`] and installed with [`XmlReader::end_read`];
//! starting a second one before the first has ended is a usage error.
//!
//! While positioned on an element the cursor can also move onto its
//! attributes and, with [`XmlReader::read_attribute_value`], onto the
//! segments of an attribute value.
//!
//! # Examples
//!
//! ```
//! use sipxml_stream::{NodeKind, ReaderConfig, XmlReader};
//!
//! let mut reader = XmlReader::from_str("<a x='1'>hi</a>", ReaderConfig::default());
//! assert!(reader.read().unwrap());
//! assert_eq!(reader.kind(), NodeKind::Element);
//! assert_eq!(reader.get_attribute_by_name("x").unwrap().as_deref(), Some("1"));
//!
//! assert!(reader.read().unwrap());
//! assert_eq!(reader.value(), "hi");
//! ```

use crate::config::ReaderConfig;
use crate::node::{Attribute, Node, NodeKind, Segment};
use crate::queue::{channel, char_chunks, ReadOutcome, Shared};
use crate::subtree::XmlTree;
use sipxml_core::{XmlError, XmlResult};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// Lifecycle of a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadState {
    /// No read has completed yet.
    Initial,
    /// Positioned on a node.
    Interactive,
    /// The input ended normally.
    EndOfFile,
    /// The input failed; every read re-raises the error.
    Error,
}

/// Where the cursor sits within the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Node,
    Attribute(usize),
    Segment(usize, usize),
}

/// A started read that has not been installed.
///
/// Dropping it without passing it to [`XmlReader::end_read`] cancels the read;
/// a node it already took goes back to the front of the queue.
#[derive(Debug)]
#[must_use = "a pending read blocks further reads until it is ended or dropped"]
pub struct PendingRead {
    shared: Arc<Shared>,
    outcome: Option<ReadOutcome>,
}

impl PendingRead {
    /// Check for a result without blocking.
    pub fn try_take(&mut self) -> bool {
        if self.outcome.is_none() {
            self.outcome = self.shared.lock().poll();
        }
        self.outcome.is_some()
    }

    /// Block until a node, the end of input, or an error is available.
    pub fn wait(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(self.shared.wait());
        }
    }

    /// Whether a result has been taken.
    pub fn is_ready(&self) -> bool {
        self.outcome.is_some()
    }

    fn take(&mut self) -> ReadOutcome {
        self.wait();
        self.outcome.take().unwrap_or(Ok(None))
    }
}

impl Drop for PendingRead {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        if let Some(Ok(Some(node))) = self.outcome.take() {
            state.unread(node);
        }
        state.read_pending = false;
    }
}

/// Pull-style XML reader.
#[derive(Debug)]
pub struct XmlReader {
    shared: Arc<Shared>,
    config: ReaderConfig,
    current: Option<Node>,
    cursor: Cursor,
    state: ReadState,
    error: Option<XmlError>,
}

impl XmlReader {
    pub(crate) fn new(shared: Arc<Shared>, config: ReaderConfig) -> Self {
        Self {
            shared,
            config,
            current: None,
            cursor: Cursor::Node,
            state: ReadState::Initial,
            error: None,
        }
    }

    /// Parse a complete document held in memory.
    ///
    /// The text is fed in pieces of `config.chunk_size` characters. Parse
    /// errors surface from [`read`](Self::read) once the nodes before them
    /// have been read.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, config: ReaderConfig) -> Self {
        let chunk_size = config.chunk_size;
        let (mut feeder, reader) = channel(config);
        for chunk in char_chunks(text, chunk_size) {
            if feeder.feed(chunk).is_err() {
                break;
            }
        }
        let _ = feeder.finish();
        reader
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    // ==================== Reading ====================

    /// Start a read. Fails with a usage error while another read is pending.
    pub fn begin_read(&self) -> XmlResult<PendingRead> {
        let mut state = self.shared.lock();
        if state.read_pending {
            return Err(XmlError::usage("a read is already pending"));
        }
        state.read_pending = true;
        Ok(PendingRead {
            shared: Arc::clone(&self.shared),
            outcome: None,
        })
    }

    /// Finish a read, blocking until it has a result, and install the node.
    ///
    /// Returns `false` at the end of input. A read started by another reader
    /// is a usage error and leaves both readers untouched.
    pub fn end_read(&mut self, mut pending: PendingRead) -> XmlResult<bool> {
        if !Arc::ptr_eq(&pending.shared, &self.shared) {
            return Err(XmlError::usage(
                "the pending read did not originate with this reader",
            ));
        }
        match self.state {
            ReadState::Error => {
                if let Some(error) = &self.error {
                    return Err(error.clone());
                }
            }
            ReadState::EndOfFile => return Ok(false),
            _ => {}
        }

        self.cursor = Cursor::Node;
        match pending.take() {
            Ok(Some(node)) => {
                self.current = Some(node);
                self.state = ReadState::Interactive;
                Ok(true)
            }
            Ok(None) => {
                debug!("Reader reached end of input");
                self.current = None;
                self.state = ReadState::EndOfFile;
                Ok(false)
            }
            Err(error) => {
                self.current = None;
                self.state = ReadState::Error;
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Advance to the next node, blocking until one is available.
    ///
    /// Returns `false` at the end of input.
    pub fn read(&mut self) -> XmlResult<bool> {
        let pending = self.begin_read()?;
        self.end_read(pending)
    }

    /// Advance without blocking. `Ok(None)` means nothing is available yet.
    pub fn try_read(&mut self) -> XmlResult<Option<bool>> {
        let mut pending = self.begin_read()?;
        let settled = matches!(self.state, ReadState::EndOfFile | ReadState::Error);
        if !settled && !pending.try_take() {
            return Ok(None);
        }
        self.end_read(pending).map(Some)
    }

    pub fn read_state(&self) -> ReadState {
        self.state
    }

    /// Whether the end of input has been reached.
    pub fn eof(&self) -> bool {
        self.state == ReadState::EndOfFile
    }

    /// Skip to the next content node (element, end tag, text or entity
    /// reference) unless the current node already is one.
    ///
    /// Returns the kind of the node landed on; [`NodeKind::None`] at the end
    /// of input.
    pub fn move_to_content(&mut self) -> XmlResult<NodeKind> {
        self.move_to_element();
        loop {
            match self.kind() {
                kind @ (NodeKind::Element
                | NodeKind::EndElement
                | NodeKind::Text
                | NodeKind::EntityReference) => return Ok(kind),
                _ => {}
            }
            if !self.read()? {
                return Ok(NodeKind::None);
            }
        }
    }

    /// Read the current element and everything inside it.
    ///
    /// Afterwards the reader sits on the element's end tag (or on the element
    /// itself when it is empty).
    pub fn read_subtree(&mut self) -> XmlResult<XmlTree> {
        self.move_to_element();
        let root = match &self.current {
            Some(node) if node.kind() == NodeKind::Element => node.clone(),
            _ => {
                return Err(XmlError::usage(
                    "read_subtree requires the reader to be on an element",
                ))
            }
        };
        if root.is_empty_element() {
            return Ok(XmlTree::new(root));
        }

        let mut current = XmlTree::new(root);
        let mut parents: Vec<XmlTree> = Vec::new();
        while self.read()? {
            let Some(node) = self.current.clone() else {
                break;
            };
            match node.kind() {
                NodeKind::EndElement => match parents.pop() {
                    Some(mut parent) => {
                        parent.children.push(current);
                        current = parent;
                    }
                    None => return Ok(current),
                },
                NodeKind::Element if !node.is_empty_element() => {
                    parents.push(std::mem::replace(&mut current, XmlTree::new(node)));
                }
                _ => current.children.push(XmlTree::new(node)),
            }
        }
        Err(XmlError::unexpected_eof())
    }

    // ==================== Current node ====================

    /// The current node, whatever attribute the cursor is on.
    pub fn node(&self) -> Option<&Node> {
        self.current.as_ref()
    }

    fn attribute_at(&self, index: usize) -> Option<&Attribute> {
        self.current.as_ref()?.attributes.get(index)
    }

    fn segment_at(&self, index: usize, segment: usize) -> Option<&Segment> {
        self.attribute_at(index)?.segments.get(segment)
    }

    pub fn kind(&self) -> NodeKind {
        let Some(node) = &self.current else {
            return NodeKind::None;
        };
        match self.cursor {
            Cursor::Node => node.kind(),
            Cursor::Attribute(_) => NodeKind::Attribute,
            Cursor::Segment(i, j) => self.segment_at(i, j).map_or(NodeKind::None, Segment::kind),
        }
    }

    /// Qualified name of the node, attribute or entity reference segment.
    pub fn name(&self) -> &str {
        let Some(node) = &self.current else {
            return "";
        };
        match self.cursor {
            Cursor::Node => node.name(),
            Cursor::Attribute(i) => self.attribute_at(i).map_or("", Attribute::name),
            Cursor::Segment(i, j) => match self.segment_at(i, j) {
                Some(Segment::EntityReference(name)) => name.as_str(),
                _ => "",
            },
        }
    }

    pub fn local_name(&self) -> &str {
        match self.cursor {
            Cursor::Node => self.current.as_ref().map_or("", Node::local_name),
            Cursor::Attribute(i) => self.attribute_at(i).map_or("", Attribute::local_name),
            Cursor::Segment(..) => self.name(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        match self.cursor {
            Cursor::Node => self.current.as_ref()?.prefix(),
            Cursor::Attribute(i) => self.attribute_at(i)?.prefix(),
            Cursor::Segment(..) => None,
        }
    }

    /// Resolved namespace URI; empty for no namespace.
    pub fn namespace_uri(&self) -> &str {
        match self.cursor {
            Cursor::Node => self.current.as_ref().map_or("", Node::namespace_uri),
            Cursor::Attribute(i) => self.attribute_at(i).map_or("", Attribute::namespace_uri),
            Cursor::Segment(..) => "",
        }
    }

    /// Value of the node or attribute. An entity reference segment has no
    /// value; its name is the entity name.
    pub fn value(&self) -> Cow<'_, str> {
        match self.cursor {
            Cursor::Node => Cow::Borrowed(self.current.as_ref().map_or("", Node::value)),
            Cursor::Attribute(i) => self
                .attribute_at(i)
                .map_or(Cow::Borrowed(""), Attribute::value),
            Cursor::Segment(i, j) => match self.segment_at(i, j) {
                Some(Segment::Text(text)) => Cow::Borrowed(text.as_str()),
                _ => Cow::Borrowed(""),
            },
        }
    }

    pub fn depth(&self) -> usize {
        let Some(node) = &self.current else {
            return 0;
        };
        match self.cursor {
            Cursor::Node => node.depth(),
            Cursor::Attribute(i) => self.attribute_at(i).map_or(0, Attribute::depth),
            Cursor::Segment(i, _) => self.attribute_at(i).map_or(0, |a| a.depth() + 1),
        }
    }

    /// Whether the cursor is on an element written as `<name/>`.
    pub fn is_empty_element(&self) -> bool {
        self.cursor == Cursor::Node && self.current.as_ref().is_some_and(Node::is_empty_element)
    }

    /// Quote delimiting the current attribute value; `"` elsewhere.
    pub fn quote_char(&self) -> char {
        match self.cursor {
            Cursor::Attribute(i) | Cursor::Segment(i, _) => {
                self.attribute_at(i).map_or('"', Attribute::quote_char)
            }
            Cursor::Node => '"',
        }
    }

    /// Number of attributes of the current node.
    pub fn attribute_count(&self) -> usize {
        self.current.as_ref().map_or(0, |n| n.attributes().len())
    }

    // ==================== Attributes ====================

    fn require_node(&self) -> XmlResult<&Node> {
        self.current
            .as_ref()
            .ok_or_else(|| XmlError::usage("the reader is not positioned on a node"))
    }

    fn check_index(node: &Node, index: usize) -> XmlResult<()> {
        if index < node.attributes.len() {
            Ok(())
        } else {
            Err(XmlError::usage(format!(
                "attribute index {} is out of range for a node with {} attributes",
                index,
                node.attributes.len()
            )))
        }
    }

    /// Value of the attribute at `index`.
    pub fn get_attribute(&self, index: usize) -> XmlResult<Cow<'_, str>> {
        let node = self.require_node()?;
        Self::check_index(node, index)?;
        Ok(node.attributes[index].value())
    }

    /// Value of the attribute with the given qualified name.
    pub fn get_attribute_by_name(&self, name: &str) -> XmlResult<Option<Cow<'_, str>>> {
        Ok(self.require_node()?.attribute(name).map(Attribute::value))
    }

    /// Value of the attribute with the given local name and namespace URI.
    pub fn get_attribute_ns(
        &self,
        local_name: &str,
        namespace_uri: &str,
    ) -> XmlResult<Option<Cow<'_, str>>> {
        Ok(self
            .require_node()?
            .attribute_ns(local_name, namespace_uri)
            .map(Attribute::value))
    }

    /// Move onto the attribute at `index`.
    pub fn move_to_attribute(&mut self, index: usize) -> XmlResult<()> {
        let node = self.require_node()?;
        Self::check_index(node, index)?;
        self.cursor = Cursor::Attribute(index);
        Ok(())
    }

    /// Move onto the attribute with the given qualified name.
    pub fn move_to_attribute_by_name(&mut self, name: &str) -> XmlResult<bool> {
        let position = self
            .require_node()?
            .attributes
            .iter()
            .position(|a| a.name() == name);
        Ok(self.move_if_found(position))
    }

    /// Move onto the attribute with the given local name and namespace URI.
    pub fn move_to_attribute_ns(&mut self, local_name: &str, namespace_uri: &str) -> XmlResult<bool> {
        let position = self
            .require_node()?
            .attributes
            .iter()
            .position(|a| a.local_name() == local_name && a.namespace_uri() == namespace_uri);
        Ok(self.move_if_found(position))
    }

    fn move_if_found(&mut self, position: Option<usize>) -> bool {
        match position {
            Some(index) => {
                self.cursor = Cursor::Attribute(index);
                true
            }
            None => false,
        }
    }

    pub fn move_to_first_attribute(&mut self) -> XmlResult<bool> {
        let found = !self.require_node()?.attributes.is_empty();
        Ok(self.move_if_found(found.then_some(0)))
    }

    /// Move to the next attribute. From the element itself this is the first
    /// attribute.
    pub fn move_to_next_attribute(&mut self) -> XmlResult<bool> {
        let count = self.require_node()?.attributes.len();
        let next = match self.cursor {
            Cursor::Node => 0,
            Cursor::Attribute(i) | Cursor::Segment(i, _) => i + 1,
        };
        Ok(self.move_if_found((next < count).then_some(next)))
    }

    /// Move from an attribute back to its element.
    pub fn move_to_element(&mut self) -> bool {
        match self.cursor {
            Cursor::Node => false,
            _ => {
                self.cursor = Cursor::Node;
                true
            }
        }
    }

    /// Step through the segments of the current attribute value.
    ///
    /// The first call moves onto the first segment; later calls move to the
    /// following segment. Returns `false` when there are no more.
    pub fn read_attribute_value(&mut self) -> XmlResult<bool> {
        self.require_node()?;
        let (index, segment) = match self.cursor {
            Cursor::Node => return Ok(false),
            Cursor::Attribute(i) => (i, 0),
            Cursor::Segment(i, j) => (i, j + 1),
        };
        if self.segment_at(index, segment).is_some() {
            self.cursor = Cursor::Segment(index, segment);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
