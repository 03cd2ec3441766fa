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

//! Node records produced by the node builder.
//!
//! A [`Node`] is immutable once it has been queued. Element nodes own their
//! [`Attribute`]s; attribute values are kept as [`Segment`]s so unresolved
//! entity references survive until the consumer reads them.

use std::borrow::Cow;
use std::fmt;

/// Kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No current node: before the first read or at end of input.
    None,
    Element,
    Attribute,
    Text,
    Comment,
    EntityReference,
    EndElement,
    XmlDeclaration,
    DocumentType,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Element => "Element",
            Self::Attribute => "Attribute",
            Self::Text => "Text",
            Self::Comment => "Comment",
            Self::EntityReference => "EntityReference",
            Self::EndElement => "EndElement",
            Self::XmlDeclaration => "XmlDeclaration",
            Self::DocumentType => "DocumentType",
        };
        f.write_str(name)
    }
}

/// A name as written, optionally `prefix:localName`.
///
/// The split happens at the first `:`.
///
/// ```
/// use sipxml_stream::QualifiedName;
///
/// let name = QualifiedName::new("soap:Envelope");
/// assert_eq!(name.prefix(), Some("soap"));
/// assert_eq!(name.local_name(), "Envelope");
/// assert_eq!(QualifiedName::new("item").prefix(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName {
    raw: String,
    colon: Option<usize>,
}

impl QualifiedName {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let colon = raw.find(':');
        Self { raw, colon }
    }

    /// The name as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn prefix(&self) -> Option<&str> {
        self.colon.map(|i| &self.raw[..i])
    }

    pub fn local_name(&self) -> &str {
        match self.colon {
            Some(i) => &self.raw[i + 1..],
            None => &self.raw,
        }
    }

    /// Whether both halves of a prefixed name are non-empty.
    pub fn is_well_formed(&self) -> bool {
        match self.colon {
            Some(i) => i > 0 && i + 1 < self.raw.len(),
            None => true,
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for QualifiedName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// One piece of an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, with built-in and character references already resolved.
    Text(String),
    /// A reference to an entity the parser cannot resolve.
    EntityReference(String),
}

impl Segment {
    /// The segment's contribution to the attribute value.
    pub fn value(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::EntityReference(name) => Cow::Owned(format!("&{};", name)),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Text(_) => NodeKind::Text,
            Self::EntityReference(_) => NodeKind::EntityReference,
        }
    }
}

/// An attribute of an element (or a pseudo-attribute of a declaration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) name: QualifiedName,
    pub(crate) namespace_uri: String,
    pub(crate) depth: usize,
    pub(crate) quote: char,
    pub(crate) segments: Vec<Segment>,
}

impl Attribute {
    pub(crate) fn new(name: impl Into<String>, quote: char, depth: usize) -> Self {
        Self {
            name: QualifiedName::new(name),
            namespace_uri: String::new(),
            depth,
            quote,
            segments: Vec::new(),
        }
    }

    /// Pseudo-attribute with a single text value.
    pub(crate) fn pseudo(name: &str, value: &str, depth: usize) -> Self {
        let mut attr = Self::new(name, '\'', depth);
        attr.segments.push(Segment::Text(value.to_string()));
        attr
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.prefix()
    }

    /// Resolved namespace URI; empty for no namespace.
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The quote character that delimited the value.
    pub fn quote_char(&self) -> char {
        self.quote
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The concatenated value of all segments.
    pub fn value(&self) -> Cow<'_, str> {
        match self.segments.as_slice() {
            [] => Cow::Borrowed(""),
            [single] => single.value(),
            many => Cow::Owned(many.iter().map(|s| s.value()).collect()),
        }
    }
}

/// A completed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) name: QualifiedName,
    pub(crate) namespace_uri: String,
    pub(crate) depth: usize,
    pub(crate) value: String,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) is_empty_element: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, name: impl Into<String>, depth: usize) -> Self {
        Self {
            kind,
            name: QualifiedName::new(name),
            namespace_uri: String::new(),
            depth,
            value: String::new(),
            attributes: Vec::new(),
            is_empty_element: false,
        }
    }

    pub(crate) fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The name as written; empty for text and comments.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.prefix()
    }

    /// Resolved namespace URI; empty for no namespace.
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Text of a text or comment node, the pseudo-attribute string of an XML
    /// declaration; empty otherwise.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Whether the element was written as `<name/>`.
    pub fn is_empty_element(&self) -> bool {
        self.is_empty_element
    }

    /// First attribute with the given qualified name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Attribute by local name and namespace URI.
    pub fn attribute_ns(&self, local_name: &str, namespace_uri: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.local_name() == local_name && a.namespace_uri() == namespace_uri)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} depth={}", self.kind, self.depth)?;
        if !self.name.as_str().is_empty() {
            write!(f, " name={}", self.name)?;
        }
        if !self.namespace_uri.is_empty() {
            write!(f, " ns={}", self.namespace_uri)?;
        }
        if !self.value.is_empty() {
            write!(f, " value={:?}", self.value)?;
        }
        for attr in &self.attributes {
            write!(f, " @{}={:?}", attr.name(), attr.value())?;
        }
        if self.is_empty_element {
            write!(f, " empty")?;
        }
        Ok(())
    }
}
