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

//! Assembly of listener events into nodes.
//!
//! [`NodeBuilder`] is the [`ParseListener`] between the grammar engine and the
//! node queue. A start tag is held back until its `>` (or `/>`) so that the
//! namespace declarations among its attributes apply to the element's own
//! name. Character data is buffered until something other than text
//! interrupts it, so `a&lt;&#66;` arrives as one text node.

use crate::namespace::{NamespaceScopes, XMLNS_NAMESPACE};
use crate::node::{Attribute, Node, NodeKind, QualifiedName, Segment};
use sipxml_core::{Limits, ParseListener, XmlError, XmlResult};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Resolve one of the five predefined entities.
pub fn builtin_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => None,
    }
}

/// An element whose end tag has not been seen yet.
#[derive(Debug, Clone)]
struct OpenElement {
    name: QualifiedName,
    namespace_uri: String,
}

/// Listener that turns production events into [`Node`]s.
#[derive(Debug)]
pub struct NodeBuilder {
    limits: Limits,
    output: VecDeque<Node>,
    scopes: NamespaceScopes,
    open: Vec<OpenElement>,
    pending: Option<Node>,
    text: String,
    text_len: usize,
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl NodeBuilder {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            output: VecDeque::new(),
            scopes: NamespaceScopes::new(),
            open: Vec::new(),
            pending: None,
            text: String::new(),
            text_len: 0,
        }
    }

    /// Take the oldest completed node.
    pub fn next_node(&mut self) -> Option<Node> {
        self.output.pop_front()
    }

    /// Take every completed node.
    pub fn drain(&mut self) -> impl Iterator<Item = Node> + '_ {
        self.output.drain(..)
    }

    /// Number of completed nodes not yet taken.
    pub fn ready(&self) -> usize {
        self.output.len()
    }

    /// Number of elements whose start tag has closed but whose end tag has
    /// not been seen.
    pub fn open_elements(&self) -> usize {
        self.open.len()
    }

    fn depth(&self) -> usize {
        self.open.len()
    }

    fn emit(&mut self, node: Node) {
        trace!("Node {}", node);
        self.output.push_back(node);
    }

    fn append_text(&mut self, text: &str) -> XmlResult<()> {
        self.text_len += text.chars().count();
        if self.text_len > self.limits.max_text_length {
            return Err(XmlError::limit(format!(
                "text exceeds the maximum length of {} characters",
                self.limits.max_text_length
            )));
        }
        self.text.push_str(text);
        Ok(())
    }

    fn append_char(&mut self, c: char) -> XmlResult<()> {
        let mut buf = [0u8; 4];
        self.append_text(c.encode_utf8(&mut buf))
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        self.text_len = 0;
        let node = Node::new(NodeKind::Text, "", self.depth()).with_value(text);
        self.emit(node);
    }

    fn pending_mut(&mut self) -> XmlResult<&mut Node> {
        self.pending
            .as_mut()
            .ok_or_else(|| XmlError::syntax("attribute outside of a start tag"))
    }

    fn current_attribute(&mut self) -> XmlResult<&mut Attribute> {
        self.pending_mut()?
            .attributes
            .last_mut()
            .ok_or_else(|| XmlError::syntax("attribute value without an attribute name"))
    }

    /// Resolve the held start tag and queue it.
    fn finish_start_tag(&mut self, is_empty: bool) -> XmlResult<Option<OpenElement>> {
        let Some(mut element) = self.pending.take() else {
            return Ok(None);
        };
        element.is_empty_element = is_empty;

        for attr in &element.attributes {
            if attr.name() == "xmlns" {
                self.scopes.declare("", &attr.value())?;
            } else if attr.prefix() == Some("xmlns") {
                self.scopes.declare(attr.local_name(), &attr.value())?;
            }
        }

        check_qualified_name(&element.name)?;
        element.namespace_uri = self.scopes.resolve(element.prefix(), true)?.to_string();

        for i in 0..element.attributes.len() {
            let attr = &element.attributes[i];
            check_qualified_name(&attr.name)?;
            let uri = if attr.name() == "xmlns" {
                XMLNS_NAMESPACE.to_string()
            } else {
                self.scopes.resolve(attr.prefix(), false)?.to_string()
            };
            let attr_local = attr.local_name();
            if element.attributes[..i]
                .iter()
                .any(|a| a.local_name() == attr_local && a.namespace_uri == uri)
            {
                return Err(XmlError::namespace(format!(
                    "attribute '{}' duplicates another attribute in namespace '{}'",
                    attr.name(),
                    uri
                )));
            }
            element.attributes[i].namespace_uri = uri;
        }

        let open = OpenElement {
            name: element.name.clone(),
            namespace_uri: element.namespace_uri.clone(),
        };
        self.emit(element);
        Ok(Some(open))
    }
}

fn check_qualified_name(name: &QualifiedName) -> XmlResult<()> {
    if name.is_well_formed() {
        Ok(())
    } else {
        Err(XmlError::namespace(format!(
            "'{}' is not a well-formed qualified name",
            name
        )))
    }
}

impl ParseListener for NodeBuilder {
    fn push_element_name(&mut self, name: &str) -> XmlResult<()> {
        self.flush_text();
        self.scopes.push_scope();
        self.pending = Some(Node::new(NodeKind::Element, name, self.depth()));
        Ok(())
    }

    fn push_attribute_name(&mut self, name: &str, quote: char) -> XmlResult<()> {
        let max_attributes = self.limits.max_attributes;
        let element = self.pending_mut()?;
        if element.attributes.iter().any(|a| a.name() == name) {
            return Err(XmlError::syntax(format!(
                "duplicate attribute '{}' on element '{}'",
                name, element.name
            )));
        }
        if element.attributes.len() >= max_attributes {
            return Err(XmlError::limit(format!(
                "element has more than the maximum of {} attributes",
                max_attributes
            )));
        }
        let depth = element.depth + 1;
        element.attributes.push(Attribute::new(name, quote, depth));
        Ok(())
    }

    fn push_attribute_text(&mut self, text: &str) -> XmlResult<()> {
        let attr = self.current_attribute()?;
        match attr.segments.last_mut() {
            Some(Segment::Text(existing)) => existing.push_str(text),
            _ => attr.segments.push(Segment::Text(text.to_string())),
        }
        Ok(())
    }

    fn push_attribute_entity_ref(&mut self, name: &str) -> XmlResult<()> {
        let attr = self.current_attribute()?;
        let segment = match builtin_entity(name) {
            Some(c) => Segment::Text(c.to_string()),
            None => Segment::EntityReference(name.to_string()),
        };
        attr.segments.push(segment);
        Ok(())
    }

    fn push_attribute_char_ref(&mut self, code_point: char) -> XmlResult<()> {
        self.current_attribute()?
            .segments
            .push(Segment::Text(code_point.to_string()));
        Ok(())
    }

    fn push_close_start_tag(&mut self) -> XmlResult<()> {
        if let Some(open) = self.finish_start_tag(false)? {
            self.open.push(open);
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) -> XmlResult<()> {
        self.append_text(text)
    }

    fn push_char_ref(&mut self, code_point: char) -> XmlResult<()> {
        self.append_char(code_point)
    }

    fn push_entity_ref(&mut self, name: &str) -> XmlResult<()> {
        match builtin_entity(name) {
            Some(c) => self.append_char(c),
            None => {
                self.flush_text();
                let node = Node::new(NodeKind::EntityReference, name, self.depth());
                self.emit(node);
                Ok(())
            }
        }
    }

    fn push_close_empty_element(&mut self) -> XmlResult<()> {
        self.finish_start_tag(true)?;
        self.scopes.pop_scope();
        Ok(())
    }

    fn push_end_element(&mut self) -> XmlResult<()> {
        self.flush_text();
        let open = self
            .open
            .pop()
            .ok_or_else(|| XmlError::syntax("end tag without a matching start tag"))?;
        let mut node = Node::new(NodeKind::EndElement, open.name.as_str(), self.depth());
        node.namespace_uri = open.namespace_uri;
        self.emit(node);
        self.scopes.pop_scope();
        Ok(())
    }

    fn push_comment(&mut self, text: &str) -> XmlResult<()> {
        self.flush_text();
        let node = Node::new(NodeKind::Comment, "", self.depth()).with_value(text);
        self.emit(node);
        Ok(())
    }

    fn push_doctype(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> XmlResult<()> {
        let mut node = Node::new(NodeKind::DocumentType, name, 0);
        if let Some(public_id) = public_id {
            node.attributes.push(Attribute::pseudo("PUBLIC", public_id, 1));
        }
        if let Some(system_id) = system_id {
            node.attributes.push(Attribute::pseudo("SYSTEM", system_id, 1));
        }
        self.emit(node);
        Ok(())
    }

    fn push_xml_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<bool>,
    ) -> XmlResult<()> {
        let mut node = Node::new(NodeKind::XmlDeclaration, "xml", 0);
        let mut value = format!("version='{}'", version);
        node.attributes.push(Attribute::pseudo("version", version, 1));
        if let Some(encoding) = encoding {
            value.push_str(&format!(" encoding='{}'", encoding));
            node.attributes
                .push(Attribute::pseudo("encoding", encoding, 1));
        }
        if let Some(standalone) = standalone {
            let flag = if standalone { "yes" } else { "no" };
            value.push_str(&format!(" standalone='{}'", flag));
            node.attributes.push(Attribute::pseudo("standalone", flag, 1));
        }
        node.value = value;
        self.emit(node);
        Ok(())
    }

    fn push_parse_error(&mut self, line: usize, column: usize, message: &str) {
        debug!(
            "Node builder stopped by parse error at {}:{}: {} ({} nodes not yet taken)",
            line,
            column,
            message,
            self.output.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::XML_NAMESPACE;
    use sipxml_core::{PushParser, XmlErrorKind};

    fn build(input: &str) -> (Vec<Node>, XmlResult<()>) {
        let mut parser = PushParser::new(NodeBuilder::default());
        let result = parser.feed_str(input).and_then(|_| parser.finish());
        let nodes = parser.listener_mut().drain().collect();
        (nodes, result)
    }

    fn build_ok(input: &str) -> Vec<Node> {
        let (nodes, result) = build(input);
        result.unwrap();
        nodes
    }

    fn kinds(nodes: &[Node]) -> Vec<NodeKind> {
        nodes.iter().map(Node::kind).collect()
    }

    // ==================== Element tests ====================

    #[test]
    fn test_empty_root() {
        let nodes = build_ok("<a/>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind(), NodeKind::Element);
        assert_eq!(nodes[0].name(), "a");
        assert_eq!(nodes[0].depth(), 0);
        assert!(nodes[0].is_empty_element());
    }

    #[test]
    fn test_element_with_attribute_and_text() {
        let nodes = build_ok("<a x='1'>hi</a>");
        assert_eq!(
            kinds(&nodes),
            vec![NodeKind::Element, NodeKind::Text, NodeKind::EndElement]
        );
        let attr = &nodes[0].attributes()[0];
        assert_eq!(attr.name(), "x");
        assert_eq!(attr.value(), "1");
        assert_eq!(attr.depth(), 1);
        assert_eq!(attr.quote_char(), '\'');
        assert_eq!(nodes[1].value(), "hi");
        assert_eq!(nodes[1].depth(), 1);
        assert_eq!(nodes[2].name(), "a");
        assert_eq!(nodes[2].depth(), 0);
    }

    #[test]
    fn test_nesting_depths() {
        let nodes = build_ok("<a><b><c/></b></a>");
        let depths: Vec<(NodeKind, usize)> = nodes.iter().map(|n| (n.kind(), n.depth())).collect();
        assert_eq!(
            depths,
            vec![
                (NodeKind::Element, 0),
                (NodeKind::Element, 1),
                (NodeKind::Element, 2),
                (NodeKind::EndElement, 1),
                (NodeKind::EndElement, 0),
            ]
        );
    }

    // ==================== Text tests ====================

    #[test]
    fn test_references_coalesce_into_text() {
        let nodes = build_ok("<a>&lt;&#65;</a>");
        assert_eq!(nodes[1].kind(), NodeKind::Text);
        assert_eq!(nodes[1].value(), "<A");
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_unknown_entity_interrupts_text() {
        let nodes = build_ok("<a>x&ent;y</a>");
        assert_eq!(
            kinds(&nodes),
            vec![
                NodeKind::Element,
                NodeKind::Text,
                NodeKind::EntityReference,
                NodeKind::Text,
                NodeKind::EndElement
            ]
        );
        assert_eq!(nodes[2].name(), "ent");
        assert_eq!(nodes[2].depth(), 1);
    }

    #[test]
    fn test_comment_interrupts_text() {
        let nodes = build_ok("<a>x<!--c-->y</a>");
        assert_eq!(nodes[1].value(), "x");
        assert_eq!(nodes[2].kind(), NodeKind::Comment);
        assert_eq!(nodes[2].value(), "c");
        assert_eq!(nodes[3].value(), "y");
    }

    #[test]
    fn test_text_limit() {
        let limits = Limits {
            max_text_length: 3,
            ..Limits::default()
        };
        let mut parser = PushParser::with_limits(NodeBuilder::new(limits.clone()), limits);
        let err = parser.feed_str("<a>ab&amp;cd</a>").unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Limit);
    }

    // ==================== Attribute segment tests ====================

    #[test]
    fn test_attribute_segments() {
        let nodes = build_ok("<a v='value&amp;more'/>");
        let attr = &nodes[0].attributes()[0];
        assert_eq!(
            attr.segments(),
            &[
                Segment::Text("value".into()),
                Segment::Text("&more".into())
            ]
        );
        assert_eq!(attr.value(), "value&more");
    }

    #[test]
    fn test_attribute_unknown_entity_segment() {
        let nodes = build_ok("<a v='x&ent;&#65;'/>");
        let attr = &nodes[0].attributes()[0];
        assert_eq!(
            attr.segments(),
            &[
                Segment::Text("x".into()),
                Segment::EntityReference("ent".into()),
                Segment::Text("A".into())
            ]
        );
        assert_eq!(attr.value(), "x&ent;A");
    }

    #[test]
    fn test_duplicate_attribute() {
        let (_, result) = build("<a x='1' x='2'/>");
        let err = result.unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Syntax);
        assert_eq!(err.message, "duplicate attribute 'x' on element 'a'");
    }

    #[test]
    fn test_attribute_limit() {
        let limits = Limits {
            max_attributes: 1,
            ..Limits::default()
        };
        let mut parser = PushParser::with_limits(NodeBuilder::new(limits.clone()), limits);
        let err = parser.feed_str("<a x='1' y='2'/>").unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Limit);
    }

    // ==================== Namespace tests ====================

    #[test]
    fn test_prefixed_namespaces() {
        let nodes = build_ok("<p:a xmlns:p='urn:p' p:x='1' y='2'><p:b/></p:a>");
        assert_eq!(nodes[0].namespace_uri(), "urn:p");
        assert_eq!(nodes[0].local_name(), "a");
        assert_eq!(nodes[0].prefix(), Some("p"));
        let xmlns = nodes[0].attribute("xmlns:p").unwrap();
        assert_eq!(xmlns.namespace_uri(), XMLNS_NAMESPACE);
        assert_eq!(nodes[0].attribute_ns("x", "urn:p").unwrap().value(), "1");
        assert_eq!(nodes[0].attribute("y").unwrap().namespace_uri(), "");
        assert_eq!(nodes[1].namespace_uri(), "urn:p");
        assert_eq!(nodes[2].kind(), NodeKind::EndElement);
        assert_eq!(nodes[2].namespace_uri(), "urn:p");
    }

    #[test]
    fn test_default_namespace_applies_to_elements_only() {
        let nodes = build_ok("<a xmlns='urn:d' x='1'><b xmlns=''/></a>");
        assert_eq!(nodes[0].namespace_uri(), "urn:d");
        assert_eq!(nodes[0].attribute("x").unwrap().namespace_uri(), "");
        assert_eq!(nodes[1].namespace_uri(), "");
    }

    #[test]
    fn test_scope_ends_with_element() {
        let (_, result) = build("<r><a xmlns:p='urn:p'/><p:b/></r>");
        let err = result.unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Namespace);
        assert_eq!(err.message, "namespace prefix 'p' is not declared");
    }

    #[test]
    fn test_xml_prefix_is_predeclared() {
        let nodes = build_ok("<a xml:lang='en'/>");
        assert_eq!(nodes[0].attributes()[0].namespace_uri(), XML_NAMESPACE);
    }

    #[test]
    fn test_malformed_qualified_name() {
        let (_, result) = build("<a:/>");
        let err = result.unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Namespace);
        assert_eq!(err.message, "'a:' is not a well-formed qualified name");
    }

    #[test]
    fn test_expanded_name_duplicate() {
        let (_, result) = build("<a xmlns:p='urn:x' xmlns:q='urn:x' p:i='1' q:i='2'/>");
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::Namespace);
    }

    #[test]
    fn test_empty_prefixed_declaration() {
        let (_, result) = build("<a xmlns:p=''/>");
        assert_eq!(result.unwrap_err().kind, XmlErrorKind::Namespace);
    }

    // ==================== Declaration tests ====================

    #[test]
    fn test_xml_declaration_node() {
        let nodes = build_ok("<?xml version='1.0' encoding='UTF-8' standalone='yes'?><a/>");
        let decl = &nodes[0];
        assert_eq!(decl.kind(), NodeKind::XmlDeclaration);
        assert_eq!(decl.name(), "xml");
        assert_eq!(
            decl.value(),
            "version='1.0' encoding='UTF-8' standalone='yes'"
        );
        assert_eq!(decl.attribute("version").unwrap().value(), "1.0");
        assert_eq!(decl.attribute("encoding").unwrap().value(), "UTF-8");
        assert_eq!(decl.attribute("standalone").unwrap().value(), "yes");
    }

    #[test]
    fn test_doctype_node() {
        let nodes = build_ok("<!DOCTYPE html PUBLIC '-//W3C//DTD' 'x.dtd'><html/>");
        let doctype = &nodes[0];
        assert_eq!(doctype.kind(), NodeKind::DocumentType);
        assert_eq!(doctype.name(), "html");
        assert_eq!(doctype.attribute("PUBLIC").unwrap().value(), "-//W3C//DTD");
        assert_eq!(doctype.attribute("SYSTEM").unwrap().value(), "x.dtd");
    }

    #[test]
    fn test_comment_before_root() {
        let nodes = build_ok("<!--c--><a/>");
        assert_eq!(kinds(&nodes), vec![NodeKind::Comment, NodeKind::Element]);
        assert_eq!(nodes[0].depth(), 0);
    }

    // ==================== Error tests ====================

    #[test]
    fn test_nodes_before_error_survive() {
        let (nodes, result) = build("<a><b/></c>");
        assert!(result.is_err());
        assert_eq!(kinds(&nodes), vec![NodeKind::Element, NodeKind::Element]);
    }
}
