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

//! Owned element trees built by [`XmlReader::read_subtree`](crate::XmlReader::read_subtree).

use crate::node::{Node, NodeKind};
use std::fmt;

/// An element and everything inside it.
///
/// Leaves are text, comment, entity reference and empty element nodes. End
/// tags are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    pub(crate) node: Node,
    pub(crate) children: Vec<XmlTree>,
}

impl XmlTree {
    pub(crate) fn new(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub fn children(&self) -> &[XmlTree] {
        &self.children
    }

    /// Child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &XmlTree> {
        self.children
            .iter()
            .filter(|c| c.node.kind() == NodeKind::Element)
    }

    /// First child element with the given qualified name.
    pub fn find(&self, name: &str) -> Option<&XmlTree> {
        self.elements().find(|c| c.name() == name)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if self.node.kind() == NodeKind::Text {
            out.push_str(self.node.value());
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Number of nodes in the tree, the root included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(XmlTree::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        let node = &self.node;
        match node.kind() {
            NodeKind::Element => {
                write!(f, "{}<{}", pad, node.name())?;
                for attr in node.attributes() {
                    write!(f, " {}={:?}", attr.name(), attr.value())?;
                }
                if self.children.is_empty() {
                    return writeln!(f, "/>");
                }
                writeln!(f, ">")?;
                for child in &self.children {
                    child.write_indented(f, indent + 1)?;
                }
                writeln!(f, "{}</{}>", pad, node.name())
            }
            NodeKind::Text => writeln!(f, "{}{:?}", pad, node.value()),
            NodeKind::Comment => writeln!(f, "{}<!--{}-->", pad, node.value()),
            NodeKind::EntityReference => writeln!(f, "{}&{};", pad, node.name()),
            _ => writeln!(f, "{}{}", pad, node),
        }
    }
}

impl fmt::Display for XmlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, depth: usize) -> Node {
        Node::new(NodeKind::Element, name, depth)
    }

    fn text(value: &str, depth: usize) -> XmlTree {
        XmlTree::new(Node::new(NodeKind::Text, "", depth).with_value(value))
    }

    fn sample() -> XmlTree {
        let mut item = XmlTree::new(element("item", 1));
        item.children.push(text("tea", 2));
        let mut root = XmlTree::new(element("list", 0));
        root.children.push(item);
        root.children.push(text(" ", 1));
        root.children.push(XmlTree::new(element("end", 1)));
        root
    }

    #[test]
    fn test_text_collects_descendants() {
        assert_eq!(sample().text(), "tea ");
    }

    #[test]
    fn test_find_and_elements() {
        let tree = sample();
        assert_eq!(tree.elements().count(), 2);
        assert_eq!(tree.find("item").map(XmlTree::text), Some("tea".to_string()));
        assert!(tree.find("missing").is_none());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "<list>\n  <item>\n    \"tea\"\n  </item>\n  \" \"\n  <end/>\n</list>\n"
        );
    }
}
