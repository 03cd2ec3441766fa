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

//! Pull-style XML reading on top of `sipxml-core`.
//!
//! The grammar engine pushes events; this crate turns them into nodes and
//! lets callers pull those nodes one at a time.
//!
//! - [`NodeBuilder`]: assembles listener events into [`Node`]s and resolves
//!   namespace prefixes
//! - [`channel`]: connects an [`XmlFeeder`] (producer) to an [`XmlReader`]
//!   (consumer) over a shared queue; the two ends may run on different threads
//! - [`XmlReader`]: the cursor, with attribute navigation and a
//!   single-outstanding-read rule
//! - [`XmlStreamReader`]: a node iterator that feeds lines from a reader on
//!   demand
//!
//! # Quick Start
//!
//! ```rust
//! use sipxml_stream::{NodeKind, ReaderConfig, XmlReader};
//!
//! let xml = "<order xmlns='urn:shop' id='17'><item>tea</item></order>";
//! let mut reader = XmlReader::from_str(xml, ReaderConfig::default());
//!
//! reader.read().unwrap();
//! assert_eq!(reader.kind(), NodeKind::Element);
//! assert_eq!(reader.namespace_uri(), "urn:shop");
//! assert_eq!(reader.get_attribute_by_name("id").unwrap().as_deref(), Some("17"));
//!
//! let tree = reader.read_subtree().unwrap();
//! assert_eq!(tree.find("item").unwrap().text(), "tea");
//! ```
//!
//! # Producer and consumer on different threads
//!
//! ```rust
//! use sipxml_stream::{channel, ReaderConfig};
//! use std::thread;
//!
//! let (mut feeder, mut reader) = channel(ReaderConfig::default());
//! let producer = thread::spawn(move || {
//!     for piece in ["<a>", "<b/>", "</a>"] {
//!         feeder.feed(piece).unwrap();
//!     }
//!     feeder.finish().unwrap();
//! });
//!
//! let mut names = Vec::new();
//! while reader.read().unwrap() {
//!     names.push(reader.name().to_string());
//! }
//! producer.join().unwrap();
//! assert_eq!(names, ["a", "b", "a"]);
//! ```

mod builder;
mod config;
mod namespace;
mod node;
mod queue;
mod reader;
mod source;
mod subtree;

pub use builder::{builtin_entity, NodeBuilder};
pub use config::ReaderConfig;
pub use namespace::{NamespaceScopes, XMLNS_NAMESPACE, XML_NAMESPACE};
pub use node::{Attribute, Node, NodeKind, QualifiedName, Segment};
pub use queue::{channel, XmlFeeder};
pub use reader::{PendingRead, ReadState, XmlReader};
pub use source::XmlStreamReader;
pub use subtree::XmlTree;

pub use sipxml_core::{Limits, TextPosition, XmlError, XmlErrorKind, XmlResult};
