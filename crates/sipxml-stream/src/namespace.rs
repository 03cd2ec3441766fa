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

//! Scoped prefix to namespace URI bindings.
//!
//! One scope is pushed per element. Lookups walk from the innermost scope
//! outwards. The `xml` and `xmlns` prefixes are bound in a base scope that is
//! never popped. The default namespace is stored under the empty prefix; an
//! empty URI undeclares it.

use sipxml_core::{XmlError, XmlResult};
use smallvec::SmallVec;

/// `http://www.w3.org/XML/1998/namespace`
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// `http://www.w3.org/2000/xmlns/`
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

type Scope = SmallVec<[(String, String); 2]>;

/// Stack of namespace scopes.
#[derive(Debug, Clone)]
pub struct NamespaceScopes {
    scopes: Vec<Scope>,
}

impl Default for NamespaceScopes {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceScopes {
    pub fn new() -> Self {
        let mut base = Scope::new();
        base.push(("xml".to_string(), XML_NAMESPACE.to_string()));
        base.push(("xmlns".to_string(), XMLNS_NAMESPACE.to_string()));
        Self { scopes: vec![base] }
    }

    /// Enter an element.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Leave an element, dropping its declarations.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of element scopes currently open.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Bind `prefix` in the innermost scope. The empty prefix is the default
    /// namespace.
    pub fn declare(&mut self, prefix: &str, uri: &str) -> XmlResult<()> {
        match prefix {
            "xmlns" => {
                return Err(XmlError::namespace("the 'xmlns' prefix cannot be declared"));
            }
            "xml" if uri != XML_NAMESPACE => {
                return Err(XmlError::namespace(format!(
                    "the 'xml' prefix cannot be bound to '{}'",
                    uri
                )));
            }
            "" => {}
            _ if uri.is_empty() => {
                return Err(XmlError::namespace(format!(
                    "prefix '{}' cannot be bound to an empty namespace",
                    prefix
                )));
            }
            _ => {}
        }
        if prefix != "xml" && (uri == XML_NAMESPACE || uri == XMLNS_NAMESPACE) {
            return Err(XmlError::namespace(format!(
                "reserved namespace '{}' cannot be bound to '{}'",
                uri, prefix
            )));
        }

        if let Some(scope) = self.scopes.last_mut() {
            match scope.iter_mut().find(|(p, _)| p == prefix) {
                Some(binding) => binding.1 = uri.to_string(),
                None => scope.push((prefix.to_string(), uri.to_string())),
            }
        }
        Ok(())
    }

    /// Look up a prefix, innermost scope first.
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Resolve the prefix of an element or attribute name.
    ///
    /// A missing prefix resolves to the default namespace when
    /// `use_default` is set and to no namespace (`""`) otherwise. An unbound
    /// non-empty prefix is an error.
    pub fn resolve(&self, prefix: Option<&str>, use_default: bool) -> XmlResult<&str> {
        match prefix {
            Some(prefix) => self.lookup(prefix).ok_or_else(|| {
                XmlError::namespace(format!("namespace prefix '{}' is not declared", prefix))
            }),
            None if use_default => Ok(self.lookup("").unwrap_or("")),
            None => Ok(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sipxml_core::XmlErrorKind;

    #[test]
    fn test_predeclared_prefixes() {
        let scopes = NamespaceScopes::new();
        assert_eq!(scopes.lookup("xml"), Some(XML_NAMESPACE));
        assert_eq!(scopes.lookup("xmlns"), Some(XMLNS_NAMESPACE));
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.declare("p", "urn:outer").unwrap();
        scopes.push_scope();
        scopes.declare("p", "urn:inner").unwrap();
        assert_eq!(scopes.lookup("p"), Some("urn:inner"));
        scopes.pop_scope();
        assert_eq!(scopes.lookup("p"), Some("urn:outer"));
        scopes.pop_scope();
        assert_eq!(scopes.lookup("p"), None);
    }

    #[test]
    fn test_base_scope_never_popped() {
        let mut scopes = NamespaceScopes::new();
        scopes.pop_scope();
        scopes.pop_scope();
        assert_eq!(scopes.lookup("xml"), Some(XML_NAMESPACE));
    }

    // ==================== Default namespace tests ====================

    #[test]
    fn test_default_namespace() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.declare("", "urn:default").unwrap();
        assert_eq!(scopes.resolve(None, true).unwrap(), "urn:default");
        assert_eq!(scopes.resolve(None, false).unwrap(), "");
    }

    #[test]
    fn test_default_namespace_undeclared() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.declare("", "urn:default").unwrap();
        scopes.push_scope();
        scopes.declare("", "").unwrap();
        assert_eq!(scopes.resolve(None, true).unwrap(), "");
    }

    // ==================== Resolution errors ====================

    #[test]
    fn test_unbound_prefix() {
        let scopes = NamespaceScopes::new();
        let err = scopes.resolve(Some("q"), true).unwrap_err();
        assert_eq!(err.kind, XmlErrorKind::Namespace);
        assert_eq!(err.message, "namespace prefix 'q' is not declared");
    }

    #[test]
    fn test_reserved_declarations() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        assert!(scopes.declare("xmlns", "urn:x").is_err());
        assert!(scopes.declare("xml", "urn:x").is_err());
        assert!(scopes.declare("xml", XML_NAMESPACE).is_ok());
        assert!(scopes.declare("p", XMLNS_NAMESPACE).is_err());
        assert!(scopes.declare("p", "").is_err());
    }
}
