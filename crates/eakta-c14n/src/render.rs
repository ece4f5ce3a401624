#![forbid(unsafe_code)]

//! Shared rendering pieces for C14N output.

use crate::escape;
use std::cmp::Ordering;

/// A namespace declaration to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    /// The prefix ("" for default namespace).
    pub prefix: String,
    /// The namespace URI.
    pub uri: String,
}

impl NsDecl {
    pub fn new(prefix: &str, uri: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            uri: uri.to_owned(),
        }
    }

    /// Render this namespace declaration to a string.
    pub fn render(&self) -> String {
        if self.prefix.is_empty() {
            format!(" xmlns=\"{}\"", escape::escape_attr(&self.uri))
        } else {
            format!(" xmlns:{}=\"{}\"", self.prefix, escape::escape_attr(&self.uri))
        }
    }
}

impl Ord for NsDecl {
    fn cmp(&self, other: &Self) -> Ordering {
        // Default namespace first, then by prefix.
        match (self.prefix.is_empty(), other.prefix.is_empty()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => self.prefix.cmp(&other.prefix),
        }
    }
}

impl PartialOrd for NsDecl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An attribute to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// The namespace URI of the attribute ("" for no namespace).
    pub ns_uri: String,
    /// The local name.
    pub local_name: String,
    /// The qualified name as written (prefix:local or just local).
    pub qualified_name: String,
    /// The attribute value.
    pub value: String,
}

impl Attr {
    /// Render with standard C14N attribute escaping.
    pub fn render(&self) -> String {
        format!(" {}=\"{}\"", self.qualified_name, escape::escape_attr(&self.value))
    }

    /// Render after folding whitespace characters in the value to spaces.
    pub fn render_normalized(&self) -> String {
        format!(
            " {}=\"{}\"",
            self.qualified_name,
            escape::escape_attr_normalized(&self.value)
        )
    }

    /// Unnamespaced attributes first, then by namespace URI concatenated
    /// with local name.
    pub fn cmp_concatenated(&self, other: &Self) -> Ordering {
        match (self.ns_uri.is_empty(), other.ns_uri.is_empty()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => {
                let left = self.ns_uri.chars().chain(self.local_name.chars());
                let right = other.ns_uri.chars().chain(other.local_name.chars());
                left.cmp(right)
            }
        }
    }
}

impl Ord for Attr {
    fn cmp(&self, other: &Self) -> Ordering {
        // Unnamespaced first; then (ns_uri, local_name).
        match (self.ns_uri.is_empty(), other.ns_uri.is_empty()) {
            (true, true) => self.local_name.cmp(&other.local_name),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .ns_uri
                .cmp(&other.ns_uri)
                .then(self.local_name.cmp(&other.local_name)),
        }
    }
}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns `true` when `node` sits directly under the document root.
fn at_document_level(node: roxmltree::Node<'_, '_>) -> bool {
    node.parent()
        .is_some_and(|p| p.node_type() == roxmltree::NodeType::Root)
}

/// Write `body` for a comment or PI, adding the newline separators the
/// canonical form requires outside the document element.
fn write_top_level(node: roxmltree::Node<'_, '_>, output: &mut Vec<u8>, body: &[u8]) {
    let top = at_document_level(node);
    if top && node.prev_siblings().any(|s| s.is_element()) {
        output.push(b'\n');
    }
    output.extend_from_slice(body);
    if top && node.next_siblings().any(|s| s.is_element()) {
        output.push(b'\n');
    }
}

/// Write a comment node.
pub fn write_comment(node: roxmltree::Node<'_, '_>, output: &mut Vec<u8>) {
    let text = node.text().unwrap_or("");
    let body = format!("<!--{text}-->");
    write_top_level(node, output, body.as_bytes());
}

/// Write a processing instruction node.
pub fn write_pi(node: roxmltree::Node<'_, '_>, output: &mut Vec<u8>) {
    let Some(pi) = node.pi() else {
        return;
    };
    let mut body = format!("<?{}", pi.target);
    if let Some(value) = pi.value.filter(|v| !v.is_empty()) {
        body.push(' ');
        body.push_str(&escape::escape_pi(value));
    }
    body.push_str("?>");
    write_top_level(node, output, body.as_bytes());
}
