#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0 (exc-C14N).
//!
//! Algorithm URI: `http://www.w3.org/2001/10/xml-exc-c14n#`
//! With comments: `http://www.w3.org/2001/10/xml-exc-c14n#WithComments`
//!
//! Only "visibly utilized" namespace declarations are output.  A namespace
//! is visibly utilized if its prefix is used by the element's tag name or
//! by one of its attributes, or if it appears in the InclusiveNamespaces
//! PrefixList.

use crate::escape;
use crate::render::{self, Attr, NsDecl};
use eakta_core::{ns, Error};
use eakta_xml::StartTag;
use roxmltree::{Node, NodeType};
use std::collections::{BTreeMap, HashSet};

/// Canonicalize `node` and its descendants using Exclusive C14N 1.0.
pub fn canonicalize(
    node: Node<'_, '_>,
    with_comments: bool,
    inclusive_prefixes: &[String],
) -> Result<Vec<u8>, Error> {
    let inclusive_prefixes: HashSet<String> = inclusive_prefixes
        .iter()
        .map(|p| if p == "#default" { String::new() } else { p.clone() })
        .collect();
    let mut output = Vec::new();
    let ctx = ExcC14nContext {
        with_comments,
        inclusive_prefixes,
    };
    ctx.process_node(node, &mut output, &BTreeMap::new())?;
    Ok(output)
}

struct ExcC14nContext {
    with_comments: bool,
    inclusive_prefixes: HashSet<String>,
}

impl ExcC14nContext {
    fn process_node(
        &self,
        node: Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        match node.node_type() {
            NodeType::Root => {
                for child in node.children() {
                    self.process_node(child, output, rendered_ns)?;
                }
            }
            NodeType::Element => self.process_element(node, output, rendered_ns)?,
            NodeType::Text => {
                let text = node.text().unwrap_or("");
                output.extend_from_slice(escape::escape_text(text).as_bytes());
            }
            NodeType::Comment => {
                if self.with_comments {
                    render::write_comment(node, output);
                }
            }
            NodeType::PI => render::write_pi(node, output),
        }
        Ok(())
    }

    fn process_element(
        &self,
        node: Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        let tag = StartTag::scan(node)?;

        let mut utilized_prefixes: HashSet<String> = HashSet::new();
        utilized_prefixes.insert(tag.prefix().unwrap_or("").to_owned());
        for raw in tag.plain_attributes() {
            if let Some(prefix) = raw.prefix() {
                utilized_prefixes.insert(prefix.to_owned());
            }
        }
        utilized_prefixes.extend(self.inclusive_prefixes.iter().cloned());

        let inscope_ns = inscope_namespaces(node);

        let mut ns_decls: Vec<NsDecl> = Vec::new();
        for prefix in &utilized_prefixes {
            if prefix == "xml" {
                continue;
            }
            if let Some(uri) = inscope_ns.get(prefix) {
                if rendered_ns.get(prefix) != Some(uri) {
                    ns_decls.push(NsDecl::new(prefix, uri));
                }
            } else if prefix.is_empty() {
                // The default namespace was undeclared below an ancestor
                // that rendered one.
                if rendered_ns.get("").is_some_and(|uri| !uri.is_empty()) {
                    ns_decls.push(NsDecl::new("", ""));
                }
            }
        }
        ns_decls.sort();

        let raw_attrs: Vec<_> = tag.plain_attributes().collect();
        if raw_attrs.len() != node.attributes().count() {
            return Err(Error::Canonicalization(format!(
                "attributes of <{}> do not match its start tag",
                tag.name
            )));
        }
        let mut attrs: Vec<Attr> = raw_attrs
            .iter()
            .zip(node.attributes())
            .map(|(raw, attr)| Attr {
                ns_uri: attr.namespace().unwrap_or("").to_owned(),
                local_name: attr.name().to_owned(),
                qualified_name: raw.name.to_owned(),
                value: attr.value().to_owned(),
            })
            .collect();
        attrs.sort();

        output.push(b'<');
        output.extend_from_slice(tag.name.as_bytes());
        for ns_decl in &ns_decls {
            output.extend_from_slice(ns_decl.render().as_bytes());
        }
        for attr in &attrs {
            output.extend_from_slice(attr.render().as_bytes());
        }
        output.push(b'>');

        let mut child_rendered_ns = rendered_ns.clone();
        for ns_decl in ns_decls {
            child_rendered_ns.insert(ns_decl.prefix, ns_decl.uri);
        }

        for child in node.children() {
            self.process_node(child, output, &child_rendered_ns)?;
        }

        output.extend_from_slice(b"</");
        output.extend_from_slice(tag.name.as_bytes());
        output.push(b'>');
        Ok(())
    }
}

/// All namespaces in scope for an element, keyed by prefix ("" for the
/// default namespace).  Undeclared default namespaces are left out.
fn inscope_namespaces(node: Node<'_, '_>) -> BTreeMap<String, String> {
    node.namespaces()
        .filter(|n| !n.uri().is_empty() && n.uri() != ns::XML)
        .map(|n| (n.name().unwrap_or("").to_owned(), n.uri().to_owned()))
        .collect()
}
