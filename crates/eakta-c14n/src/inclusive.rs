#![forbid(unsafe_code)]

//! Canonical XML 1.0 as applied to dossier subtrees.
//!
//! Algorithm URI: `http://www.w3.org/TR/2001/REC-xml-c14n-20010315`
//! With comments: `http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments`
//!
//! The subtree is serialized on its own: only prefixes the apex and its
//! descendants use or declare are rendered, each at the outermost element
//! that needs it.  Scope is tracked as a list of already-rendered prefixes
//! plus the current default namespace, and every child receives its own
//! copy so siblings never see each other's declarations.
//!
//! Signed dossiers in circulation were digested with this variant, so its
//! quirks are load-bearing: attributes are ordered by the namespace URI
//! concatenated with the local name, and whitespace characters in attribute
//! values are folded to spaces before escaping.

use crate::escape;
use crate::render::{self, Attr, NsDecl};
use eakta_core::Error;
use eakta_xml::StartTag;
use roxmltree::{Node, NodeType};

/// Canonicalize `node` and its descendants.
///
/// `node` may be an element or the document root.
pub fn canonicalize(node: Node<'_, '_>, with_comments: bool) -> Result<Vec<u8>, Error> {
    let mut output = Vec::new();
    let ctx = C14nContext { with_comments };
    ctx.process_node(node, &mut output, &Scope::default())?;
    Ok(output)
}

#[derive(Debug, Clone, Default)]
struct Scope {
    prefixes: Vec<String>,
    default_ns: String,
}

impl Scope {
    fn has(&self, prefix: &str) -> bool {
        self.prefixes.iter().any(|p| p == prefix)
    }

    fn declare(&mut self, decls: &mut Vec<NsDecl>, prefix: &str, uri: &str) {
        decls.push(NsDecl::new(prefix, uri));
        self.prefixes.push(prefix.to_owned());
    }
}

struct C14nContext {
    with_comments: bool,
}

impl C14nContext {
    fn process_node(
        &self,
        node: Node<'_, '_>,
        output: &mut Vec<u8>,
        scope: &Scope,
    ) -> Result<(), Error> {
        match node.node_type() {
            NodeType::Root => {
                for child in node.children() {
                    self.process_node(child, output, scope)?;
                }
            }
            NodeType::Element => self.process_element(node, output, scope)?,
            NodeType::Text => {
                let text = node.text().unwrap_or("");
                output.extend_from_slice(escape::escape_text_normalized(text).as_bytes());
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
        parent_scope: &Scope,
    ) -> Result<(), Error> {
        let tag = StartTag::scan(node)?;
        let mut scope = parent_scope.clone();
        let mut ns_decls: Vec<NsDecl> = Vec::new();

        // The element's own namespace.
        let elem_ns = node.tag_name().namespace().unwrap_or("");
        match tag.prefix() {
            Some(prefix) => {
                if !scope.has(prefix) {
                    scope.declare(&mut ns_decls, prefix, elem_ns);
                }
            }
            None => {
                if scope.default_ns != elem_ns {
                    ns_decls.push(NsDecl::new("", elem_ns));
                    scope.default_ns = elem_ns.to_owned();
                }
            }
        }

        // Prefixes declared on this element.
        for decl in tag.namespace_declarations() {
            let Some(prefix) = decl.name.strip_prefix("xmlns:") else {
                continue;
            };
            if scope.has(prefix) {
                continue;
            }
            let uri = node.lookup_namespace_uri(Some(prefix)).ok_or_else(|| {
                Error::Canonicalization(format!("prefix {prefix} declared but not bound"))
            })?;
            scope.declare(&mut ns_decls, prefix, uri);
        }

        // Prefixes used by attributes.
        let raw_attrs: Vec<_> = tag.plain_attributes().collect();
        if raw_attrs.len() != node.attributes().count() {
            return Err(Error::Canonicalization(format!(
                "attributes of <{}> do not match its start tag",
                tag.name
            )));
        }
        let mut attrs: Vec<Attr> = Vec::with_capacity(raw_attrs.len());
        for (raw, attr) in raw_attrs.iter().zip(node.attributes()) {
            let attr_ns = attr.namespace().unwrap_or("");
            if let Some(prefix) = raw.prefix() {
                if prefix != "xml" && prefix != "xmlns" && !scope.has(prefix) {
                    scope.declare(&mut ns_decls, prefix, attr_ns);
                }
            }
            attrs.push(Attr {
                ns_uri: attr_ns.to_owned(),
                local_name: attr.name().to_owned(),
                qualified_name: raw.name.to_owned(),
                value: attr.value().to_owned(),
            });
        }

        ns_decls.sort();
        attrs.sort_by(Attr::cmp_concatenated);

        output.push(b'<');
        output.extend_from_slice(tag.name.as_bytes());
        for ns_decl in &ns_decls {
            output.extend_from_slice(ns_decl.render().as_bytes());
        }
        for attr in &attrs {
            output.extend_from_slice(attr.render_normalized().as_bytes());
        }
        output.push(b'>');

        for child in node.children() {
            self.process_node(child, output, &scope)?;
        }

        output.extend_from_slice(b"</");
        output.extend_from_slice(tag.name.as_bytes());
        output.push(b'>');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTER: &str = include_str!("../../../test-data/register.xml");
    const REGISTER_C14N: &str = include_str!("../../../test-data/register.c14n");
    const REGISTER_C14N_COMMENTS: &str =
        include_str!("../../../test-data/register-comments.c14n");

    fn c14n(xml: &str, with_comments: bool) -> String {
        let doc = roxmltree::Document::parse(xml).unwrap();
        String::from_utf8(canonicalize(doc.root(), with_comments).unwrap()).unwrap()
    }

    fn c14n_by_id(xml: &str, id: &str) -> String {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let node = doc
            .descendants()
            .find(|n| n.attribute("Id") == Some(id))
            .unwrap();
        String::from_utf8(canonicalize(node, false).unwrap()).unwrap()
    }

    #[test]
    fn test_whole_document_matches_libxml2() {
        assert_eq!(c14n(REGISTER, false), REGISTER_C14N);
        assert_eq!(c14n(REGISTER, true), REGISTER_C14N_COMMENTS);
    }

    #[test]
    fn test_redeclared_default_namespace_rendered_once() {
        let out = c14n(r#"<a xmlns="urn:a"><b xmlns="urn:a">t</b></a>"#, false);
        assert_eq!(out, r#"<a xmlns="urn:a"><b>t</b></a>"#);
    }

    #[test]
    fn test_attribute_order_excludes_xmlns() {
        let out = c14n(r#"<e b="1" a="2" xmlns:x="urn:y"/>"#, false);
        assert_eq!(out, r#"<e xmlns:x="urn:y" a="2" b="1"></e>"#);
    }

    #[test]
    fn test_namespaced_attributes_sorted_after_plain() {
        let out = c14n_by_id(
            r#"<r xmlns:p="urn:z" xmlns:q="urn:a"><e Id="t" p:k="1" q:k="2" z="3"/></r>"#,
            "t",
        );
        assert_eq!(
            out,
            r#"<e xmlns:p="urn:z" xmlns:q="urn:a" Id="t" z="3" q:k="2" p:k="1"></e>"#
        );
    }

    #[test]
    fn test_subtree_pulls_only_used_prefixes() {
        let xml = r#"<es:Dossier xmlns:es="urn:es" xmlns:ds="urn:ds">
  <es:Profile Id="p"><es:Title>T</es:Title><ds:Note>n</ds:Note></es:Profile>
</es:Dossier>"#;
        assert_eq!(
            c14n_by_id(xml, "p"),
            r#"<es:Profile xmlns:es="urn:es" Id="p"><es:Title>T</es:Title><ds:Note xmlns:ds="urn:ds">n</ds:Note></es:Profile>"#
        );
    }

    #[test]
    fn test_sibling_declarations_do_not_leak() {
        let xml = r#"<r xmlns:a="urn:a"><x Id="x"><a:one/><a:two/></x></r>"#;
        assert_eq!(
            c14n_by_id(xml, "x"),
            r#"<x Id="x"><a:one xmlns:a="urn:a"></a:one><a:two xmlns:a="urn:a"></a:two></x>"#
        );
    }

    #[test]
    fn test_undeclared_default_namespace() {
        let xml = r#"<r xmlns="urn:d"><x Id="x"><y xmlns=""/></x></r>"#;
        assert_eq!(
            c14n_by_id(xml, "x"),
            r#"<x xmlns="urn:d" Id="x"><y xmlns=""></y></x>"#
        );
    }

    #[test]
    fn test_text_and_attribute_escaping() {
        let out = c14n(
            "<a v=\"x&#9;y&#10;z &amp; &lt; &quot;\">1 &lt; 2 &amp;&amp; 3 &gt; 2</a>",
            false,
        );
        assert_eq!(
            out,
            "<a v=\"x y z &amp; &lt; &quot;\">1 &lt; 2 &amp;&amp; 3 &gt; 2</a>"
        );
    }

    #[test]
    fn test_comments_only_with_comments() {
        let xml = "<!--before--><a><!--inside-->x</a><!--after-->";
        assert_eq!(c14n(xml, false), "<a>x</a>");
        assert_eq!(
            c14n(xml, true),
            "<!--before-->\n<a><!--inside-->x</a>\n<!--after-->"
        );
    }

    #[test]
    fn test_processing_instruction() {
        assert_eq!(c14n("<?pi data?><a/>", false), "<?pi data?>\n<a></a>");
    }

    #[test]
    fn test_deterministic() {
        let xml = r#"<r xmlns:b="urn:b" xmlns:a="urn:a"><a:x b:y="1" z="2">t</a:x></r>"#;
        assert_eq!(c14n(xml, false), c14n(xml, false));
    }
}
