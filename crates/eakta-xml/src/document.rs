#![forbid(unsafe_code)]

//! XML document wrapper over roxmltree with identifier indexing.

use eakta_core::{ns, Error};
use std::collections::{HashMap, HashSet};

/// An owned XML document.  Stores the text and the identifier attribute
/// names to index.
///
/// To work with the parsed tree, call [`XmlDocument::parse_doc`] which
/// returns a `roxmltree::Document` borrowing from the text, then wrap it
/// in an [`XmlTree`].
pub struct XmlDocument {
    text: String,
    id_attrs: Vec<String>,
}

impl XmlDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self, Error> {
        roxmltree::Document::parse_with_options(&text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        Ok(Self {
            text,
            id_attrs: vec![ns::attr::ID.to_owned()],
        })
    }

    /// Parse and validate XML from bytes.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))?
            .to_owned();
        Self::parse(text)
    }

    /// Read and parse a file.
    pub fn read(path: &std::path::Path) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        Self::parse_bytes(&data)
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Register an additional identifier attribute name besides `Id`.
    pub fn add_id_attr(&mut self, name: &str) {
        if !self.id_attrs.iter().any(|a| a == name) {
            self.id_attrs.push(name.to_owned());
        }
    }

    /// The identifier attribute names that [`XmlDocument::tree`] indexes.
    pub fn id_attrs(&self) -> &[String] {
        &self.id_attrs
    }

    /// Parse the document and return a `roxmltree::Document`.
    ///
    /// Call this once at the top of a processing pipeline and keep the
    /// result alive for as long as the model built on it.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>, Error> {
        roxmltree::Document::parse_with_options(&self.text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))
    }

    /// Index a parsed document with this document's identifier attributes.
    pub fn tree<'a>(&self, doc: &'a roxmltree::Document<'a>) -> XmlTree<'a> {
        XmlTree::with_id_attrs(doc, &self.id_attrs)
    }
}

/// Identifier → element mapping, built once per document.
///
/// An identifier carried by more than one element is ambiguous and never
/// resolves.
#[derive(Debug, Default)]
pub struct IdIndex {
    map: HashMap<String, roxmltree::NodeId>,
    ambiguous: HashSet<String>,
}

impl IdIndex {
    /// Walk the whole document once, recording every element carrying one
    /// of `attr_names`.
    pub fn build(doc: &roxmltree::Document<'_>, attr_names: &[String]) -> Self {
        let mut index = IdIndex::default();
        for node in doc.descendants().filter(|n| n.is_element()) {
            for attr_name in attr_names {
                let Some(value) = node.attribute(attr_name.as_str()) else {
                    continue;
                };
                if index.ambiguous.contains(value) {
                    continue;
                }
                match index.map.get(value) {
                    Some(existing) if *existing != node.id() => {
                        tracing::warn!(id = value, "identifier used by more than one element");
                        index.map.remove(value);
                        index.ambiguous.insert(value.to_owned());
                    }
                    Some(_) => {}
                    None => {
                        index.map.insert(value.to_owned(), node.id());
                    }
                }
            }
        }
        index
    }

    /// Look up the element carrying `id`.
    pub fn get(&self, id: &str) -> Option<roxmltree::NodeId> {
        self.map.get(id).copied()
    }

    /// Returns `true` if `id` appears on more than one element.
    pub fn is_ambiguous(&self, id: &str) -> bool {
        self.ambiguous.contains(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A parsed document paired with its identifier index.
///
/// The model types borrow this for their whole lifetime; it is the
/// non-owning parent handle every signature uses to resolve references
/// anywhere in the document.
pub struct XmlTree<'a> {
    doc: &'a roxmltree::Document<'a>,
    ids: IdIndex,
}

impl<'a> XmlTree<'a> {
    /// Index `doc` on the `Id` attribute.
    pub fn new(doc: &'a roxmltree::Document<'a>) -> Self {
        Self::with_id_attrs(doc, &[ns::attr::ID.to_owned()])
    }

    /// Index `doc` on the given identifier attribute names.
    pub fn with_id_attrs(doc: &'a roxmltree::Document<'a>, attr_names: &[String]) -> Self {
        Self {
            doc,
            ids: IdIndex::build(doc, attr_names),
        }
    }

    pub fn document(&self) -> &'a roxmltree::Document<'a> {
        self.doc
    }

    pub fn root_element(&self) -> roxmltree::Node<'a, 'a> {
        self.doc.root_element()
    }

    pub fn ids(&self) -> &IdIndex {
        &self.ids
    }

    /// Find the element whose identifier equals `id`, anywhere in the
    /// document.
    pub fn element_by_id(&self, id: &str) -> Option<roxmltree::Node<'a, 'a>> {
        let node_id = self.ids.get(id)?;
        self.doc.get_node(node_id)
    }
}
