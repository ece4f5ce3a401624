#![forbid(unsafe_code)]

//! The dossier root aggregate.

use crate::category;
use crate::document::Document;
use crate::profile;
use crate::signature::Signature;
use chrono::{DateTime, Utc};
use eakta_core::{ns, Error};
use eakta_xml::{find, XmlTree};

/// A signed electronic dossier (`es:Dossier`).
///
/// Borrows the indexed tree it was built from.  Construction validates
/// every profile; verification is left to the signatures.
#[derive(Debug)]
pub struct Dossier<'a> {
    pub title: String,
    pub category: Option<String>,
    pub creation_date: DateTime<Utc>,
    metadata: Vec<(String, String)>,
    documents: Vec<(String, Document<'a>)>,
    pub signature: Option<Signature<'a>>,
}

impl<'a> Dossier<'a> {
    /// Build the dossier from the document element of `tree`.
    pub fn from_tree(tree: &'a XmlTree<'a>) -> Result<Self, Error> {
        let root = tree.root_element();
        if root.tag_name().name() != ns::node::DOSSIER {
            return Err(Error::XmlStructure(format!(
                "expected Dossier root element, found {}",
                root.tag_name().name()
            )));
        }

        let profile = find::child_local(root, ns::node::DOSSIER_PROFILE)
            .ok_or_else(|| Error::MissingProperty(ns::node::DOSSIER_PROFILE.into()))?;
        let title = profile::required_text(profile, ns::node::TITLE)?.to_owned();
        let creation_date = profile::creation_date(profile)?;
        let category =
            category::dossier_category(profile::optional_text(profile, ns::node::E_CATEGORY))?;
        let metadata = read_metadata(profile);

        let signatures = find::children(root, ns::DSIG, ns::node::SIGNATURE);
        if signatures.len() > 1 {
            tracing::warn!(
                count = signatures.len(),
                "dossier has several signatures, using the first"
            );
        }
        let signature = signatures
            .first()
            .map(|sig| Signature::from_node(*sig, tree))
            .transpose()?;

        let mut documents: Vec<(String, Document<'a>)> = Vec::new();
        if let Some(list) = find::child_local(root, ns::node::DOCUMENTS) {
            for node in find::children_local(list, ns::node::DOCUMENT) {
                let document = Document::from_node(node, tree)?;
                match documents.iter_mut().find(|(t, _)| *t == document.title) {
                    Some(entry) => {
                        tracing::warn!(title = %document.title, "duplicate document title, keeping the last one");
                        entry.1 = document;
                    }
                    None => documents.push((document.title.clone(), document)),
                }
            }
        }

        tracing::debug!(
            title = %title,
            documents = documents.len(),
            signed = signature.is_some(),
            "read dossier"
        );

        Ok(Self {
            title,
            category,
            creation_date,
            metadata,
            documents,
            signature,
        })
    }

    /// Documents keyed by title, in first-seen order.
    pub fn documents(&self) -> impl Iterator<Item = &Document<'a>> {
        self.documents.iter().map(|(_, doc)| doc)
    }

    pub fn document(&self, title: &str) -> Option<&Document<'a>> {
        self.documents
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, doc)| doc)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// `mireg` metadata as name/text pairs in document order.
    pub fn metadata(&self) -> &[(String, String)] {
        &self.metadata
    }

    /// Every signature in the dossier: the dossier's own first, then the
    /// documents' in order.  A signature is followed by the signature of its
    /// comment document, if that is signed too.
    pub fn signatures(&self) -> impl Iterator<Item = &Signature<'a>> {
        let mut found = Vec::new();
        for sig in self
            .signature
            .iter()
            .chain(self.documents().filter_map(|doc| doc.signature.as_ref()))
        {
            collect_signatures(sig, &mut found);
        }
        found.into_iter()
    }
}

fn collect_signatures<'s, 'a>(sig: &'s Signature<'a>, found: &mut Vec<&'s Signature<'a>>) {
    found.push(sig);
    if let Some(inner) = sig.comment_document().and_then(|doc| doc.signature.as_ref()) {
        collect_signatures(inner, found);
    }
}

/// Leaf children of `Metadata/metadata/mireg`.
fn read_metadata(profile: roxmltree::Node<'_, '_>) -> Vec<(String, String)> {
    let Some(mireg) = find::child_local(profile, ns::node::METADATA)
        .and_then(|m| find::child_local(m, ns::node::MIREG_METADATA))
        .and_then(|m| find::child_local(m, ns::node::MIREG))
    else {
        return Vec::new();
    };
    mireg
        .children()
        .filter(|n| n.is_element())
        .map(|n| {
            let text = n.text().map(str::trim).unwrap_or("");
            (n.tag_name().name().to_owned(), text.to_owned())
        })
        .collect()
}
