#![forbid(unsafe_code)]

//! The `SignedInfo` block and its references.

use eakta_core::{algorithm, ns, Error};
use eakta_xml::{find, XmlTree};
use std::sync::Arc;

type Node<'a> = roxmltree::Node<'a, 'a>;

/// One `ds:Reference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The reference's own `Id`, when it has one.
    pub id: Option<String>,
    /// Identifier of the referenced element, without the leading `#`.
    pub uri: String,
    /// Declared digest method URI.  Recorded, not used to pick the hash.
    pub digest_method: String,
    /// Declared digest, base64 as written (whitespace removed).
    pub digest_value: String,
    /// Transform algorithm URIs in declared order.
    pub transforms: Vec<String>,
    /// InclusiveNamespaces prefix list of the first transform.
    pub inclusive_prefixes: Vec<String>,
}

impl Reference {
    fn from_node(node: Node<'_>) -> Result<Self, Error> {
        let uri = node
            .attribute(ns::attr::URI)
            .ok_or_else(|| Error::MissingAttribute("URI on Reference".into()))?;
        let uri = uri.strip_prefix('#').unwrap_or(uri).to_owned();

        let digest_method = find::child(node, ns::DSIG, ns::node::DIGEST_METHOD)
            .ok_or_else(|| Error::MissingElement(format!("DigestMethod in Reference #{uri}")))?
            .attribute(ns::attr::ALGORITHM)
            .ok_or_else(|| Error::MissingAttribute("Algorithm on DigestMethod".into()))?
            .to_owned();

        let digest_value: String = find::child(node, ns::DSIG, ns::node::DIGEST_VALUE)
            .and_then(find::first_text)
            .ok_or_else(|| Error::MissingElement(format!("DigestValue in Reference #{uri}")))?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let mut transforms = Vec::new();
        let mut inclusive_prefixes = Vec::new();
        if let Some(list) = find::child(node, ns::DSIG, ns::node::TRANSFORMS) {
            for (i, transform) in find::children(list, ns::DSIG, ns::node::TRANSFORM)
                .into_iter()
                .enumerate()
            {
                let algorithm = transform
                    .attribute(ns::attr::ALGORITHM)
                    .ok_or_else(|| Error::MissingAttribute("Algorithm on Transform".into()))?;
                if i == 0 {
                    inclusive_prefixes = eakta_c14n::read_inclusive_prefixes(transform);
                }
                transforms.push(algorithm.to_owned());
            }
        }

        Ok(Self {
            id: node.attribute(ns::attr::ID).map(str::to_owned),
            uri,
            digest_method,
            digest_value,
            transforms,
            inclusive_prefixes,
        })
    }

    /// The first transform, when it names a canonicalization algorithm.
    pub fn canonicalization(&self) -> Option<&str> {
        self.transforms
            .first()
            .map(String::as_str)
            .filter(|uri| algorithm::is_canonicalization(uri))
    }
}

/// A parsed `ds:SignedInfo`.
///
/// Borrows the indexed tree so references can be resolved anywhere in the
/// document.
pub struct SignedInfo<'a> {
    node: Node<'a>,
    tree: &'a XmlTree<'a>,
    canonicalization: String,
    inclusive_prefixes: Vec<String>,
    signature_method: String,
    certificate_pem: Arc<str>,
    references: Vec<Reference>,
}

impl<'a> SignedInfo<'a> {
    /// Read a `ds:SignedInfo` element.
    ///
    /// The canonicalization method must be one of the six C14N identifiers.
    /// References are keyed by URI: a second reference to the same element
    /// replaces the first, keeping its position.
    pub fn from_node(
        node: Node<'a>,
        tree: &'a XmlTree<'a>,
        certificate_pem: Arc<str>,
    ) -> Result<Self, Error> {
        let c14n_node = find::child(node, ns::DSIG, ns::node::CANONICALIZATION_METHOD)
            .ok_or_else(|| Error::MissingElement("CanonicalizationMethod".into()))?;
        let canonicalization = c14n_node
            .attribute(ns::attr::ALGORITHM)
            .ok_or_else(|| Error::MissingAttribute("Algorithm on CanonicalizationMethod".into()))?;
        if !algorithm::is_canonicalization(canonicalization) {
            return Err(Error::UnsupportedAlgorithm(format!(
                "canonicalization method: {canonicalization}"
            )));
        }

        let signature_method = find::child(node, ns::DSIG, ns::node::SIGNATURE_METHOD)
            .ok_or_else(|| Error::MissingElement("SignatureMethod".into()))?
            .attribute(ns::attr::ALGORITHM)
            .ok_or_else(|| Error::MissingAttribute("Algorithm on SignatureMethod".into()))?;

        let mut references: Vec<Reference> = Vec::new();
        for reference_node in find::children(node, ns::DSIG, ns::node::REFERENCE) {
            let reference = Reference::from_node(reference_node)?;
            match references.iter_mut().find(|r| r.uri == reference.uri) {
                Some(existing) => {
                    tracing::warn!(uri = %reference.uri, "duplicate reference URI, keeping the last one");
                    *existing = reference;
                }
                None => references.push(reference),
            }
        }

        Ok(Self {
            node,
            tree,
            canonicalization: canonicalization.to_owned(),
            inclusive_prefixes: eakta_c14n::read_inclusive_prefixes(c14n_node),
            signature_method: signature_method.to_owned(),
            certificate_pem,
            references,
        })
    }

    pub fn node(&self) -> Node<'a> {
        self.node
    }

    pub fn tree(&self) -> &'a XmlTree<'a> {
        self.tree
    }

    /// The declared canonicalization method URI.
    pub fn canonicalization(&self) -> &str {
        &self.canonicalization
    }

    pub(crate) fn inclusive_prefixes(&self) -> &[String] {
        &self.inclusive_prefixes
    }

    /// The declared signature method URI.
    pub fn signature_method(&self) -> &str {
        &self.signature_method
    }

    /// PEM of the certificate this block is verified against.
    pub fn certificate_pem(&self) -> &str {
        &self.certificate_pem
    }

    /// References in first-seen order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Look up a reference by the identifier it points at.
    pub fn reference(&self, uri: &str) -> Option<&Reference> {
        let uri = uri.strip_prefix('#').unwrap_or(uri);
        self.references.iter().find(|r| r.uri == uri)
    }
}

impl std::fmt::Debug for SignedInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedInfo")
            .field("canonicalization", &self.canonicalization)
            .field("signature_method", &self.signature_method)
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}
