#![forbid(unsafe_code)]

//! XML Canonicalization (C14N) for signed dossiers.
//!
//! Recognizes all six W3C canonicalization identifiers and implements:
//! - Canonical XML 1.0 (with and without comments)
//! - Exclusive Canonical XML 1.0 (with and without comments)
//!
//! Canonical XML 1.1 is recognized so that a SignedInfo declaring it parses,
//! but canonicalizing with it fails with [`Error::UnsupportedAlgorithm`].

pub mod escape;
pub mod exclusive;
pub mod inclusive;
pub mod render;

use eakta_core::{algorithm, ns, Error};

/// The canonicalization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum C14nMode {
    /// Canonical XML 1.0
    Inclusive,
    /// Canonical XML 1.0 with comments
    InclusiveWithComments,
    /// Canonical XML 1.1
    Inclusive11,
    /// Canonical XML 1.1 with comments
    Inclusive11WithComments,
    /// Exclusive Canonical XML 1.0
    Exclusive,
    /// Exclusive Canonical XML 1.0 with comments
    ExclusiveWithComments,
}

impl C14nMode {
    /// Get the algorithm URI for this mode.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Inclusive => algorithm::C14N,
            Self::InclusiveWithComments => algorithm::C14N_WITH_COMMENTS,
            Self::Inclusive11 => algorithm::C14N11,
            Self::Inclusive11WithComments => algorithm::C14N11_WITH_COMMENTS,
            Self::Exclusive => algorithm::EXC_C14N,
            Self::ExclusiveWithComments => algorithm::EXC_C14N_WITH_COMMENTS,
        }
    }

    /// Parse a C14N mode from an algorithm URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            algorithm::C14N => Some(Self::Inclusive),
            algorithm::C14N_WITH_COMMENTS => Some(Self::InclusiveWithComments),
            algorithm::C14N11 => Some(Self::Inclusive11),
            algorithm::C14N11_WITH_COMMENTS => Some(Self::Inclusive11WithComments),
            algorithm::EXC_C14N => Some(Self::Exclusive),
            algorithm::EXC_C14N_WITH_COMMENTS => Some(Self::ExclusiveWithComments),
            _ => None,
        }
    }

    pub fn with_comments(&self) -> bool {
        matches!(
            self,
            Self::InclusiveWithComments
                | Self::Inclusive11WithComments
                | Self::ExclusiveWithComments
        )
    }
}

/// Canonicalize the subtree rooted at `node` with the algorithm named by
/// `algorithm_uri`.
///
/// For the exclusive variants an `InclusiveNamespaces` child of
/// `method_node` (the `CanonicalizationMethod` or `Transform` element that
/// named the algorithm) supplies the prefix list.
pub fn canonicalize(
    node: roxmltree::Node<'_, '_>,
    algorithm_uri: &str,
    method_node: Option<roxmltree::Node<'_, '_>>,
) -> Result<Vec<u8>, Error> {
    let mode = C14nMode::from_uri(algorithm_uri)
        .ok_or_else(|| Error::UnsupportedAlgorithm(algorithm_uri.to_owned()))?;
    let prefixes = method_node.map(read_inclusive_prefixes).unwrap_or_default();
    canonicalize_node(node, mode, &prefixes)
}

/// Canonicalize the subtree rooted at `node` (an element or the document
/// root).
///
/// - `mode`: which C14N variant to use
/// - `inclusive_prefixes`: for exclusive C14N, the InclusiveNamespaces PrefixList
pub fn canonicalize_node(
    node: roxmltree::Node<'_, '_>,
    mode: C14nMode,
    inclusive_prefixes: &[String],
) -> Result<Vec<u8>, Error> {
    match mode {
        C14nMode::Inclusive | C14nMode::InclusiveWithComments => {
            inclusive::canonicalize(node, mode.with_comments())
        }
        C14nMode::Exclusive | C14nMode::ExclusiveWithComments => {
            exclusive::canonicalize(node, mode.with_comments(), inclusive_prefixes)
        }
        C14nMode::Inclusive11 | C14nMode::Inclusive11WithComments => {
            Err(Error::UnsupportedAlgorithm(mode.uri().to_owned()))
        }
    }
}

/// Convenience: parse `xml` and canonicalize the whole document.
pub fn canonicalize_str(xml: &str, mode: C14nMode) -> Result<Vec<u8>, Error> {
    let doc = roxmltree::Document::parse_with_options(xml, eakta_xml::parsing_options())
        .map_err(|e| Error::XmlParse(e.to_string()))?;
    canonicalize_node(doc.root(), mode, &[])
}

/// Read the `PrefixList` of an `InclusiveNamespaces` child of `node`.
pub fn read_inclusive_prefixes(node: roxmltree::Node<'_, '_>) -> Vec<String> {
    for child in node.children() {
        if child.is_element() && child.tag_name().name() == ns::node::INCLUSIVE_NAMESPACES {
            if let Some(prefix_list) = child.attribute(ns::attr::PREFIX_LIST) {
                return prefix_list
                    .split_whitespace()
                    .map(|s| s.to_owned())
                    .collect();
            }
        }
    }
    Vec::new()
}
