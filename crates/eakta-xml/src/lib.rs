#![forbid(unsafe_code)]

//! XML document abstraction for e-dossier processing.
//!
//! Wraps `roxmltree` with an identifier index built once per document, a
//! start-tag scanner that recovers the prefixes `roxmltree` resolves away,
//! and the element lookup helpers the model and verifier crates share.

pub mod document;
pub mod find;
pub mod tag;

pub use document::{IdIndex, XmlDocument, XmlTree};
pub use tag::StartTag;

/// Return roxmltree parsing options that allow DTD.
///
/// roxmltree does not expand external entities, so an internal DTD subset
/// is harmless.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}
