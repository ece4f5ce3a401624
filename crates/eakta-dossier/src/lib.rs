#![forbid(unsafe_code)]

//! The e-dossier object model.
//!
//! ```text
//! Dossier ─┬─ Signature ── SignedInfo, Timestamp, SignatureProfile ── Document
//!          └─ Document* ── Signature?
//! ```
//!
//! Everything is read and validated once from an indexed [`XmlTree`]
//! (see [`eakta_xml`]).  Validation failures abort construction; digest and
//! signature mismatches are reported later as data by the verification
//! methods on [`Signature`].
//!
//! [`XmlTree`]: eakta_xml::XmlTree

pub mod category;
pub mod document;
pub mod dossier;
pub mod profile;
pub mod signature;

pub use document::Document;
pub use dossier::Dossier;
pub use profile::{MimeType, SourceSize};
pub use signature::{Signature, SignatureProfile, SignedProperties, SigningCertificate};
