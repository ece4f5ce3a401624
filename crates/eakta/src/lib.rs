#![forbid(unsafe_code)]

//! Signed electronic dossier (e-akta) verification.
//!
//! Re-exports the workspace crates under short names.

pub use eakta_core as core;
pub use eakta_xml as xml;
pub use eakta_c14n as c14n;
pub use eakta_crypto as crypto;
pub use eakta_keys as keys;
pub use eakta_transforms as transforms;
pub use eakta_dsig as dsig;
pub use eakta_dossier as dossier;

pub use eakta_core::{Error, ErrorKind};
pub use eakta_dossier::{Document, Dossier, Signature};
