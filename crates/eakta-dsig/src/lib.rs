#![forbid(unsafe_code)]

//! XML-DSig processing for signed dossiers.
//!
//! A [`SignedInfo`] is read once from the tree.  Verification is on demand:
//! [`SignedInfo::verify_references`] recomputes every reference digest and
//! returns the outcomes as data, and [`verify_signature_value`] checks the
//! signature over the canonical SignedInfo with a key obtained from the
//! context's [`PublicKeyExtractor`](eakta_keys::PublicKeyExtractor).

pub mod context;
pub mod object;
pub mod signed_info;
pub mod timestamp;
pub mod verify;

pub use context::DsigContext;
pub use signed_info::{Reference, SignedInfo};
pub use timestamp::{Timestamp, TimestampVerifier};
pub use verify::{verify_signature_value, ReferenceResult, ReferenceStatus};
