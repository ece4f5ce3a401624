#![forbid(unsafe_code)]

//! Cryptographic primitives for dossier verification.
//!
//! The digest algorithm is fixed to SHA-256 and the signature algorithm to
//! RSA PKCS#1 v1.5 with SHA-256, whatever a document declares.

pub mod digest;
pub mod sign;

pub use digest::sha256;
pub use sign::verify_rsa_sha256;
