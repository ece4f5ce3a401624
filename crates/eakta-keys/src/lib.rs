#![forbid(unsafe_code)]

//! Signer certificates and the public-key extraction boundary.
//!
//! A signature carries its signer certificate as bare base64 text.  This
//! crate wraps that text as PEM, reads descriptive fields from it, and
//! turns it into an RSA public key through a [`PublicKeyExtractor`].  Two
//! extractors ship: an in-process X.509 parser and one that shells out to
//! the `openssl` command-line tool.

pub mod certificate;
pub mod extractor;
pub mod openssl;

pub use certificate::{wrap_pem, CertificateInfo};
pub use extractor::{PublicKeyExtractor, X509KeyExtractor};
pub use openssl::OpensslKeyExtractor;
