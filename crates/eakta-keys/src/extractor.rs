#![forbid(unsafe_code)]

//! The public-key extraction boundary.

use crate::certificate;
use async_trait::async_trait;
use der::Encode;
use eakta_core::Error;
use rsa::RsaPublicKey;
use spki::DecodePublicKey;

/// Turns a PEM signer certificate into the RSA public key that verifies
/// its signatures.
///
/// Implementations may call out to an external tool, so both operations
/// are asynchronous.  Every failure is reported as
/// [`Error::KeyExtraction`], including a certificate whose key is not RSA.
#[async_trait]
pub trait PublicKeyExtractor: Send + Sync {
    /// Extract the subject public key.
    async fn public_key(&self, pem: &str) -> Result<RsaPublicKey, Error>;

    /// The caIssuers URI advertised by the certificate, if any.
    async fn issuer_uri(&self, pem: &str) -> Result<Option<String>, Error>;
}

/// In-process extractor built on `x509-cert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509KeyExtractor;

impl X509KeyExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract(pem: &str) -> Result<RsaPublicKey, Error> {
        let cert = certificate::parse_pem(pem).map_err(key_error)?;
        let spki_der = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::KeyExtraction(format!("failed to encode SPKI: {e}")))?;
        RsaPublicKey::from_public_key_der(&spki_der)
            .map_err(|e| Error::KeyExtraction(format!("not an RSA public key: {e}")))
    }
}

#[async_trait]
impl PublicKeyExtractor for X509KeyExtractor {
    async fn public_key(&self, pem: &str) -> Result<RsaPublicKey, Error> {
        Self::extract(pem)
    }

    async fn issuer_uri(&self, pem: &str) -> Result<Option<String>, Error> {
        let cert = certificate::parse_pem(pem).map_err(key_error)?;
        certificate::ca_issuer_uri(&cert).map_err(key_error)
    }
}

fn key_error(err: Error) -> Error {
    match err {
        Error::KeyExtraction(_) => err,
        other => Error::KeyExtraction(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap_pem;
    use rsa::traits::PublicKeyParts;

    const CERT_PEM: &str = include_str!("../../../test-data/certificate.pem");
    const PUBLIC_KEY_PEM: &str = include_str!("../../../test-data/public-key.pem");
    const EC_CERT_B64: &str = include_str!("../../../test-data/ec-certificate.b64");

    #[tokio::test]
    async fn test_extracts_rsa_key() {
        let key = X509KeyExtractor::new().public_key(CERT_PEM).await.unwrap();
        let expected = RsaPublicKey::from_public_key_pem(PUBLIC_KEY_PEM).unwrap();
        assert_eq!(key, expected);
        assert_eq!(key.size(), 256);
    }

    #[tokio::test]
    async fn test_ec_key_is_extraction_error() {
        let err = X509KeyExtractor::new()
            .public_key(&wrap_pem(EC_CERT_B64))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::KeyExtraction(_)));
    }

    #[tokio::test]
    async fn test_garbage_is_extraction_error() {
        let err = X509KeyExtractor::new()
            .public_key("not a certificate")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::KeyExtraction(_)));
    }

    #[tokio::test]
    async fn test_issuer_uri() {
        let extractor = X509KeyExtractor::new();
        assert_eq!(
            extractor.issuer_uri(CERT_PEM).await.unwrap().as_deref(),
            Some("http://ca.example.hu/issuer.crt")
        );
        assert_eq!(
            extractor.issuer_uri(&wrap_pem(EC_CERT_B64)).await.unwrap(),
            None
        );
    }
}
