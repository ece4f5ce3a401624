#![forbid(unsafe_code)]

//! RSA PKCS#1 v1.5 signature verification with SHA-256.

use eakta_core::Error;
use signature::Verifier;

/// Verify `sig_bytes` over `data` with `public_key`.
///
/// A signature that does not verify, including one of the wrong length, is
/// `Ok(false)`.
pub fn verify_rsa_sha256(
    public_key: &rsa::RsaPublicKey,
    data: &[u8],
    sig_bytes: &[u8],
) -> Result<bool, Error> {
    let Ok(sig) = rsa::pkcs1v15::Signature::try_from(sig_bytes) else {
        return Ok(false);
    };
    let vk = rsa::pkcs1v15::VerifyingKey::<sha2::Sha256>::new(public_key.clone());
    Ok(vk.verify(data, &sig).is_ok())
}
