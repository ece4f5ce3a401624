#![forbid(unsafe_code)]

//! Reference digest and signature value verification.
//!
//! Processing order:
//! 1. For each `<Reference>`: resolve the identifier, canonicalize or
//!    base64-decode the target, hash with SHA-256, compare
//! 2. Canonicalize `<SignedInfo>` with its declared method
//! 3. Extract the public key from the signer certificate
//! 4. Verify `<SignatureValue>` with RSA-SHA256
//!
//! Mismatches are results, not errors.  Failures of canonicalization or of
//! key extraction during step 2-4 are errors.

use crate::context::DsigContext;
use crate::signed_info::{Reference, SignedInfo};
use base64::Engine;
use eakta_core::{algorithm, Error};
use eakta_xml::find;

/// Outcome of one reference check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceStatus {
    /// The recomputed digest equals the declared one.
    Valid,
    /// The digests differ, or the declared digest is not valid base64.
    DigestMismatch,
    /// No element carries the referenced identifier.
    Unresolved,
    /// The target could not be canonicalized or decoded.
    Error(String),
}

/// Per-reference verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceResult {
    pub id: Option<String>,
    pub uri: String,
    pub digest_method: String,
    /// Declared digest as base64.
    pub declared_digest: String,
    /// Recomputed digest as base64, when the target could be hashed.
    pub computed_digest: Option<String>,
    pub status: ReferenceStatus,
}

impl ReferenceResult {
    pub fn is_valid(&self) -> bool {
        self.status == ReferenceStatus::Valid
    }
}

impl<'a> SignedInfo<'a> {
    /// Verify every reference independently.
    ///
    /// One failing reference does not stop the others; the caller gets one
    /// result per reference in first-seen order.
    pub fn verify_references(&self, ctx: &DsigContext) -> Vec<ReferenceResult> {
        self.references()
            .iter()
            .map(|reference| self.verify_reference(ctx, reference))
            .collect()
    }

    fn verify_reference(&self, ctx: &DsigContext, reference: &Reference) -> ReferenceResult {
        let engine = base64::engine::general_purpose::STANDARD;
        let declared = engine.decode(&reference.digest_value).ok();
        let mut result = ReferenceResult {
            id: reference.id.clone(),
            uri: reference.uri.clone(),
            digest_method: reference.digest_method.clone(),
            declared_digest: declared
                .as_ref()
                .map(|d| engine.encode(d))
                .unwrap_or_else(|| reference.digest_value.clone()),
            computed_digest: None,
            status: ReferenceStatus::Unresolved,
        };

        if reference.digest_method != algorithm::SHA256 {
            tracing::warn!(
                uri = %reference.uri,
                digest_method = %reference.digest_method,
                "declared digest method is not SHA-256, hashing with SHA-256 anyway"
            );
        }

        let Some(target) = self.tree().element_by_id(&reference.uri) else {
            tracing::debug!(uri = %reference.uri, "reference does not resolve");
            return result;
        };

        let data = match reference_bytes(target, reference) {
            Ok(data) => data,
            Err(e) => {
                result.status = ReferenceStatus::Error(e.to_string());
                return result;
            }
        };

        if ctx.debug {
            tracing::debug!(
                uri = %reference.uri,
                data = %String::from_utf8_lossy(&data),
                "pre-digest data"
            );
        }

        let computed = eakta_crypto::sha256(&data);
        result.computed_digest = Some(engine.encode(&computed));
        result.status = match declared {
            Some(declared) if declared == computed => ReferenceStatus::Valid,
            _ => ReferenceStatus::DigestMismatch,
        };
        result
    }

    /// The canonical bytes of this `SignedInfo`, as they are signed.
    pub fn canonical_form(&self) -> Result<Vec<u8>, Error> {
        let mode = eakta_c14n::C14nMode::from_uri(self.canonicalization())
            .ok_or_else(|| Error::UnsupportedAlgorithm(self.canonicalization().to_owned()))?;
        eakta_c14n::canonicalize_node(self.node(), mode, self.inclusive_prefixes())
    }
}

/// The bytes a reference digest is computed over.
///
/// A canonicalization first transform canonicalizes the target.  Otherwise
/// the target's direct text is a base64 payload and its decoded bytes are
/// hashed.
fn reference_bytes<'a>(
    target: roxmltree::Node<'a, 'a>,
    reference: &Reference,
) -> Result<Vec<u8>, Error> {
    if let Some(method) = reference.canonicalization() {
        let mode = eakta_c14n::C14nMode::from_uri(method)
            .ok_or_else(|| Error::UnsupportedAlgorithm(method.to_owned()))?;
        return eakta_c14n::canonicalize_node(target, mode, &reference.inclusive_prefixes);
    }
    let text: String = find::first_text(target)
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|e| Error::Base64(format!("content of #{}: {e}", reference.uri)))
}

/// Verify the signature value over the canonical `SignedInfo`.
///
/// Returns `Ok(false)` when the signature does not match.  Canonicalization
/// and key extraction failures are errors.
pub async fn verify_signature_value(
    ctx: &DsigContext,
    signed_info: &SignedInfo<'_>,
    signature_value: &[u8],
) -> Result<bool, Error> {
    if signed_info.signature_method() != algorithm::RSA_SHA256 {
        tracing::warn!(
            signature_method = %signed_info.signature_method(),
            "declared signature method is not RSA-SHA256, verifying with RSA-SHA256 anyway"
        );
    }

    let canonical = signed_info.canonical_form()?;
    if ctx.debug {
        tracing::debug!(
            data = %String::from_utf8_lossy(&canonical),
            "pre-signature data"
        );
    }

    let public_key = ctx
        .extractor
        .public_key(signed_info.certificate_pem())
        .await?;
    let valid = eakta_crypto::verify_rsa_sha256(&public_key, &canonical, signature_value)?;
    tracing::debug!(valid, "signature value checked");
    Ok(valid)
}
