#![forbid(unsafe_code)]

//! A `ds:Signature` together with its XAdES properties.

use crate::document::Document;
use crate::profile;
use base64::Engine;
use chrono::{DateTime, Utc};
use eakta_core::{ns, Error};
use eakta_dsig::{object, DsigContext, ReferenceResult, SignedInfo, Timestamp};
use eakta_keys::CertificateInfo;
use eakta_xml::{find, XmlTree};
use std::sync::Arc;

type Node<'a> = roxmltree::Node<'a, 'a>;

/// `SigningCertificate/Cert` of the signed properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningCertificate {
    pub digest_method: Option<String>,
    pub digest_value: Option<String>,
    pub issuer_name: Option<String>,
    pub serial_number: Option<String>,
}

/// Summary of `xades:SignedProperties`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedProperties {
    pub signing_time: Option<DateTime<Utc>>,
    pub signing_certificate: Option<SigningCertificate>,
}

impl SignedProperties {
    fn from_node(node: Node<'_>) -> Result<Self, Error> {
        let Some(properties) = find::child_local(node, ns::node::SIGNED_SIGNATURE_PROPERTIES)
        else {
            return Ok(Self::default());
        };

        let signing_time = profile::optional_text(properties, ns::node::SIGNING_TIME)
            .map(profile::parse_date)
            .transpose()?;

        let signing_certificate = find::child_local(properties, ns::node::SIGNING_CERTIFICATE)
            .and_then(|sc| find::child_local(sc, ns::node::CERT))
            .map(|cert| {
                let ds_text = |name: &str| {
                    find::descendant(cert, ns::DSIG, name)
                        .and_then(find::trimmed_text)
                        .map(str::to_owned)
                };
                SigningCertificate {
                    digest_method: find::descendant(cert, ns::DSIG, ns::node::DIGEST_METHOD)
                        .and_then(|m| m.attribute(ns::attr::ALGORITHM))
                        .map(str::to_owned),
                    digest_value: ds_text(ns::node::DIGEST_VALUE),
                    issuer_name: ds_text(ns::node::X509_ISSUER_NAME),
                    serial_number: ds_text(ns::node::X509_SERIAL_NUMBER),
                }
            });

        Ok(Self {
            signing_time,
            signing_certificate,
        })
    }
}

/// `es:SignatureProfile`: may carry a comment document from the signer.
#[derive(Debug)]
pub struct SignatureProfile<'a> {
    pub comment_document: Option<Box<Document<'a>>>,
}

/// A signature over the dossier or over one document.
pub struct Signature<'a> {
    pub id: String,
    value: Vec<u8>,
    certificate_pem: Arc<str>,
    signed_info: SignedInfo<'a>,
    /// Read from the certificate; informational only.
    pub certificate: CertificateInfo,
    pub profile: Option<SignatureProfile<'a>>,
    pub signed_properties: Option<SignedProperties>,
    pub timestamp: Option<Timestamp<'a>>,
}

impl<'a> Signature<'a> {
    /// Build a signature from a `ds:Signature` element.
    ///
    /// Reads everything up front.  Verification happens later, on demand.
    pub fn from_node(node: Node<'a>, tree: &'a XmlTree<'a>) -> Result<Self, Error> {
        let id = node
            .attribute(ns::attr::ID)
            .ok_or_else(|| Error::MissingAttribute("Id on Signature".into()))?
            .to_owned();

        let value_text: String = find::child(node, ns::DSIG, ns::node::SIGNATURE_VALUE)
            .and_then(find::first_text)
            .ok_or_else(|| Error::MissingElement(format!("SignatureValue in #{id}")))?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let value = base64::engine::general_purpose::STANDARD
            .decode(value_text)
            .map_err(|e| Error::Base64(format!("SignatureValue of #{id}: {e}")))?;

        let certificate_b64 = find::child(node, ns::DSIG, ns::node::KEY_INFO)
            .and_then(|ki| find::descendant(ki, ns::DSIG, ns::node::X509_CERTIFICATE))
            .and_then(find::first_text)
            .ok_or_else(|| Error::MissingElement(format!("X509Certificate in #{id}")))?;
        let certificate_pem: Arc<str> = Arc::from(eakta_keys::wrap_pem(certificate_b64));
        let certificate = CertificateInfo::from_pem(&certificate_pem)?;

        let signed_info_node = find::child(node, ns::DSIG, ns::node::SIGNED_INFO)
            .ok_or_else(|| Error::MissingElement(format!("SignedInfo in #{id}")))?;
        let signed_info = SignedInfo::from_node(signed_info_node, tree, certificate_pem.clone())?;

        let profile = object::object_content(node, ns::node::SIGNATURE_PROFILE)
            .into_iter()
            .next()
            .map(|p| -> Result<_, Error> {
                let comment_document = find::child_local(p, ns::node::DOCUMENT)
                    .map(|doc| Document::from_node(doc, tree).map(Box::new))
                    .transpose()?;
                Ok(SignatureProfile { comment_document })
            })
            .transpose()?;

        let signed_properties = object::signed_properties(node)
            .map(SignedProperties::from_node)
            .transpose()?;

        let timestamp = Timestamp::from_signature(node)?;

        tracing::debug!(
            id = %id,
            references = signed_info.references().len(),
            timestamp = timestamp.is_some(),
            "read signature"
        );

        Ok(Self {
            id,
            value,
            certificate_pem,
            signed_info,
            certificate,
            profile,
            signed_properties,
            timestamp,
        })
    }

    /// The decoded signature value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// The signer certificate as PEM.
    pub fn certificate_pem(&self) -> &str {
        &self.certificate_pem
    }

    pub fn signed_info(&self) -> &SignedInfo<'a> {
        &self.signed_info
    }

    /// The comment document of the signature profile, if any.
    pub fn comment_document(&self) -> Option<&Document<'a>> {
        self.profile
            .as_ref()
            .and_then(|p| p.comment_document.as_deref())
    }

    /// Check the signature value over the canonical `SignedInfo`.
    ///
    /// `Ok(false)` is a mismatch.  This does not look at the references;
    /// see [`reference_results`](Self::reference_results).
    pub async fn verify(&self, ctx: &DsigContext) -> Result<bool, Error> {
        eakta_dsig::verify_signature_value(ctx, &self.signed_info, &self.value).await
    }

    /// Recompute every reference digest.
    pub fn reference_results(&self, ctx: &DsigContext) -> Vec<ReferenceResult> {
        self.signed_info.verify_references(ctx)
    }

    /// The CA-issuers URI of the signer certificate, through the context's
    /// extractor.
    pub async fn issuer_uri(&self, ctx: &DsigContext) -> Result<Option<String>, Error> {
        ctx.extractor.issuer_uri(&self.certificate_pem).await
    }
}

impl std::fmt::Debug for Signature<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signature")
            .field("id", &self.id)
            .field("signed_info", &self.signed_info)
            .field("certificate", &self.certificate)
            .field("profile", &self.profile)
            .field("signed_properties", &self.signed_properties)
            .field("timestamp", &self.timestamp.is_some())
            .finish_non_exhaustive()
    }
}
