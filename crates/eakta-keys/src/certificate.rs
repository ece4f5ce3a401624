#![forbid(unsafe_code)]

//! Signer certificate parsing.

use chrono::{DateTime, Utc};
use const_oid::ObjectIdentifier;
use der::Decode;
use eakta_core::Error;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::AuthorityInfoAccessSyntax;
use x509_cert::time::Time;
use x509_cert::Certificate;

/// id-ad-caIssuers (RFC 5280 §4.2.2.1).
const ID_AD_CA_ISSUERS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.2");

const PEM_LABEL: &str = "CERTIFICATE";

/// Wrap the base64 body of a certificate as PEM.
///
/// Whitespace inside `b64` is dropped and the body is re-wrapped at 64
/// columns.
pub fn wrap_pem(b64: &str) -> String {
    let body: Vec<char> = b64.chars().filter(|c| !c.is_whitespace()).collect();
    let mut pem = String::with_capacity(body.len() + body.len() / 64 + 64);
    pem.push_str("-----BEGIN CERTIFICATE-----\n");
    for line in body.chunks(64) {
        pem.extend(line);
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");
    pem
}

/// Decode a PEM certificate to DER.
pub fn pem_to_der(pem: &str) -> Result<Vec<u8>, Error> {
    let (label, der_bytes) = pem_rfc7468::decode_vec(pem.trim().as_bytes())
        .map_err(|e| Error::Certificate(format!("invalid PEM: {e}")))?;
    if label != PEM_LABEL {
        return Err(Error::Certificate(format!(
            "expected a {PEM_LABEL} PEM block, found {label}"
        )));
    }
    Ok(der_bytes)
}

/// Parse a PEM certificate.
pub fn parse_pem(pem: &str) -> Result<Certificate, Error> {
    let der_bytes = pem_to_der(pem)?;
    Certificate::from_der(&der_bytes)
        .map_err(|e| Error::Certificate(format!("failed to parse certificate: {e}")))
}

/// The caIssuers URI from the Authority Information Access extension.
pub fn ca_issuer_uri(cert: &Certificate) -> Result<Option<String>, Error> {
    let aia = cert
        .tbs_certificate
        .get::<AuthorityInfoAccessSyntax>()
        .map_err(|e| Error::Certificate(format!("invalid authority information access: {e}")))?;
    let Some((_critical, aia)) = aia else {
        return Ok(None);
    };
    Ok(aia
        .0
        .iter()
        .filter(|ad| ad.access_method == ID_AD_CA_ISSUERS)
        .find_map(|ad| match &ad.access_location {
            GeneralName::UniformResourceIdentifier(uri) => Some(uri.to_string()),
            _ => None,
        }))
}

/// Descriptive fields of a signer certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Issuer distinguished name (RFC 4514).
    pub issuer: String,
    /// Subject distinguished name (RFC 4514).
    pub subject: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Serial number as uppercase hex.
    pub serial_hex: String,
    /// Where the issuing CA certificate can be fetched, if advertised.
    pub ca_issuer_uri: Option<String>,
}

impl CertificateInfo {
    pub fn from_pem(pem: &str) -> Result<Self, Error> {
        let cert = parse_pem(pem)?;
        let tbs = &cert.tbs_certificate;
        Ok(Self {
            issuer: tbs.issuer.to_string(),
            subject: tbs.subject.to_string(),
            not_before: to_chrono(&tbs.validity.not_before)?,
            not_after: to_chrono(&tbs.validity.not_after)?,
            serial_hex: serial_hex(tbs.serial_number.as_bytes()),
            ca_issuer_uri: ca_issuer_uri(&cert)?,
        })
    }
}

fn to_chrono(time: &Time) -> Result<DateTime<Utc>, Error> {
    let secs = i64::try_from(time.to_unix_duration().as_secs())
        .map_err(|_| Error::Certificate("validity time out of range".into()))?;
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| Error::Certificate("validity time out of range".into()))
}

fn serial_hex(bytes: &[u8]) -> String {
    let mut bytes = bytes;
    while bytes.len() > 1 && bytes[0] == 0 {
        bytes = &bytes[1..];
    }
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}
