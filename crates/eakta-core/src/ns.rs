#![forbid(unsafe_code)]

//! XML namespace constants used across the library.

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XAdES 1.3.2 namespace
pub const XADES: &str = "http://uri.etsi.org/01903/v1.3.2#";

/// e-Szignó dossier namespace
pub const ES: &str = "https://www.microsec.hu/ds/e-szigno30#";

/// XML namespace
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    // DSig elements
    pub const SIGNATURE: &str = "Signature";
    pub const SIGNED_INFO: &str = "SignedInfo";
    pub const CANONICALIZATION_METHOD: &str = "CanonicalizationMethod";
    pub const SIGNATURE_METHOD: &str = "SignatureMethod";
    pub const SIGNATURE_VALUE: &str = "SignatureValue";
    pub const REFERENCE: &str = "Reference";
    pub const TRANSFORMS: &str = "Transforms";
    pub const TRANSFORM: &str = "Transform";
    pub const DIGEST_METHOD: &str = "DigestMethod";
    pub const DIGEST_VALUE: &str = "DigestValue";
    pub const KEY_INFO: &str = "KeyInfo";
    pub const X509_DATA: &str = "X509Data";
    pub const X509_CERTIFICATE: &str = "X509Certificate";
    pub const X509_ISSUER_NAME: &str = "X509IssuerName";
    pub const X509_SERIAL_NUMBER: &str = "X509SerialNumber";
    pub const OBJECT: &str = "Object";
    pub const INCLUSIVE_NAMESPACES: &str = "InclusiveNamespaces";

    // XAdES elements
    pub const QUALIFYING_PROPERTIES: &str = "QualifyingProperties";
    pub const SIGNED_PROPERTIES: &str = "SignedProperties";
    pub const SIGNED_SIGNATURE_PROPERTIES: &str = "SignedSignatureProperties";
    pub const SIGNING_TIME: &str = "SigningTime";
    pub const SIGNING_CERTIFICATE: &str = "SigningCertificate";
    pub const CERT: &str = "Cert";
    pub const UNSIGNED_PROPERTIES: &str = "UnsignedProperties";
    pub const UNSIGNED_SIGNATURE_PROPERTIES: &str = "UnsignedSignatureProperties";
    pub const SIGNATURE_TIME_STAMP: &str = "SignatureTimeStamp";
    pub const ENCAPSULATED_TIME_STAMP: &str = "EncapsulatedTimeStamp";

    // Dossier elements
    pub const DOSSIER: &str = "Dossier";
    pub const DOSSIER_PROFILE: &str = "DossierProfile";
    pub const DOCUMENTS: &str = "Documents";
    pub const DOCUMENT: &str = "Document";
    pub const DOCUMENT_PROFILE: &str = "DocumentProfile";
    pub const SIGNATURE_PROFILE: &str = "SignatureProfile";
    pub const TITLE: &str = "Title";
    pub const E_CATEGORY: &str = "E-category";
    pub const CREATION_DATE: &str = "CreationDate";
    pub const FORMAT: &str = "Format";
    pub const MIME_TYPE: &str = "MIME-Type";
    pub const SOURCE_SIZE: &str = "SourceSize";
    pub const BASE_TRANSFORM: &str = "BaseTransform";
    pub const METADATA: &str = "Metadata";
    pub const MIREG_METADATA: &str = "metadata";
    pub const MIREG: &str = "mireg";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const ID: &str = "Id";
    pub const URI: &str = "URI";
    pub const TARGET: &str = "Target";
    pub const ALGORITHM: &str = "Algorithm";
    pub const PREFIX_LIST: &str = "PrefixList";
    pub const TYPE: &str = "type";
    pub const SUBTYPE: &str = "subtype";
    pub const CHARSET: &str = "charset";
    pub const EXTENSION: &str = "extension";
    pub const SIZE_UNIT: &str = "sizeUnit";
    pub const SIZE_VALUE: &str = "sizeValue";
}
