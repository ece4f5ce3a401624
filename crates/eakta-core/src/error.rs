#![forbid(unsafe_code)]

/// Errors produced while building or verifying an electronic dossier.
///
/// A digest or signature mismatch is never an error: verification results
/// are returned as data. Errors describe input that cannot be processed at
/// all, or a collaborator outside the library that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid XML structure: {0}")]
    XmlStructure(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("missing property: {0}")]
    MissingProperty(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("unknown category type: {0}")]
    UnknownCategory(String),

    #[error("unknown transformation algorithm: {0}")]
    UnknownTransform(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("canonicalization error: {0}")]
    Canonicalization(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("public key extraction failed: {0}")]
    KeyExtraction(String),

    #[error("cryptographic error: {0}")]
    Crypto(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required element or attribute is absent, or a value fails to parse.
    MalformedInput,
    /// An algorithm, transform or category outside the recognized sets.
    UnsupportedAlgorithm,
    /// Key extraction, decompression or I/O failed.
    ExternalBoundary,
    /// Anything else.
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::XmlParse(_)
            | Error::XmlStructure(_)
            | Error::MissingElement(_)
            | Error::MissingAttribute(_)
            | Error::MissingProperty(_)
            | Error::InvalidValue(_)
            | Error::Canonicalization(_)
            | Error::Base64(_)
            | Error::Certificate(_) => ErrorKind::MalformedInput,
            Error::UnknownCategory(_)
            | Error::UnknownTransform(_)
            | Error::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Error::CorruptPayload(_) | Error::KeyExtraction(_) | Error::Io(_) => {
                ErrorKind::ExternalBoundary
            }
            Error::Crypto(_) | Error::Other(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
