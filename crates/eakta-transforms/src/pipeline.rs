#![forbid(unsafe_code)]

//! Transform names and the decoding pipeline.

use crate::archive;
use base64::Engine;
use eakta_core::Error;
use std::fmt;

/// A content transform a document declares in its `BaseTransform` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTransform {
    Zip,
    Encrypt,
    Base64,
}

impl ContentTransform {
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "zip" => Ok(Self::Zip),
            "encrypt" => Ok(Self::Encrypt),
            "base64" => Ok(Self::Base64),
            other => Err(Error::UnknownTransform(other.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Encrypt => "encrypt",
            Self::Base64 => "base64",
        }
    }
}

impl fmt::Display for ContentTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validate a declared transform list.
///
/// Every name must be recognized and `base64` must be among them, since the
/// payload is always carried as text.  The declared order is kept for
/// reporting; it does not change the decoding order.
pub fn parse_transforms<S: AsRef<str>>(names: &[S]) -> Result<Vec<ContentTransform>, Error> {
    let transforms = names
        .iter()
        .map(|n| ContentTransform::from_name(n.as_ref().trim()))
        .collect::<Result<Vec<_>, _>>()?;
    if !transforms.contains(&ContentTransform::Base64) {
        return Err(Error::InvalidValue(format!(
            "transform list [{}] does not include base64",
            transforms
                .iter()
                .map(ContentTransform::name)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    Ok(transforms)
}

/// The bytes of a document after the pipeline ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContent {
    /// Target file name: the archive entry name when the payload was zipped,
    /// the caller's fallback name otherwise.
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// The document declared `encrypt`: `bytes` are still encrypted.
    pub encrypted: bool,
}

/// Decode a base64 payload according to `transforms`.
///
/// Base64 is always decoded first.  If `zip` is declared the single archive
/// entry is unpacked and its name becomes the file name.  If `encrypt` is
/// declared the decoded bytes are returned as they are, archive included,
/// with [`DecodedContent::encrypted`] set.
pub fn decode_content(
    payload: &str,
    transforms: &[ContentTransform],
    fallback_name: &str,
) -> Result<DecodedContent, Error> {
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| Error::Base64(format!("payload: {e}")))?;

    if transforms.contains(&ContentTransform::Encrypt) {
        tracing::debug!(name = fallback_name, "payload is encrypted, returning it undecrypted");
        return Ok(DecodedContent {
            file_name: fallback_name.to_owned(),
            bytes: decoded,
            encrypted: true,
        });
    }

    if transforms.contains(&ContentTransform::Zip) {
        let (file_name, bytes) = archive::extract_single_entry(&decoded)?;
        return Ok(DecodedContent {
            file_name,
            bytes,
            encrypted: false,
        });
    }

    Ok(DecodedContent {
        file_name: fallback_name.to_owned(),
        bytes: decoded,
        encrypted: false,
    })
}

/// [`decode_content`] on the blocking thread pool.
///
/// A panicked or cancelled decoder task is reported as
/// [`Error::CorruptPayload`].
pub async fn decode_content_async(
    payload: String,
    transforms: Vec<ContentTransform>,
    fallback_name: String,
) -> Result<DecodedContent, Error> {
    tokio::task::spawn_blocking(move || decode_content(&payload, &transforms, &fallback_name))
        .await
        .map_err(|e| Error::CorruptPayload(format!("decoder task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::build_zip;

    fn b64(data: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(data)
    }

    #[test]
    fn test_parse_transforms() {
        let list = parse_transforms(&["base64", "zip"]).unwrap();
        assert_eq!(list, vec![ContentTransform::Base64, ContentTransform::Zip]);
        assert_eq!(
            parse_transforms(&["zip", " base64 "]).unwrap(),
            vec![ContentTransform::Zip, ContentTransform::Base64]
        );
    }

    #[test]
    fn test_parse_transforms_rejects_unknown_and_missing_base64() {
        assert!(matches!(
            parse_transforms(&["base64", "gzip"]),
            Err(Error::UnknownTransform(name)) if name == "gzip"
        ));
        assert!(matches!(
            parse_transforms(&["zip"]),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(
            parse_transforms::<&str>(&[]),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn test_base64_only() {
        let out = decode_content(
            "SGVsbG8s\n  IHdvcmxk",
            &[ContentTransform::Base64],
            "greeting.txt",
        )
        .unwrap();
        assert_eq!(out.bytes, b"Hello, world");
        assert_eq!(out.file_name, "greeting.txt");
        assert!(!out.encrypted);
    }

    #[test]
    fn test_base64_then_zip_recovers_original() {
        let original = "Hello from the dossier.\n";
        let payload = b64(&build_zip(&[("report.txt", original)]));
        for order in [
            vec![ContentTransform::Base64, ContentTransform::Zip],
            vec![ContentTransform::Zip, ContentTransform::Base64],
        ] {
            let out = decode_content(&payload, &order, "ignored").unwrap();
            assert_eq!(out.bytes, original.as_bytes());
            assert_eq!(out.file_name, "report.txt");
        }
    }

    #[test]
    fn test_encrypted_payload_is_flagged() {
        let payload = b64(b"\x01\x02ciphertext");
        let out = decode_content(
            &payload,
            &[ContentTransform::Encrypt, ContentTransform::Zip, ContentTransform::Base64],
            "secret.bin",
        )
        .unwrap();
        assert!(out.encrypted);
        assert_eq!(out.bytes, b"\x01\x02ciphertext");
        assert_eq!(out.file_name, "secret.bin");
    }

    #[test]
    fn test_bad_base64_and_bad_zip() {
        assert!(matches!(
            decode_content("not base64!!", &[ContentTransform::Base64], "x"),
            Err(Error::Base64(_))
        ));
        let payload = b64(b"plain bytes, not an archive");
        assert!(matches!(
            decode_content(
                &payload,
                &[ContentTransform::Zip, ContentTransform::Base64],
                "x"
            ),
            Err(Error::CorruptPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_decode_async() {
        let payload = b64(&build_zip(&[("a.txt", "async")]));
        let out = decode_content_async(
            payload,
            vec![ContentTransform::Zip, ContentTransform::Base64],
            "fallback".to_owned(),
        )
        .await
        .unwrap();
        assert_eq!(out.bytes, b"async");
        assert_eq!(out.file_name, "a.txt");
    }
}
