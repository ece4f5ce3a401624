#![forbid(unsafe_code)]

//! The unsigned signature timestamp.
//!
//! Nothing here talks to a time-stamping authority.  [`Timestamp`] exposes
//! the token and the canonical bytes of its own element; checking them is
//! left to a [`TimestampVerifier`].

use async_trait::async_trait;
use eakta_core::{algorithm, ns, Error};
use eakta_xml::find;

type Node<'a> = roxmltree::Node<'a, 'a>;

/// External check of a timestamp token.
#[async_trait]
pub trait TimestampVerifier: Send + Sync {
    /// `token` is the base64 encapsulated token, `canonical` the canonical
    /// form of the enclosing timestamp element.
    async fn verify(&self, token: &str, canonical: &[u8]) -> Result<bool, Error>;
}

/// A `xades:SignatureTimeStamp` element.
#[derive(Debug, Clone)]
pub struct Timestamp<'a> {
    node: Node<'a>,
    canonicalization: String,
    token: String,
    source: &'a str,
}

impl<'a> Timestamp<'a> {
    /// Read a `SignatureTimeStamp` element.
    ///
    /// Without a `CanonicalizationMethod` child the element is canonicalized
    /// with inclusive C14N 1.0.
    pub fn from_node(node: Node<'a>) -> Result<Self, Error> {
        let canonicalization = match find::child(node, ns::DSIG, ns::node::CANONICALIZATION_METHOD)
        {
            Some(method) => method
                .attribute(ns::attr::ALGORITHM)
                .ok_or_else(|| {
                    Error::MissingAttribute("Algorithm on timestamp CanonicalizationMethod".into())
                })?
                .to_owned(),
            None => algorithm::C14N.to_owned(),
        };
        if !algorithm::is_canonicalization(&canonicalization) {
            return Err(Error::UnsupportedAlgorithm(format!(
                "timestamp canonicalization method: {canonicalization}"
            )));
        }

        let token: String = find::child_local(node, ns::node::ENCAPSULATED_TIME_STAMP)
            .and_then(find::first_text)
            .ok_or_else(|| Error::MissingElement("EncapsulatedTimeStamp".into()))?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let source = &node.document().input_text()[node.range()];

        Ok(Self {
            node,
            canonicalization,
            token,
            source,
        })
    }

    /// The timestamp in the signature's own unsigned properties, if there
    /// is one.  Signatures nested in its objects are not searched.
    pub fn from_signature(signature: Node<'a>) -> Result<Option<Self>, Error> {
        crate::object::signature_time_stamp(signature)
            .map(Self::from_node)
            .transpose()
    }

    pub fn node(&self) -> Node<'a> {
        self.node
    }

    /// The canonicalization method URI the element declares.
    pub fn canonicalization(&self) -> &str {
        &self.canonicalization
    }

    /// The encapsulated token, base64 with whitespace removed.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The element exactly as written in the input.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The canonical bytes of the timestamp element.
    pub fn canonical_form(&self) -> Result<Vec<u8>, Error> {
        let method = find::child(self.node, ns::DSIG, ns::node::CANONICALIZATION_METHOD);
        eakta_c14n::canonicalize(self.node, &self.canonicalization, method)
    }

    /// Hand the token and canonical form to an external verifier.
    pub async fn verify_with(&self, verifier: &dyn TimestampVerifier) -> Result<bool, Error> {
        let canonical = self.canonical_form()?;
        verifier.verify(&self.token, &canonical).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eakta_xml::XmlDocument;
    use std::sync::Mutex;

    const DOSSIER: &str = include_str!("../../../test-data/dossier.es3");
    const TIMESTAMP_C14N: &[u8] = include_bytes!("../../../test-data/timestamp.c14n");

    fn with_signature<T>(xml: &str, id: &str, f: impl FnOnce(Node<'_>) -> T) -> T {
        let xml = XmlDocument::parse(xml.to_owned()).unwrap();
        let doc = xml.parse_doc().unwrap();
        let tree = xml.tree(&doc);
        f(tree.element_by_id(id).unwrap())
    }

    /// Records what it was handed and answers with a fixed verdict.
    struct RecordingVerifier {
        verdict: bool,
        seen: Mutex<Option<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl TimestampVerifier for RecordingVerifier {
        async fn verify(&self, token: &str, canonical: &[u8]) -> Result<bool, Error> {
            *self.seen.lock().unwrap() = Some((token.to_owned(), canonical.to_vec()));
            Ok(self.verdict)
        }
    }

    #[test]
    fn test_timestamp_of_signature() {
        with_signature(DOSSIER, "SIG0", |sig| {
            let ts = Timestamp::from_signature(sig).unwrap().unwrap();
            assert_eq!(ts.canonicalization(), algorithm::EXC_C14N);
            assert_eq!(ts.token(), "MIIBAHRpbWVzdGFtcC10b2tlbi1wbGFjZWhvbGRlcg==");
            assert!(ts.source().starts_with(r#"<xades:SignatureTimeStamp Id="TS0">"#));
            assert!(ts.source().ends_with("</xades:SignatureTimeStamp>"));
            assert_eq!(ts.canonical_form().unwrap(), TIMESTAMP_C14N);
        });
    }

    #[test]
    fn test_signature_without_timestamp() {
        with_signature(DOSSIER, "SIG2", |sig| {
            assert!(Timestamp::from_signature(sig).unwrap().is_none());
        });
    }

    #[test]
    fn test_default_canonicalization_and_missing_token() {
        let xml = format!(
            r#"<xades:SignatureTimeStamp xmlns:xades="{}" Id="T"><xades:EncapsulatedTimeStamp>
  AAAA
</xades:EncapsulatedTimeStamp></xades:SignatureTimeStamp>"#,
            ns::XADES
        );
        with_signature(&xml, "T", |node| {
            let ts = Timestamp::from_node(node).unwrap();
            assert_eq!(ts.canonicalization(), algorithm::C14N);
            assert_eq!(ts.token(), "AAAA");
        });

        let xml = format!(
            r#"<xades:SignatureTimeStamp xmlns:xades="{}" Id="T"/>"#,
            ns::XADES
        );
        with_signature(&xml, "T", |node| {
            assert!(matches!(
                Timestamp::from_node(node),
                Err(Error::MissingElement(_))
            ));
        });
    }

    #[tokio::test]
    async fn test_verify_with_external_verifier() {
        let xml = XmlDocument::parse(DOSSIER.to_owned()).unwrap();
        let doc = xml.parse_doc().unwrap();
        let tree = xml.tree(&doc);
        let sig = tree.element_by_id("SIG0").unwrap();
        let ts = Timestamp::from_signature(sig).unwrap().unwrap();

        let verifier = RecordingVerifier {
            verdict: true,
            seen: Mutex::new(None),
        };
        assert!(ts.verify_with(&verifier).await.unwrap());
        let (token, canonical) = verifier.seen.lock().unwrap().take().unwrap();
        assert_eq!(token, ts.token());
        assert_eq!(canonical, TIMESTAMP_C14N);
    }
}
