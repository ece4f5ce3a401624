#![forbid(unsafe_code)]

//! A document of the dossier: its profile, its payload and its signature.

use crate::category;
use crate::profile::{self, MimeType, SourceSize};
use crate::signature::Signature;
use chrono::{DateTime, Utc};
use eakta_core::{ns, Error};
use eakta_transforms::{ContentTransform, DecodedContent};
use eakta_xml::{find, XmlTree};

type Node<'a> = roxmltree::Node<'a, 'a>;

/// An `es:Document`.
#[derive(Debug)]
pub struct Document<'a> {
    /// `Id` of the `ds:Object` carrying the payload.
    pub id: String,
    /// `Id` of the `DocumentProfile`, when it has one.
    pub profile_id: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub mime_type: MimeType,
    pub source_size: SourceSize,
    transforms: Vec<ContentTransform>,
    payload: &'a str,
    pub signature: Option<Signature<'a>>,
}

impl<'a> Document<'a> {
    /// Build a document from an `es:Document` element.
    ///
    /// All profile fields are validated here; nothing is decoded yet.
    pub fn from_node(node: Node<'a>, tree: &'a XmlTree<'a>) -> Result<Self, Error> {
        let profile = find::child_local(node, ns::node::DOCUMENT_PROFILE)
            .ok_or_else(|| Error::MissingProperty(ns::node::DOCUMENT_PROFILE.into()))?;

        let object = find::child(node, ns::DSIG, ns::node::OBJECT)
            .ok_or_else(|| Error::MissingProperty("document object".into()))?;
        let id = object
            .attribute(ns::attr::ID)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::MissingProperty("document object Id".into()))?
            .to_owned();
        let payload = find::first_text(object)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::MissingProperty(format!("payload of #{id}")))?;

        let title = profile::required_text(profile, ns::node::TITLE)?.to_owned();
        let category =
            category::document_category(profile::optional_text(profile, ns::node::E_CATEGORY))?;
        let creation_date = profile::creation_date(profile)?;
        let mime_type = MimeType::from_profile(profile)?;
        let source_size = SourceSize::from_profile(profile)?;
        let transforms = base_transforms(profile)?;

        let signature = find::child(node, ns::DSIG, ns::node::SIGNATURE)
            .map(|sig| Signature::from_node(sig, tree))
            .transpose()?;

        Ok(Self {
            id,
            profile_id: profile.attribute(ns::attr::ID).map(str::to_owned),
            title,
            category,
            creation_date,
            mime_type,
            source_size,
            transforms,
            payload,
            signature,
        })
    }

    /// Declared content transforms, in declared order.
    pub fn transforms(&self) -> &[ContentTransform] {
        &self.transforms
    }

    /// The base64 payload as written.
    pub fn payload(&self) -> &'a str {
        self.payload
    }

    /// File name for the decoded content when it is not an archive entry:
    /// the title plus the extension hint.
    pub fn file_name(&self) -> String {
        match &self.mime_type.extension {
            Some(ext) => format!("{}.{ext}", self.title),
            None => self.title.clone(),
        }
    }

    /// Run the content transform pipeline over the payload.
    pub fn decode(&self) -> Result<DecodedContent, Error> {
        eakta_transforms::decode_content(self.payload, &self.transforms, &self.file_name())
    }

    /// [`decode`](Self::decode) off the async executor.
    pub async fn decode_async(&self) -> Result<DecodedContent, Error> {
        eakta_transforms::decode_content_async(
            self.payload.to_owned(),
            self.transforms.clone(),
            self.file_name(),
        )
        .await
    }
}

fn base_transforms(profile: Node<'_>) -> Result<Vec<ContentTransform>, Error> {
    let list = find::child_local(profile, ns::node::BASE_TRANSFORM)
        .ok_or_else(|| Error::MissingProperty(ns::node::BASE_TRANSFORM.into()))?;
    let names = find::children_local(list, "Transform")
        .into_iter()
        .map(|t| {
            t.attribute(ns::attr::ALGORITHM)
                .ok_or_else(|| Error::MissingAttribute("Algorithm on BaseTransform/Transform".into()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if names.is_empty() {
        return Err(Error::MissingProperty(ns::node::BASE_TRANSFORM.into()));
    }
    eakta_transforms::parse_transforms(&names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eakta_xml::XmlDocument;

    fn document_xml(profile: &str, object: &str) -> String {
        format!(
            r#"<es:Document xmlns:es="{}" xmlns:ds="{}"><es:DocumentProfile Id="P">{profile}</es:DocumentProfile>{object}</es:Document>"#,
            ns::ES,
            ns::DSIG
        )
    }

    const PROFILE: &str = r#"<es:Title>minutes</es:Title>
<es:E-category>elektronikus irat</es:E-category>
<es:CreationDate>2024-01-02</es:CreationDate>
<es:Format><es:MIME-Type type="application" subtype="pdf" extension="pdf"/></es:Format>
<es:SourceSize sizeUnit="B" sizeValue="5"/>
<es:BaseTransform><es:Transform Algorithm="base64"/></es:BaseTransform>"#;

    const OBJECT: &str = r#"<ds:Object Id="O">aGVsbG8=</ds:Object>"#;

    fn with_document<T>(xml: &str, f: impl FnOnce(Result<Document<'_>, Error>) -> T) -> T {
        let xml = XmlDocument::parse(xml.to_owned()).unwrap();
        let doc = xml.parse_doc().unwrap();
        let tree = xml.tree(&doc);
        f(Document::from_node(tree.root_element(), &tree))
    }

    #[test]
    fn test_reads_profile_and_payload() {
        with_document(&document_xml(PROFILE, OBJECT), |doc| {
            let doc = doc.unwrap();
            assert_eq!(doc.id, "O");
            assert_eq!(doc.profile_id.as_deref(), Some("P"));
            assert_eq!(doc.title, "minutes");
            assert_eq!(doc.category.as_deref(), Some("elektronikus irat"));
            assert_eq!(doc.mime_type.essence(), "application/pdf");
            assert_eq!(doc.source_size.bytes, 5);
            assert_eq!(doc.transforms(), &[ContentTransform::Base64]);
            assert!(doc.signature.is_none());
            assert_eq!(doc.file_name(), "minutes.pdf");

            let decoded = doc.decode().unwrap();
            assert_eq!(decoded.bytes, b"hello");
            assert_eq!(decoded.file_name, "minutes.pdf");
        });
    }

    #[test]
    fn test_object_id_is_required() {
        let xml = document_xml(PROFILE, "<ds:Object>aGVsbG8=</ds:Object>");
        with_document(&xml, |doc| {
            assert!(matches!(doc, Err(Error::MissingProperty(_))));
        });
        let xml = document_xml(PROFILE, r#"<ds:Object Id="O">  </ds:Object>"#);
        with_document(&xml, |doc| {
            assert!(matches!(doc, Err(Error::MissingProperty(_))));
        });
    }

    #[test]
    fn test_transform_validation() {
        let unknown = PROFILE.replace(
            r#"<es:Transform Algorithm="base64"/>"#,
            r#"<es:Transform Algorithm="gzip"/><es:Transform Algorithm="base64"/>"#,
        );
        with_document(&document_xml(&unknown, OBJECT), |doc| {
            assert!(matches!(doc, Err(Error::UnknownTransform(name)) if name == "gzip"));
        });

        let empty = PROFILE.replace(r#"<es:Transform Algorithm="base64"/>"#, "");
        with_document(&document_xml(&empty, OBJECT), |doc| {
            assert!(matches!(doc, Err(Error::MissingProperty(_))));
        });
    }

    #[test]
    fn test_unknown_document_category() {
        let profile = PROFILE.replace("elektronikus irat", "electronic dossier");
        with_document(&document_xml(&profile, OBJECT), |doc| {
            assert!(matches!(doc, Err(Error::UnknownCategory(_))));
        });
    }

    #[test]
    fn test_file_name_without_extension() {
        let profile = PROFILE.replace(r#" extension="pdf""#, "");
        with_document(&document_xml(&profile, OBJECT), |doc| {
            assert_eq!(doc.unwrap().file_name(), "minutes");
        });
    }
}
