#![forbid(unsafe_code)]

//! Typed extraction of profile fields.
//!
//! Every required field fails with [`Error::MissingProperty`] when absent
//! and [`Error::InvalidValue`] when present but unparsable.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use eakta_core::{ns, Error};
use eakta_xml::find;

type Node<'a> = roxmltree::Node<'a, 'a>;

/// Trimmed text of the child element `name`, or `None` when the element
/// is absent or empty.
pub(crate) fn optional_text<'a>(parent: Node<'a>, name: &str) -> Option<&'a str> {
    find::child_local(parent, name).and_then(find::trimmed_text)
}

/// Trimmed text of the child element `name`.
pub(crate) fn required_text<'a>(parent: Node<'a>, name: &str) -> Result<&'a str, Error> {
    optional_text(parent, name).ok_or_else(|| Error::MissingProperty(name.to_owned()))
}

/// Parse an ISO-8601 instant.
///
/// Accepts RFC 3339, a date-time without offset (taken as UTC), and a bare
/// date (midnight UTC).
pub fn parse_date(text: &str) -> Result<DateTime<Utc>, Error> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| Error::InvalidValue(format!("invalid date: {text}")))
}

/// The required `CreationDate` child.
pub(crate) fn creation_date(profile: Node<'_>) -> Result<DateTime<Utc>, Error> {
    parse_date(required_text(profile, ns::node::CREATION_DATE)?)
}

/// `Format/MIME-Type` of a document profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    pub mime_type: String,
    pub subtype: String,
    pub charset: Option<String>,
    /// File extension hint, without the dot.
    pub extension: Option<String>,
}

impl MimeType {
    pub(crate) fn from_profile(profile: Node<'_>) -> Result<Self, Error> {
        let node = find::child_local(profile, ns::node::FORMAT)
            .and_then(|format| find::child_local(format, ns::node::MIME_TYPE))
            .ok_or_else(|| Error::MissingProperty(ns::node::MIME_TYPE.into()))?;
        let required = |name: &str| {
            non_empty_attr(node, name).ok_or_else(|| Error::MissingProperty(name.to_owned()))
        };
        Ok(Self {
            mime_type: required(ns::attr::TYPE)?,
            subtype: required(ns::attr::SUBTYPE)?,
            charset: non_empty_attr(node, ns::attr::CHARSET),
            extension: non_empty_attr(node, ns::attr::EXTENSION),
        })
    }

    /// `type/subtype`, with `; charset=` when one is declared.
    pub fn essence(&self) -> String {
        match &self.charset {
            Some(charset) => format!("{}/{}; charset={charset}", self.mime_type, self.subtype),
            None => format!("{}/{}", self.mime_type, self.subtype),
        }
    }
}

/// Declared size of the original content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSize {
    /// Size in bytes.
    pub bytes: u64,
}

impl SourceSize {
    /// The only accepted `sizeUnit`.
    pub const BYTE_UNIT: &'static str = "B";

    pub(crate) fn from_profile(profile: Node<'_>) -> Result<Self, Error> {
        let node = find::child_local(profile, ns::node::SOURCE_SIZE)
            .ok_or_else(|| Error::MissingProperty(ns::node::SOURCE_SIZE.into()))?;
        let unit = non_empty_attr(node, ns::attr::SIZE_UNIT)
            .ok_or_else(|| Error::MissingProperty(ns::attr::SIZE_UNIT.into()))?;
        let value = non_empty_attr(node, ns::attr::SIZE_VALUE)
            .ok_or_else(|| Error::MissingProperty(ns::attr::SIZE_VALUE.into()))?;

        if unit != Self::BYTE_UNIT {
            return Err(Error::InvalidValue(format!("size unit: {unit}")));
        }
        let bytes = value
            .parse::<u64>()
            .map_err(|_| Error::InvalidValue(format!("size value: {value}")))?;
        Ok(Self { bytes })
    }
}

fn non_empty_attr(node: Node<'_>, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
