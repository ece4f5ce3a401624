#![forbid(unsafe_code)]

//! Start-tag scanner.
//!
//! `roxmltree` resolves every name to a (namespace, local name) pair and
//! drops the prefix as written, along with the `xmlns` attributes.  The
//! canonicalizer needs both, so they are recovered from the element's
//! source text.

use eakta_core::Error;

/// An attribute exactly as written in a start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAttribute<'input> {
    /// Qualified name, e.g. `xmlns:ds` or `Id`.
    pub name: &'input str,
    /// Value between the quotes, with no entity expansion.
    pub value: &'input str,
}

impl<'input> RawAttribute<'input> {
    /// The prefix of the qualified name, if any.
    pub fn prefix(&self) -> Option<&'input str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Returns `true` for `xmlns` and `xmlns:*`.
    pub fn is_namespace_declaration(&self) -> bool {
        self.name == "xmlns" || self.name.starts_with("xmlns:")
    }
}

/// The parsed start tag of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'input> {
    /// Qualified element name as written.
    pub name: &'input str,
    /// Attributes in document order, namespace declarations included.
    pub attributes: Vec<RawAttribute<'input>>,
}

impl<'input> StartTag<'input> {
    /// Scan the start tag of an element node.
    pub fn scan(node: roxmltree::Node<'_, 'input>) -> Result<Self, Error> {
        if !node.is_element() {
            return Err(Error::XmlStructure("start tag requested for a non-element".into()));
        }
        let text = node.document().input_text();
        let src = text
            .get(node.range())
            .ok_or_else(|| Error::XmlStructure("element range outside document".into()))?;
        Self::parse(src)
    }

    /// Parse a start tag from the beginning of `src`.
    pub fn parse(src: &'input str) -> Result<Self, Error> {
        let malformed = || Error::XmlStructure(format!("malformed start tag: {}", preview(src)));

        let mut rest = src.strip_prefix('<').ok_or_else(malformed)?;
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .ok_or_else(malformed)?;
        let name = &rest[..name_end];
        if name.is_empty() {
            return Err(malformed());
        }
        rest = &rest[name_end..];

        let mut attributes = Vec::new();
        loop {
            rest = rest.trim_start();
            if rest.starts_with('>') || rest.starts_with("/>") {
                break;
            }
            let eq = rest.find('=').ok_or_else(malformed)?;
            let attr_name = rest[..eq].trim_end();
            rest = rest[eq + 1..].trim_start();
            let quote = rest.chars().next().ok_or_else(malformed)?;
            if quote != '"' && quote != '\'' {
                return Err(malformed());
            }
            let body = &rest[1..];
            let close = body.find(quote).ok_or_else(malformed)?;
            attributes.push(RawAttribute {
                name: attr_name,
                value: &body[..close],
            });
            rest = &body[close + 1..];
        }

        Ok(Self { name, attributes })
    }

    /// The element prefix, if any.
    pub fn prefix(&self) -> Option<&'input str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Namespace declarations written on this element.
    pub fn namespace_declarations(&self) -> impl Iterator<Item = &RawAttribute<'input>> {
        self.attributes.iter().filter(|a| a.is_namespace_declaration())
    }

    /// Ordinary attributes, in the same order `roxmltree` reports them.
    pub fn plain_attributes(&self) -> impl Iterator<Item = &RawAttribute<'input>> {
        self.attributes.iter().filter(|a| !a.is_namespace_declaration())
    }
}

fn preview(src: &str) -> String {
    src.chars().take(40).collect()
}
