#![forbid(unsafe_code)]

//! Recognized `E-category` labels.

use eakta_core::Error;

/// Dossier categories.  The two Hungarian labels are legacy spellings that
/// older producers still emit.
pub const DOSSIER_CATEGORIES: [&str; 4] = [
    "electronic dossier",
    "electronic acknowledgement",
    "elektronikus akta",
    "elektronikus átvételi elismervény",
];

/// Document categories.
pub const DOCUMENT_CATEGORIES: [&str; 8] = [
    "electronic data",
    "electronic document",
    "electronic record",
    "elektronikus adat",
    "elektronikus dokumentum",
    "elektronikus irat",
    "electronic profile",
    "elektronikus adatlap",
];

/// Validate an optional dossier category.
///
/// Absent or empty is `None`; anything outside [`DOSSIER_CATEGORIES`] is
/// [`Error::UnknownCategory`].
pub fn dossier_category(label: Option<&str>) -> Result<Option<String>, Error> {
    check(label, &DOSSIER_CATEGORIES)
}

/// Validate an optional document category against [`DOCUMENT_CATEGORIES`].
pub fn document_category(label: Option<&str>) -> Result<Option<String>, Error> {
    check(label, &DOCUMENT_CATEGORIES)
}

fn check(label: Option<&str>, known: &[&str]) -> Result<Option<String>, Error> {
    match label.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) if known.contains(&label) => Ok(Some(label.to_owned())),
        Some(label) => Err(Error::UnknownCategory(label.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dossier_categories() {
        assert_eq!(
            dossier_category(Some("electronic dossier")).unwrap().as_deref(),
            Some("electronic dossier")
        );
        assert_eq!(
            dossier_category(Some("elektronikus akta")).unwrap().as_deref(),
            Some("elektronikus akta")
        );
        assert_eq!(dossier_category(None).unwrap(), None);
        assert_eq!(dossier_category(Some("  ")).unwrap(), None);
        assert!(matches!(
            dossier_category(Some("banana")),
            Err(Error::UnknownCategory(label)) if label == "banana"
        ));
    }

    #[test]
    fn test_category_sets_are_distinct() {
        assert!(matches!(
            document_category(Some("electronic dossier")),
            Err(Error::UnknownCategory(_))
        ));
        assert!(matches!(
            dossier_category(Some("electronic document")),
            Err(Error::UnknownCategory(_))
        ));
        assert_eq!(
            document_category(Some("elektronikus adatlap")).unwrap().as_deref(),
            Some("elektronikus adatlap")
        );
    }
}
