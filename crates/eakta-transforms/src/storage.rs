#![forbid(unsafe_code)]

//! Writing decoded payloads to disk.

use crate::pipeline::DecodedContent;
use eakta_core::Error;
use std::path::{Path, PathBuf};

const FALLBACK_FILE_NAME: &str = "document";

/// Reduce `name` to a single safe path component.
///
/// Archive entry names and titles come from the dossier, so directory parts
/// are dropped and control characters removed.
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        cleaned.to_owned()
    }
}

impl DecodedContent {
    /// Write the bytes to `dir` under the sanitized file name and return the
    /// path written.  An existing file is replaced.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, Error> {
        let path = dir.join(sanitize_file_name(&self.file_name));
        std::fs::write(&path, &self.bytes)?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "wrote document");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.txt"), "report.txt");
        assert_eq!(sanitize_file_name("docs/inner/report.txt"), "report.txt");
        assert_eq!(sanitize_file_name("..\\..\\evil.exe"), "evil.exe");
        assert_eq!(sanitize_file_name("../"), "document");
        assert_eq!(sanitize_file_name(".."), "document");
        assert_eq!(sanitize_file_name("a\u{0}b\n"), "ab");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let content = DecodedContent {
            file_name: "nested/note.txt".to_owned(),
            bytes: b"note".to_vec(),
            encrypted: false,
        };
        let path = content.write_to_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("note.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"note");
    }

    #[test]
    fn test_write_to_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let content = DecodedContent {
            file_name: "x".to_owned(),
            bytes: Vec::new(),
            encrypted: false,
        };
        let err = content.write_to_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
