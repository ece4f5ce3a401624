#![forbid(unsafe_code)]

//! Single-entry zip extraction.

use eakta_core::Error;
use std::io::{Cursor, Read};

/// Unpack the first file entry of a zip archive held in memory.
///
/// Directory entries are skipped.  Returns the entry name and its
/// decompressed bytes.  An unreadable archive, or one without any file
/// entry, is a [`Error::CorruptPayload`].
pub fn extract_single_entry(data: &[u8]) -> Result<(String, Vec<u8>), Error> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| Error::CorruptPayload(format!("failed to read zip archive: {e}")))?;

    let files = archive.len();
    for i in 0..files {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::CorruptPayload(format!("failed to open zip entry {i}: {e}")))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_owned();
        let mut buffer = Vec::new();
        entry
            .read_to_end(&mut buffer)
            .map_err(|e| Error::CorruptPayload(format!("failed to decompress {name}: {e}")))?;
        if files > 1 {
            tracing::debug!(entries = files, entry = %name, "archive has several entries, using the first file");
        }
        return Ok((name, buffer));
    }

    Err(Error::CorruptPayload("zip archive contains no file entry".into()))
}
