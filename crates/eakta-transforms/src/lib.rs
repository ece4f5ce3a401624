#![forbid(unsafe_code)]

//! Content transform pipeline for dossier payloads.
//!
//! A document's payload is carried as base64 text, optionally wrapping a
//! zip archive with a single entry.  Decoding always runs base64 first and
//! then, if declared, unpacks the archive.  Encrypted payloads are returned
//! as decoded but still encrypted bytes, flagged so the caller can tell.

pub mod archive;
pub mod pipeline;
pub mod storage;

pub use pipeline::{
    decode_content, decode_content_async, parse_transforms, ContentTransform, DecodedContent,
};
