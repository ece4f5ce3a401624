#![forbid(unsafe_code)]

//! Core types shared by every e-dossier crate: the error type with its
//! taxonomy, algorithm identifiers and XML namespace constants.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, ErrorKind, Result};
