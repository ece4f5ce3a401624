#![forbid(unsafe_code)]

//! DSig context: the key extractor and configuration for verification.

use eakta_keys::{PublicKeyExtractor, X509KeyExtractor};
use std::sync::Arc;

/// Context for signature verification.
#[derive(Clone)]
pub struct DsigContext {
    /// Turns the embedded signer certificate into a public key.
    pub extractor: Arc<dyn PublicKeyExtractor>,
    /// Debug mode: log pre-digest and pre-signature data.
    pub debug: bool,
}

impl DsigContext {
    /// Create a new DSig context with the given extractor.
    pub fn new(extractor: Arc<dyn PublicKeyExtractor>) -> Self {
        Self {
            extractor,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Default for DsigContext {
    /// Uses the in-process X.509 extractor.
    fn default() -> Self {
        Self::new(Arc::new(X509KeyExtractor::new()))
    }
}

impl std::fmt::Debug for DsigContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DsigContext")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
