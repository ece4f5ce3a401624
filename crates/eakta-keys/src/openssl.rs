#![forbid(unsafe_code)]

//! Public-key extraction through the `openssl` command-line tool.
//!
//! The certificate is written to the child's stdin; nothing touches the
//! filesystem.  There are no retries and no timeouts.

use crate::extractor::PublicKeyExtractor;
use async_trait::async_trait;
use eakta_core::Error;
use rsa::RsaPublicKey;
use spki::DecodePublicKey;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Extractor that runs `openssl x509`.
#[derive(Debug, Clone)]
pub struct OpensslKeyExtractor {
    program: PathBuf,
}

impl Default for OpensslKeyExtractor {
    fn default() -> Self {
        Self::new("openssl")
    }
}

impl OpensslKeyExtractor {
    /// Use `program` as the openssl executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `openssl x509 <args>` with `pem` on stdin and return stdout.
    async fn run_x509(&self, args: &[&str], pem: &str) -> Result<String, Error> {
        let mut child = Command::new(&self.program)
            .arg("x509")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::KeyExtraction(format!("failed to start {}: {e}", self.program.display()))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::KeyExtraction("child stdin unavailable".into()))?;
        stdin
            .write_all(pem.as_bytes())
            .await
            .map_err(|e| Error::KeyExtraction(format!("failed to write certificate: {e}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::KeyExtraction(format!("failed to wait for openssl: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(status = %output.status, stderr = %stderr.trim(), "openssl failed");
            return Err(Error::KeyExtraction(format!(
                "openssl exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::KeyExtraction(format!("openssl output is not UTF-8: {e}")))
    }
}

#[async_trait]
impl PublicKeyExtractor for OpensslKeyExtractor {
    async fn public_key(&self, pem: &str) -> Result<RsaPublicKey, Error> {
        let stdout = self.run_x509(&["-pubkey", "-noout"], pem).await?;
        RsaPublicKey::from_public_key_pem(stdout.trim())
            .map_err(|e| Error::KeyExtraction(format!("unusable public key from openssl: {e}")))
    }

    async fn issuer_uri(&self, pem: &str) -> Result<Option<String>, Error> {
        let stdout = self.run_x509(&["-text", "-noout"], pem).await?;
        Ok(parse_ca_issuers(&stdout))
    }
}

/// Find the `CA Issuers - URI:` line of `openssl x509 -text` output.
fn parse_ca_issuers(text: &str) -> Option<String> {
    text.lines()
        .filter_map(|line| line.trim().strip_prefix("CA Issuers - URI:"))
        .map(|uri| uri.trim().to_owned())
        .find(|uri| !uri.is_empty())
}
