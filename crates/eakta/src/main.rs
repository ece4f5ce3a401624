#![forbid(unsafe_code)]

//! eakta CLI: verify, inspect and unpack signed electronic dossiers.

use clap::{Parser, Subcommand};
use eakta_core::{algorithm, Error};
use eakta_dossier::{Dossier, Signature};
use eakta_dsig::{DsigContext, ReferenceStatus};
use eakta_keys::OpensslKeyExtractor;
use eakta_xml::XmlDocument;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "eakta",
    about = "Verify, inspect and unpack signed electronic dossiers (.es3)",
    version
)]
struct Cli {
    /// Verbose output: debug logging, including canonical forms
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every signature of a dossier
    Verify {
        /// Input dossier file
        file: PathBuf,

        /// Extract public keys with this openssl binary instead of in-process
        #[arg(long, value_name = "PATH")]
        openssl: Option<PathBuf>,

        /// Register additional ID attribute names
        #[arg(long = "id-attr")]
        id_attr: Vec<String>,
    },

    /// Print the dossier profile, documents and signers
    Inspect {
        /// Input dossier file
        file: PathBuf,

        /// Register additional ID attribute names
        #[arg(long = "id-attr")]
        id_attr: Vec<String>,
    },

    /// Decode every document and write it to a directory
    Extract {
        /// Input dossier file
        file: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long)]
        out: PathBuf,

        /// Register additional ID attribute names
        #[arg(long = "id-attr")]
        id_attr: Vec<String>,
    },

    /// Print the canonical form of the element with the given identifier
    C14n {
        /// Input XML file
        file: PathBuf,

        /// Identifier of the element
        #[arg(long)]
        id: String,

        /// Canonicalization algorithm URI
        #[arg(long, default_value = algorithm::C14N)]
        algorithm: String,

        /// Register additional ID attribute names
        #[arg(long = "id-attr")]
        id_attr: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Verify {
            file,
            openssl,
            id_attr,
        } => cmd_verify(&file, openssl, &id_attr, cli.verbose).await,
        Commands::Inspect { file, id_attr } => cmd_inspect(&file, &id_attr).map(|()| true),
        Commands::Extract { file, out, id_attr } => {
            cmd_extract(&file, &out, &id_attr).await.map(|_| true)
        }
        Commands::C14n {
            file,
            id,
            algorithm,
            id_attr,
        } => cmd_c14n(&file, &id, &algorithm, &id_attr).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Verify the dossier signature and every document signature.
///
/// Returns `Ok(false)` when any reference or signature value fails.  A
/// signature whose key cannot be extracted counts as failed; the remaining
/// signatures are still checked.
async fn cmd_verify(
    file: &Path,
    openssl: Option<PathBuf>,
    id_attr: &[String],
    verbose: bool,
) -> Result<bool, Error> {
    let xml = load(file, id_attr)?;
    let doc = xml.parse_doc()?;
    let tree = xml.tree(&doc);
    let dossier = Dossier::from_tree(&tree)?;

    let ctx = match openssl {
        Some(program) => DsigContext::new(Arc::new(OpensslKeyExtractor::new(program))),
        None => DsigContext::default(),
    }
    .with_debug(verbose);

    let signed = dossier.signature.is_some();
    if !signed {
        println!("dossier is not signed");
    }

    let outcomes = verify_signatures(&ctx, &dossier).await;
    let all_ok = signed && outcomes.iter().all(|(_, ok)| *ok);
    println!("{}", if all_ok { "OK" } else { "INVALID" });
    Ok(all_ok)
}

/// Check every signature in the dossier, document and comment signatures
/// included.  Returns each signature's Id with its verdict.
async fn verify_signatures(ctx: &DsigContext, dossier: &Dossier<'_>) -> Vec<(String, bool)> {
    let mut outcomes = Vec::new();
    for sig in dossier.signatures() {
        outcomes.push((sig.id.clone(), verify_one(ctx, sig).await));
    }
    outcomes
}

async fn verify_one(ctx: &DsigContext, sig: &Signature<'_>) -> bool {
    println!("Signature #{} ({})", sig.id, sig.certificate.subject);

    let mut ok = true;
    for result in sig.reference_results(ctx) {
        let status = match &result.status {
            ReferenceStatus::Valid => "OK".to_owned(),
            ReferenceStatus::DigestMismatch => "DIGEST MISMATCH".to_owned(),
            ReferenceStatus::Unresolved => "UNRESOLVED".to_owned(),
            ReferenceStatus::Error(e) => format!("ERROR: {e}"),
        };
        match &result.id {
            Some(id) => println!("  reference #{} ({id}): {status}", result.uri),
            None => println!("  reference #{}: {status}", result.uri),
        }
        ok &= result.is_valid();
    }

    match sig.verify(ctx).await {
        Ok(true) => println!("  signature value: OK"),
        Ok(false) => {
            println!("  signature value: INVALID");
            ok = false;
        }
        Err(e) => {
            println!("  signature value: ERROR: {e}");
            ok = false;
        }
    }
    tracing::info!(signature = %sig.id, valid = ok, "verified signature");
    ok
}

fn cmd_inspect(file: &Path, id_attr: &[String]) -> Result<(), Error> {
    let xml = load(file, id_attr)?;
    let doc = xml.parse_doc()?;
    let tree = xml.tree(&doc);
    let dossier = Dossier::from_tree(&tree)?;

    println!("Title:    {}", dossier.title);
    println!("Category: {}", dossier.category.as_deref().unwrap_or("-"));
    println!("Created:  {}", dossier.creation_date.to_rfc3339());
    if !dossier.metadata().is_empty() {
        println!("Metadata:");
        for (name, value) in dossier.metadata() {
            println!("  {name}: {value}");
        }
    }

    println!("Documents ({}):", dossier.document_count());
    for document in dossier.documents() {
        println!(
            "  {} [#{}] {}, {} bytes, transforms: {}",
            document.title,
            document.id,
            document.mime_type.essence(),
            document.source_size.bytes,
            document
                .transforms()
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    for sig in dossier.signatures() {
        println!("Signature #{}", sig.id);
        println!("  subject:   {}", sig.certificate.subject);
        println!("  issuer:    {}", sig.certificate.issuer);
        println!(
            "  valid:     {} .. {}",
            sig.certificate.not_before.to_rfc3339(),
            sig.certificate.not_after.to_rfc3339()
        );
        if let Some(uri) = &sig.certificate.ca_issuer_uri {
            println!("  CA issuer: {uri}");
        }
        if let Some(time) = sig.signed_properties.as_ref().and_then(|p| p.signing_time) {
            println!("  signed at: {}", time.to_rfc3339());
        }
        println!(
            "  timestamp: {}",
            if sig.timestamp.is_some() { "present" } else { "none" }
        );
        if let Some(comment) = sig.comment_document() {
            println!("  comment:   {}", comment.title);
        }
    }
    Ok(())
}

/// Decode every document, and every signature comment document, into `out`.
async fn cmd_extract(file: &Path, out: &Path, id_attr: &[String]) -> Result<Vec<PathBuf>, Error> {
    let xml = load(file, id_attr)?;
    let doc = xml.parse_doc()?;
    let tree = xml.tree(&doc);
    let dossier = Dossier::from_tree(&tree)?;

    std::fs::create_dir_all(out)?;
    let comments = dossier.signatures().filter_map(|sig| sig.comment_document());
    let mut written = Vec::new();
    for document in dossier.documents().chain(comments) {
        let content = document.decode_async().await?;
        let path = content.write_to_dir(out)?;
        if content.encrypted {
            println!("{} (encrypted, written as-is)", path.display());
        } else {
            println!("{}", path.display());
        }
        written.push(path);
    }
    Ok(written)
}

fn cmd_c14n(file: &Path, id: &str, algorithm: &str, id_attr: &[String]) -> Result<(), Error> {
    use std::io::Write;

    let xml = load(file, id_attr)?;
    let doc = xml.parse_doc()?;
    let tree = xml.tree(&doc);
    let node = tree
        .element_by_id(id)
        .ok_or_else(|| Error::MissingElement(format!("element with identifier {id}")))?;
    let canonical = eakta_c14n::canonicalize(node, algorithm, None)?;
    std::io::stdout().write_all(&canonical)?;
    Ok(())
}

fn load(file: &Path, id_attr: &[String]) -> Result<XmlDocument, Error> {
    let mut xml = XmlDocument::read(file)?;
    for attr in id_attr {
        xml.add_id_attr(attr);
    }
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOSSIER: &str = include_str!("../../../test-data/dossier.es3");
    const REPORT: &[u8] = include_bytes!("../../../test-data/report.txt");

    fn write_fixture(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("dossier.es3");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "eakta", "verify", "d.es3", "--openssl", "/usr/bin/openssl", "--id-attr", "ID", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Verify {
                file,
                openssl,
                id_attr,
            } => {
                assert_eq!(file, PathBuf::from("d.es3"));
                assert_eq!(openssl, Some(PathBuf::from("/usr/bin/openssl")));
                assert_eq!(id_attr, vec!["ID".to_owned()]);
            }
            _ => panic!("expected verify"),
        }

        let cli = Cli::try_parse_from(["eakta", "c14n", "d.es3", "--id", "DP0"]).unwrap();
        match cli.command {
            Commands::C14n { algorithm, .. } => assert_eq!(algorithm, algorithm::C14N),
            _ => panic!("expected c14n"),
        }

        assert!(Cli::try_parse_from(["eakta", "extract", "d.es3"]).is_err());
    }

    #[tokio::test]
    async fn test_verify_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), DOSSIER);
        assert!(cmd_verify(&path, None, &[], false).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_tampered_fixture_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tampered = DOSSIER.replace("Building permit 2024/17", "Building permit 2024/71");
        let path = write_fixture(dir.path(), &tampered);
        assert!(!cmd_verify(&path, None, &[], false).await.unwrap());
    }

    #[tokio::test]
    async fn test_unsigned_dossier_still_checks_document_signatures() {
        let start = DOSSIER.find("  <ds:Signature Id=\"SIG0\">").unwrap();
        let end = DOSSIER.rfind("</es:Dossier>").unwrap();
        let unsigned = format!("{}{}", &DOSSIER[..start], &DOSSIER[end..]);

        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), &unsigned);
        assert!(!cmd_verify(&path, None, &[], false).await.unwrap());

        let xml = XmlDocument::parse(unsigned).unwrap();
        let doc = xml.parse_doc().unwrap();
        let tree = xml.tree(&doc);
        let dossier = Dossier::from_tree(&tree).unwrap();
        assert!(dossier.signature.is_none());
        let outcomes = verify_signatures(&DsigContext::default(), &dossier).await;
        assert_eq!(outcomes, vec![("SIG2".to_owned(), true)]);
    }

    #[tokio::test]
    async fn test_verify_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_verify(&dir.path().join("absent.es3"), None, &[], false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_extract_writes_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), DOSSIER);
        let out = dir.path().join("out");

        let written = cmd_extract(&path, &out, &[]).await.unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["report.txt", "note.txt", "signer comment"]);
        assert_eq!(std::fs::read(out.join("report.txt")).unwrap(), REPORT);
        assert_eq!(
            std::fs::read(out.join("note.txt")).unwrap(),
            b"Plain note for the file.\n"
        );
    }

    #[test]
    fn test_inspect_and_c14n_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), DOSSIER);
        cmd_inspect(&path, &[]).unwrap();
        cmd_c14n(&path, "DP0", algorithm::EXC_C14N, &[]).unwrap();
        assert!(matches!(
            cmd_c14n(&path, "nope", algorithm::C14N, &[]),
            Err(Error::MissingElement(_))
        ));
        assert!(matches!(
            cmd_c14n(&path, "DP0", "urn:not-c14n", &[]),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }
}
