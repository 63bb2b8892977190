//! Upload command implementation
//!
//! Pairs image files with product metadata, validates everything, and sends
//! the batch in one request.

use super::{connect, load_runtime_config, EXIT_CONNECTION, EXIT_FAILED, EXIT_OK};
use crate::core::notify::ConsoleNotifier;
use crate::core::session::UploadSession;
use crate::core::submit::{SubmissionCoordinator, SubmitOutcome};
use crate::core::validation::FileRules;
use crate::domain::{ProductDraft, Result, SelectedFile, StockroomError};
use clap::Args;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// TOML manifest with one `[[product]]` table per file
    #[arg(short, long, conflicts_with = "files")]
    pub manifest: Option<PathBuf>,

    /// Image files to upload (drafts start empty unless set below)
    #[arg(required_unless_present = "manifest")]
    pub files: Vec<PathBuf>,

    /// Product name (single file only)
    #[arg(long, requires = "files")]
    pub name: Option<String>,

    /// Product description (single file only)
    #[arg(long, requires = "files")]
    pub description: Option<String>,

    /// Product price (single file only)
    #[arg(long, requires = "files")]
    pub price: Option<String>,

    /// Product category (single file only)
    #[arg(long, requires = "files")]
    pub category: Option<String>,
}

/// Manifest file layout
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// One entry per file, in upload order
    #[serde(rename = "product", default)]
    pub products: Vec<ManifestEntry>,
}

/// One `[[product]]` table
#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    /// Image path, relative to the manifest
    pub file: PathBuf,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Number or string; kept as text until submission
    #[serde(default)]
    pub price: Option<PriceInput>,

    #[serde(default)]
    pub category: String,
}

/// A price as written in a manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    fn into_text(self) -> String {
        match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s,
        }
    }
}

impl ManifestEntry {
    fn draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self
                .price
                .clone()
                .map(PriceInput::into_text)
                .unwrap_or_default(),
            category: self.category.clone(),
        }
    }
}

/// Parse a manifest and resolve file paths against `base_dir`
pub fn parse_manifest(contents: &str, base_dir: &Path) -> Result<Vec<(PathBuf, ProductDraft)>> {
    let manifest: Manifest = toml::from_str(contents)
        .map_err(|e| StockroomError::Validation(format!("Invalid manifest: {e}")))?;

    if manifest.products.is_empty() {
        return Err(StockroomError::Validation(
            "Manifest has no [[product]] entries".to_string(),
        ));
    }

    Ok(manifest
        .products
        .iter()
        .map(|entry| (base_dir.join(&entry.file), entry.draft()))
        .collect())
}

/// Read a file from disk into a [`SelectedFile`]
pub async fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| StockroomError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SelectedFile::new(
        name,
        SelectedFile::media_type_for_extension(&extension),
        data.into(),
    ))
}

impl UploadArgs {
    /// Execute the upload command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_runtime_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let pairs = match self.collect_inputs().await {
            Ok(pairs) => pairs,
            Err(e) => {
                println!("❌ {e}");
                return Ok(super::exit_code_for(&e));
            }
        };

        let mut files = Vec::with_capacity(pairs.len());
        for (path, _) in &pairs {
            match read_selected_file(path).await {
                Ok(file) => files.push(file),
                Err(e) => {
                    println!("❌ {e}");
                    return Ok(super::exit_code_for(&e));
                }
            }
        }

        let client = match connect(&config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let notifier = Arc::new(ConsoleNotifier);
        let mut session = UploadSession::new();
        session.select_files(files, &FileRules::from_config(&config.upload), notifier.as_ref());
        for (index, (_, draft)) in pairs.into_iter().enumerate() {
            session.fill_draft(index, draft)?;
        }

        println!(
            "📦 Uploading {} file(s) to {}",
            session.len(),
            config.api.trimmed_base_url()
        );

        let coordinator = SubmissionCoordinator::new(Arc::new(client), notifier)
            .with_upload_timeout(config.api.upload_timeout());
        let render = tokio::spawn(render_progress(
            coordinator.progress(),
            std::io::stderr(),
        ));

        let outcome = coordinator.submit(&mut session).await;
        // Closing the channel lets the renderer print the final value and stop
        drop(coordinator);
        let _ = render.await;
        eprintln!();

        Ok(match outcome {
            SubmitOutcome::Success { created, .. } => {
                for product in &created {
                    println!(
                        "   {}  {}  {}",
                        product.id,
                        product.name,
                        product.formatted_price()
                    );
                }
                EXIT_OK
            }
            SubmitOutcome::ValidationFailure { errors, .. } => {
                for (index, fields) in &errors {
                    let file = session
                        .entry(*index)
                        .map(|e| e.file.name.as_str())
                        .unwrap_or("?");
                    for (field, message) in fields {
                        println!("   [{index}] {file}: {field}: {message}");
                    }
                }
                EXIT_FAILED
            }
            SubmitOutcome::TransportFailure { .. } => EXIT_CONNECTION,
            SubmitOutcome::ServerRejection { .. }
            | SubmitOutcome::Inconsistent { .. }
            | SubmitOutcome::Busy => EXIT_FAILED,
        })
    }

    async fn collect_inputs(&self) -> Result<Vec<(PathBuf, ProductDraft)>> {
        if let Some(manifest) = &self.manifest {
            let contents = tokio::fs::read_to_string(manifest).await.map_err(|e| {
                StockroomError::Io(format!("Failed to read {}: {e}", manifest.display()))
            })?;
            let base_dir = manifest.parent().unwrap_or_else(|| Path::new("."));
            return parse_manifest(&contents, base_dir);
        }

        let has_metadata = self.name.is_some()
            || self.description.is_some()
            || self.price.is_some()
            || self.category.is_some();
        if has_metadata && self.files.len() != 1 {
            return Err(StockroomError::Validation(
                "--name/--description/--price/--category need exactly one file; use --manifest for several"
                    .to_string(),
            ));
        }

        let draft = ProductDraft {
            name: self.name.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            price: self.price.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
        };
        Ok(self
            .files
            .iter()
            .map(|path| (path.clone(), draft.clone()))
            .collect())
    }
}

/// Redraws the progress line until the sender side is dropped
async fn render_progress<W: Write>(
    mut progress: tokio::sync::watch::Receiver<u8>,
    mut out: W,
) -> W {
    while progress.changed().await.is_ok() {
        let pct = *progress.borrow_and_update();
        let _ = write!(out, "\r⬆️  Uploading... {pct:>3}%");
        let _ = out.flush();
    }
    out
}
