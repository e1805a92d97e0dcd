use std::path::Path;

use thiserror::Error;

pub mod acquire;
pub mod classifier;
pub mod config_file;
pub mod locator;
pub mod pipeline;
pub mod sanitize;

// Re-export for convenience
pub use acquire::{DEFAULT_OCR_FALLBACK_THRESHOLD, acquire_text};
pub use classifier::{ClassifierConfig, SdgClassifier, SdgScore};
pub use config_file::{ConfigFile, config_path, load_config};
pub use locator::{AbstractLocator, HeadingRule, LocatorConfig};
pub use pipeline::{ExtractError, ExtractionOutcome, Pipeline, PipelineConfig, process_pdf};
pub use sanitize::sanitize;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to read document: {0}")]
    DocumentRead(String),
    #[error("failed to render page: {0}")]
    PageRender(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level step that turns a PDF file into plain
/// text, one page after another joined with `\n`. The pipeline (sanitizing,
/// abstract boundary detection, classification) lives in this crate and is
/// backend-agnostic; `abstractor-pdf-mupdf` reads the embedded text layer and
/// `abstractor-ocr` rasterizes pages and runs OCR over them.
pub trait PdfTextBackend: Send + Sync {
    /// Extract the full text content of a PDF file, pages joined with `\n`.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}
