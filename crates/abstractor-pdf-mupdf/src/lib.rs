use std::path::Path;

use mupdf::{Document, TextPageFlags};

use abstractor_core::{BackendError, PdfTextBackend};

/// MuPDF-based implementation of [`PdfTextBackend`].
///
/// Reads the embedded text layer of every page in page order; pages are
/// joined with a newline separator by the caller's contract. This crate is
/// the sole AGPL island — it isolates the mupdf dependency so the rest of
/// the pipeline does not transitively depend on it.
///
/// Scanned documents typically yield next to nothing here; the acquisition
/// layer detects that and switches to the OCR backend.
#[derive(Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfTextBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::DocumentRead("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::DocumentRead(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::DocumentRead(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::DocumentRead(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::DocumentRead(e.to_string()))?;

            // Block/line iteration matches PyMuPDF's get_text("text") output
            // closely enough for line-anchored heading matching downstream.
            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        Ok(pages_text.join("\n"))
    }
}
