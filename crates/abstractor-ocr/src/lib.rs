//! OCR fallback backend.
//!
//! Rasterizes each page with `pdftoppm`, binarizes the grayscale raster with
//! Otsu's threshold and hands the binary image to the `tesseract` CLI. Both
//! tools are external; their presence is checked up front. All intermediate
//! artifacts live in a per-call temp directory that is removed on every exit
//! path (drop).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use abstractor_core::{BackendError, PdfTextBackend};

pub mod otsu;

/// Native page resolution. Matching the document's own resolution keeps the
/// raster geometry identical to the text-layer view.
pub const DEFAULT_DPI: u32 = 72;

/// Global binarization threshold used when Otsu selection degenerates.
pub const DEFAULT_GLOBAL_THRESHOLD: u8 = 150;

/// Wall-clock budget per page for the tesseract child process.
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// OCR-based implementation of [`PdfTextBackend`].
///
/// Monolingual by default (`eng`); rasterization and recognition are
/// CPU-bound and block the calling thread, so async callers run extraction
/// on a blocking pool.
pub struct OcrBackend {
    dpi: u32,
    lang: String,
    page_timeout: Duration,
    global_threshold: u8,
}

impl Default for OcrBackend {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            lang: "eng".to_string(),
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            global_threshold: DEFAULT_GLOBAL_THRESHOLD,
        }
    }
}

impl OcrBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    /// Rasterize every page of the document into grayscale PNGs inside
    /// `dir`, named so that lexicographic order is page order.
    fn rasterize(&self, path: &Path, dir: &Path) -> Result<Vec<PathBuf>, BackendError> {
        let prefix = dir.join("page");
        let output = Command::new("pdftoppm")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-gray")
            .arg("-png")
            .arg(path)
            .arg(&prefix)
            .output()?;
        if !output.status.success() {
            return Err(BackendError::DocumentRead(format!(
                "pdftoppm failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        // pdftoppm zero-pads page numbers, so lexicographic order is page order.
        pages.sort();

        if pages.is_empty() {
            return Err(BackendError::DocumentRead(
                "pdftoppm rendered no pages".into(),
            ));
        }
        Ok(pages)
    }

    /// Binarize one rendered page and run tesseract over it.
    fn ocr_page(&self, raster: &Path) -> Result<String, BackendError> {
        let gray = image::open(raster)
            .map_err(|e| {
                BackendError::PageRender(format!("{}: {}", raster.display(), e))
            })?
            .into_luma8();

        let binary = otsu::binarize(&gray, self.global_threshold);
        let binary_path = raster.with_extension("bin.png");
        binary.save(&binary_path).map_err(|e| {
            BackendError::PageRender(format!("{}: {}", binary_path.display(), e))
        })?;

        self.run_tesseract(&binary_path)
    }

    /// Run `tesseract <img> stdout -l <lang>` with a per-page timeout.
    /// Expiry kills the child and fails the page.
    fn run_tesseract(&self, img: &Path) -> Result<String, BackendError> {
        let mut child = Command::new("tesseract")
            .arg(img)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        // Drain stdout on a separate thread so a large page can't deadlock
        // the pipe while we poll for exit.
        let mut stdout = child.stdout.take().ok_or_else(|| {
            BackendError::PageRender("tesseract stdout unavailable".into())
        })?;
        let reader = std::thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).map(|_| buf)
        });

        let deadline = Instant::now() + self.page_timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = reader.join();
                    return Err(BackendError::PageRender(format!(
                        "tesseract timed out after {:?} on {}",
                        self.page_timeout,
                        img.display()
                    )));
                }
                None => std::thread::sleep(Duration::from_millis(50)),
            }
        };

        let text = reader
            .join()
            .map_err(|_| BackendError::PageRender("tesseract output reader panicked".into()))?
            .map_err(BackendError::Io)?;

        if !status.success() {
            return Err(BackendError::PageRender(format!(
                "tesseract exited with {} on {}",
                status,
                img.display()
            )));
        }
        Ok(text)
    }
}

impl PdfTextBackend for OcrBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        for tool in ["pdftoppm", "tesseract"] {
            which::which(tool).map_err(|_| {
                BackendError::DocumentRead(format!(
                    "`{tool}` not found on PATH; OCR fallback unavailable"
                ))
            })?;
        }

        let tmp = tempfile::tempdir()?;
        let pages = self.rasterize(path, tmp.path())?;
        info!(pages = pages.len(), dpi = self.dpi, "running OCR fallback");

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            debug!(page = %page.display(), "ocr page");
            texts.push(self.ocr_page(page)?);
        }
        Ok(texts.join("\n"))
    }
}
