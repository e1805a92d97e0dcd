//! Text acquisition: choose between the text layer and OCR.

use std::path::Path;

use tracing::info;

use crate::{BackendError, PdfTextBackend, sanitize};

/// Sanitized-character count under which a document is considered
/// text-sparse (e.g. a scanned image PDF) and the OCR fallback runs.
pub const DEFAULT_OCR_FALLBACK_THRESHOLD: usize = 500;

/// Produce cleaned plain text for the document at `path`.
///
/// The primary backend (text layer) runs first; if its sanitized output,
/// stripped of surrounding whitespace, is shorter than `fallback_threshold`
/// characters, the fallback backend (OCR) runs instead and its sanitized
/// output is the one returned. Errors from either backend abort the whole
/// acquisition; there is no partial-page recovery.
pub fn acquire_text(
    path: &Path,
    primary: &dyn PdfTextBackend,
    fallback: &dyn PdfTextBackend,
    fallback_threshold: usize,
) -> Result<String, BackendError> {
    let cleaned = sanitize(&primary.extract_text(path)?);
    let stripped_len = cleaned.trim().chars().count();
    if stripped_len < fallback_threshold {
        info!(
            chars = stripped_len,
            threshold = fallback_threshold,
            "text layer too sparse, falling back to OCR"
        );
        return Ok(sanitize(&fallback.extract_text(path)?));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedBackend {
        text: String,
        called: AtomicBool,
    }

    impl FixedBackend {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                called: AtomicBool::new(false),
            }
        }

        fn was_called(&self) -> bool {
            self.called.load(Ordering::SeqCst)
        }
    }

    impl PdfTextBackend for FixedBackend {
        fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    struct FailingBackend;

    impl PdfTextBackend for FailingBackend {
        fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
            Err(BackendError::DocumentRead("corrupt file".into()))
        }
    }

    #[test]
    fn test_primary_sufficient_skips_ocr() {
        let long_text = "word ".repeat(200);
        let primary = FixedBackend::new(&long_text);
        let fallback = FixedBackend::new("ocr text");
        let out =
            acquire_text(Path::new("doc.pdf"), &primary, &fallback, 500).unwrap();
        assert_eq!(out, sanitize(&long_text));
        assert!(!fallback.was_called());
    }

    #[test]
    fn test_sparse_primary_triggers_ocr() {
        let primary = FixedBackend::new("too short");
        let fallback = FixedBackend::new("recovered by OCR");
        let out =
            acquire_text(Path::new("doc.pdf"), &primary, &fallback, 500).unwrap();
        assert_eq!(out, "recovered by OCR");
        assert!(fallback.was_called());
    }

    #[test]
    fn test_threshold_counts_sanitized_stripped_chars() {
        // 600 raw characters, but control characters and padding whitespace
        // bring the sanitized stripped count below the threshold.
        let noisy = format!("  {}  ", "\u{0001}".repeat(550));
        let primary = FixedBackend::new(&noisy);
        let fallback = FixedBackend::new("ocr output");
        let out =
            acquire_text(Path::new("doc.pdf"), &primary, &fallback, 500).unwrap();
        assert_eq!(out, "ocr output");
    }

    #[test]
    fn test_max_threshold_forces_fallback() {
        // `usize::MAX` is the force-OCR switch: no text layer can ever look
        // dense enough, so the fallback always runs.
        let long_text = "word ".repeat(10_000);
        let primary = FixedBackend::new(&long_text);
        let fallback = FixedBackend::new("forced ocr text");
        let out =
            acquire_text(Path::new("doc.pdf"), &primary, &fallback, usize::MAX).unwrap();
        assert_eq!(out, "forced ocr text");
        assert!(fallback.was_called());
    }

    #[test]
    fn test_primary_error_propagates() {
        let fallback = FixedBackend::new("never used");
        let err = acquire_text(Path::new("doc.pdf"), &FailingBackend, &fallback, 500)
            .unwrap_err();
        assert!(matches!(err, BackendError::DocumentRead(_)));
        assert!(!fallback.was_called());
    }

    #[test]
    fn test_fallback_error_propagates() {
        let primary = FixedBackend::new("sparse");
        let err = acquire_text(Path::new("doc.pdf"), &primary, &FailingBackend, 500)
            .unwrap_err();
        assert!(matches!(err, BackendError::DocumentRead(_)));
    }
}
