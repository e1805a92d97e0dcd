use abstractor_core::{ExtractionOutcome, SdgScore};
use serde::{Deserialize, Serialize};

// ── Response JSON ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub sdg: Vec<SdgScore>,
}

impl SuccessResponse {
    pub fn new(outcome: ExtractionOutcome) -> Self {
        Self {
            status: "success",
            abstract_text: outcome.abstract_text,
            sdg: outcome.sdg,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Forminator webhook body: `{"upload_1": "<url>"}`. Unknown fields are
/// ignored, the form builder sends plenty of them.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub upload_1: Option<String>,
}
