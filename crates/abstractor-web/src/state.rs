use std::sync::Arc;

use abstractor_core::{Pipeline, SdgClassifier};

use crate::log_db::UploadLog;

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub classifier: SdgClassifier,
    /// Shared client for webhook downloads and geolocation lookups.
    pub http: reqwest::Client,
    /// `None` when no upload log is configured; logging is best-effort.
    pub upload_log: Option<UploadLog>,
}
