use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{error, warn};

use abstractor_core::ExtractionOutcome;

use crate::models::{ErrorResponse, SuccessResponse};
use crate::state::AppState;
use crate::upload::{self, UploadedPdf};

/// `POST /extract-abstract` — multipart upload of a single PDF.
pub async fn extract(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    multipart: Multipart,
) -> Response {
    let upload = match upload::parse_multipart(multipart).await {
        Ok(upload) => upload,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response();
        }
    };

    process_upload(&state, upload, addr.ip().to_string()).await
}

/// Shared tail of the upload and webhook handlers: write the PDF into a
/// request-scoped temp directory, run the pipeline, log the upload. The temp
/// directory is removed on success and failure alike.
pub(crate) async fn process_upload(
    state: &AppState,
    upload: UploadedPdf,
    ip: String,
) -> Response {
    let temp_dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            return internal_error(format!("Failed to create temp directory: {}", e));
        }
    };
    let pdf_path = temp_dir.path().join("upload.pdf");
    if let Err(e) = std::fs::write(&pdf_path, &upload.data) {
        return internal_error(format!("Failed to write temp file: {}", e));
    }

    let result =
        abstractor_core::process_pdf(state.pipeline.clone(), &state.classifier, pdf_path).await;
    drop(temp_dir);

    match result {
        Ok(outcome) => {
            log_upload(state, &upload.filename, &ip, &outcome).await;
            Json(SuccessResponse::new(outcome)).into_response()
        }
        Err(e) => {
            error!(error = %e, filename = %upload.filename, "extraction failed");
            // Pipeline failures keep the 200-with-error-body shape that
            // webhook consumers already parse; only input validation is a 4xx.
            Json(ErrorResponse::new(e.to_string())).into_response()
        }
    }
}

async fn log_upload(state: &AppState, filename: &str, ip: &str, outcome: &ExtractionOutcome) {
    let Some(log) = &state.upload_log else {
        return;
    };
    let location = crate::geoip::lookup_location(&state.http, ip).await;
    let sdg = serde_json::to_value(&outcome.sdg).unwrap_or(serde_json::Value::Null);
    if let Err(e) = log.record(filename, ip, &location, &sdg) {
        warn!(error = %e, "failed to record upload");
    }
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}
