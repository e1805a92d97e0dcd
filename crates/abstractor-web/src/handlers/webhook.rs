use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::handlers::extract::process_upload;
use crate::models::{ErrorResponse, WebhookPayload};
use crate::state::AppState;
use crate::upload::UploadedPdf;

/// `POST /forminator-webhook` — the form builder POSTs a JSON payload whose
/// `upload_1` field carries the URL of the uploaded PDF. The file is
/// downloaded and fed through the same pipeline as a direct upload.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<WebhookPayload>,
) -> Response {
    debug!(?payload, "received forminator payload");

    let Some(file_url) = payload.upload_1.filter(|url| !url.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No file URL provided.")),
        )
            .into_response();
    };

    let resp = match state.http.get(&file_url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response();
        }
    };
    if !resp.status().is_success() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Failed to download file.")),
        )
            .into_response();
    }

    let data = match resp.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response();
        }
    };

    let upload = UploadedPdf {
        filename: "uploaded.pdf".to_string(),
        data,
    };
    process_upload(&state, upload, addr.ip().to_string()).await
}
