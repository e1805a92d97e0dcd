use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::ErrorResponse;
use crate::state::AppState;

/// `GET /insight` — upload totals and the ten most recent submissions.
pub async fn insight(State(state): State<Arc<AppState>>) -> Response {
    let Some(log) = &state.upload_log else {
        return not_configured();
    };
    match log.insight() {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// `GET /submission/{id}` — one logged submission.
pub async fn submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    let Some(log) = &state.upload_log else {
        return not_configured();
    };
    match log.submission(id) {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Submission not found.")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

fn not_configured() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Upload log not configured.")),
    )
        .into_response()
}
