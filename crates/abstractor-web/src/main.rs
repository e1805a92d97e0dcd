use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

mod geoip;
mod handlers;
mod log_db;
mod models;
mod state;
mod upload;

use abstractor_core::{Pipeline, SdgClassifier};
use state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = abstractor_core::load_config();
    let pipeline_config = config.pipeline_config();
    let extraction = config.extraction.clone().unwrap_or_default();
    let server = config.server.clone().unwrap_or_default();

    let mut ocr = abstractor_ocr::OcrBackend::new();
    if let Some(dpi) = extraction.ocr_dpi {
        ocr = ocr.with_dpi(dpi);
    }
    if let Some(lang) = extraction.ocr_lang.clone() {
        ocr = ocr.with_lang(lang);
    }
    if let Some(secs) = extraction.ocr_page_timeout_secs {
        ocr = ocr.with_page_timeout(Duration::from_secs(secs));
    }

    let pipeline = Arc::new(Pipeline::new(
        Box::new(abstractor_pdf_mupdf::MupdfBackend::new()),
        Box::new(ocr),
        &pipeline_config,
    )?);

    let upload_log = match server.upload_log_path.as_deref() {
        Some(path) => match log_db::UploadLog::open(std::path::Path::new(path)) {
            Ok(log) => {
                info!(path, "upload log opened");
                Some(log)
            }
            Err(e) => {
                warn!(path, error = %e, "failed to open upload log");
                None
            }
        },
        None => None,
    };

    let state = Arc::new(AppState {
        pipeline,
        classifier: SdgClassifier::new(pipeline_config.classifier.clone()),
        http: reqwest::Client::new(),
        upload_log,
    });

    // Uploads are whole PDFs; allow a generous body (default 50MB)
    let body_limit = axum::extract::DefaultBodyLimit::max(
        server.body_limit_mb.unwrap_or(50) as usize * 1024 * 1024,
    );

    let app = axum::Router::new()
        .route("/", axum::routing::get(handlers::index::index))
        .route(
            "/extract-abstract",
            axum::routing::post(handlers::extract::extract),
        )
        .route(
            "/forminator-webhook",
            axum::routing::post(handlers::webhook::webhook),
        )
        .route("/insight", axum::routing::get(handlers::insight::insight))
        .route(
            "/submission/{id}",
            axum::routing::get(handlers::insight::submission),
        )
        .layer(body_limit)
        .with_state(state);

    let addr: SocketAddr = server
        .bind_addr
        .as_deref()
        .unwrap_or("0.0.0.0:5000")
        .parse()?;
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
