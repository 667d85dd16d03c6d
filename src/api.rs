//! HTTP surface for the summarizer.
//!
//! - `POST /summarize` – Raw PDF bytes in, the final summary out as a `text/plain` attachment
//!   named `smart_summary.txt`.
//! - `POST /summarize/report` – Same pipeline, structured JSON report with per-page fragments.
//! - `GET /metrics` – Summarization counters.
//! - `GET /commands` – Machine-readable command catalog.
//! - `GET /health` – Liveness probe.
//!
//! A document without any extractable text answers `422` with the "No text detected" notice;
//! input that is not a PDF answers `400`.

use crate::metrics::MetricsSnapshot;
use crate::processing::{ProcessingError, SUMMARY_FILE_NAME, SummaryApi, SummaryReport};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_text::<S>))
        .route("/summarize/report", post(summarize_report::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Summarize an uploaded PDF and return the downloadable text document.
async fn summarize_text<S>(
    State(service): State<Arc<S>>,
    body: Bytes,
) -> Result<Response, AppError>
where
    S: SummaryApi,
{
    let report = service.summarize_document(body.to_vec()).await?;
    tracing::info!(
        pages = report.extracted_pages,
        failures = report.failed_pages(),
        "Summary request completed"
    );
    let disposition = format!("attachment; filename=\"{SUMMARY_FILE_NAME}\"");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.render(),
    )
        .into_response())
}

/// Response body for `POST /summarize/report`.
#[derive(Serialize)]
struct ReportResponse {
    #[serde(flatten)]
    report: SummaryReport,
    failed_pages: usize,
    summary: String,
}

/// Summarize an uploaded PDF and return the structured report.
async fn summarize_report<S>(
    State(service): State<Arc<S>>,
    body: Bytes,
) -> Result<Json<ReportResponse>, AppError>
where
    S: SummaryApi,
{
    let report = service.summarize_document(body.to_vec()).await?;
    Ok(Json(ReportResponse {
        failed_pages: report.failed_pages(),
        summary: report.render(),
        report,
    }))
}

/// Return summarization counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: SummaryApi,
{
    Json(service.metrics_snapshot())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Upload raw PDF bytes (Content-Type: application/pdf). Each page is classified as code, math, image, or text and summarized; the response is smart_summary.txt.",
            },
            CommandDescriptor {
                name: "summarize_report",
                method: "POST",
                path: "/summarize/report",
                description: "Same as summarize, but returns JSON with per-page content types, text sources, and summary outcomes.",
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return document, page, OCR, and failure counters.",
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Liveness probe.",
            },
        ],
    })
}

struct AppError(ProcessingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ProcessingError::NoTextDetected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ProcessingError::Extraction(_) => StatusCode::BAD_REQUEST,
            ProcessingError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.0.to_string()).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self(inner)
    }
}
