//! Session log endpoints
//!
//! - GET /api/sessions/:id/log: rows as JSON
//! - GET /api/sessions/:id/log.csv: `copyright_check_log.csv` download,
//!   404 while the log is empty

use crate::api::require_session;
use crate::session_log::{CSV_FILE_NAME, CSV_MIME};
use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub type_label: String,
    pub input: String,
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub rows: Vec<LogEntry>,
    /// The export action is only offered once a row exists
    pub export_available: bool,
}

/// GET /api/sessions/:id/log
pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LogResponse>> {
    let session = require_session(&state, id).await?;
    let log = session.log().lock().await;

    let rows = log
        .rows()
        .iter()
        .map(|row| LogEntry {
            type_label: row.type_label().to_string(),
            input: row.input_summary.clone(),
            result: row.verdict.clone(),
        })
        .collect();

    Ok(Json(LogResponse {
        rows,
        export_available: !log.is_empty(),
    }))
}

/// GET /api/sessions/:id/log.csv
pub async fn export_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let session = require_session(&state, id).await?;
    let csv = session.log().lock().await.export_csv()?;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Build log routes
pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/:id/log", get(get_log))
        .route("/api/sessions/:id/log.csv", get(export_log))
}
