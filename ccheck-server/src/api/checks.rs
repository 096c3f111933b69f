//! Check submission endpoints
//!
//! - POST /api/sessions/:id/check: `{"kind": "image", "url": "..."}` or
//!   `{"kind": "text", "text": "..."}`
//! - POST /api/sessions/:id/upload/:kind?filename=...: raw file bytes
//!
//! Both return `{"marker", "message", "logged", "log_length"}`. Check
//! failures (unreachable service, short text, unknown host) are reported as
//! `warning` markers with 200, never as HTTP errors.

use crate::api::require_session;
use crate::dispatcher::Payload;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    routing::post,
    Json, Router,
};
use ccheck_common::{CheckKind, MediaReference, VerdictMarker};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const DEFAULT_UPLOAD_NAME: &str = "upload";

/// URL or pasted-text submission
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub kind: CheckKind,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub marker: VerdictMarker,
    pub message: String,
    /// Whether the submission was appended to the session log
    pub logged: bool,
    pub log_length: usize,
}

impl CheckRequest {
    fn into_payload(self) -> ApiResult<Payload> {
        match (self.url, self.text) {
            (Some(_), Some(_)) => Err(ApiError::BadRequest(
                "Provide exactly one of url or text".to_string(),
            )),
            (Some(url), None) => Ok(Payload::Media(MediaReference::Url(url))),
            (None, Some(text)) => Ok(Payload::Text(text)),
            (None, None) => Ok(match self.kind {
                CheckKind::Text => Payload::Text(String::new()),
                _ => Payload::Media(MediaReference::Url(String::new())),
            }),
        }
    }
}

/// Dispatch within the session lock and record the row
async fn run_check(
    state: &AppState,
    session_id: Uuid,
    kind: CheckKind,
    payload: Payload,
) -> ApiResult<Json<CheckResponse>> {
    let session = require_session(state, session_id).await?;

    let mut log = session.log().lock().await;
    let dispatched = state.dispatcher.dispatch(kind, payload).await?;

    let logged = match dispatched.log_row {
        Some(row) => {
            log.append(row);
            true
        }
        None => false,
    };
    session.touch();

    debug!(
        session_id = %session_id,
        kind = %kind,
        logged = logged,
        log_length = log.len(),
        "Check recorded"
    );

    Ok(Json(CheckResponse {
        marker: dispatched.marker,
        message: dispatched.display_message,
        logged,
        log_length: log.len(),
    }))
}

/// POST /api/sessions/:id/check
pub async fn submit_check(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CheckRequest>,
) -> ApiResult<Json<CheckResponse>> {
    let kind = request.kind;
    let payload = request.into_payload()?;
    run_check(&state, id, kind, payload).await
}

/// POST /api/sessions/:id/upload/:kind
pub async fn submit_upload(
    State(state): State<AppState>,
    Path((id, kind)): Path<(Uuid, CheckKind)>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<CheckResponse>> {
    if kind == CheckKind::Text {
        return Err(ApiError::BadRequest(
            "Text checks take pasted text, not an upload".to_string(),
        ));
    }

    let filename = query
        .filename
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string());

    let payload = Payload::Media(MediaReference::Upload {
        filename,
        bytes: body.to_vec(),
    });
    run_check(&state, id, kind, payload).await
}

/// Build check routes
pub fn check_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/sessions/:id/check", post(submit_check))
        .route(
            "/api/sessions/:id/upload/:kind",
            post(submit_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
