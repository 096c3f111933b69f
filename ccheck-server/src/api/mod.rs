//! HTTP API handlers for ccheck-server
//!
//! The presentation shell drives the service through these endpoints:
//! session lifecycle, checks, log listing and CSV export.

pub mod checks;
pub mod health;
pub mod log;
pub mod sessions;

pub use checks::check_routes;
pub use health::health_routes;
pub use log::log_routes;
pub use sessions::session_routes;

use crate::{ApiError, AppState};
use std::sync::Arc;
use uuid::Uuid;

/// Resolve a session id or fail with 404
pub(crate) async fn require_session(
    state: &AppState,
    id: Uuid,
) -> Result<Arc<crate::sessions::Session>, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", id)))
}
