//! ccheck-server library interface
//!
//! Exposes the checkers, dispatcher, session log and HTTP router for the
//! binary and for integration testing.

pub mod api;
pub mod checkers;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod session_log;
pub mod sessions;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use ccheck_common::config::TomlConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::checkers::{AuddClient, DomainClassifier, SimilarityClient};
use crate::dispatcher::Dispatcher;
use crate::sessions::SessionRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Routes submissions to the leaf checkers
    pub dispatcher: Dispatcher,
    /// Live sessions and their logs
    pub sessions: Arc<SessionRegistry>,
    /// Upper bound on upload request bodies
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, sessions: SessionRegistry, max_upload_bytes: usize) -> Self {
        Self {
            dispatcher,
            sessions: Arc::new(sessions),
            max_upload_bytes,
            startup_time: Utc::now(),
        }
    }

    /// Wire the production checkers from bootstrap configuration
    pub fn from_config(config: &TomlConfig) -> ccheck_common::Result<Self> {
        let domains = DomainClassifier::from_config(&config.image);

        let api_token = config::resolve_audd_api_token(config);
        let audio = AuddClient::from_config(&config.audio, api_token)
            .map_err(|e| ccheck_common::Error::Config(format!("AudD client: {}", e)))?;

        let reference_text = config.reference_text()?;
        let text = SimilarityClient::from_config(&config.text, reference_text)
            .map_err(|e| ccheck_common::Error::Config(format!("Similarity client: {}", e)))?;

        let dispatcher = Dispatcher::new(domains, Arc::new(audio), Arc::new(text));
        let sessions = SessionRegistry::new(
            Duration::from_secs(config.sessions.idle_timeout_secs),
            config.sessions.max_sessions,
        );

        Ok(Self::new(dispatcher, sessions, config.server.max_upload_bytes))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::session_routes())
        .merge(api::check_routes(state.max_upload_bytes))
        .merge(api::log_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
