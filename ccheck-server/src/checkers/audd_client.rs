//! AudD audio recognition client
//!
//! Identifies a recording from a remote URL or an uploaded file. Both shapes
//! go to the same endpoint as a form POST:
//! - URL: `api_token`, `url`, `return`
//! - Upload: `api_token`, `audio` (standard base64 of the raw bytes), `return`
//!
//! Response: `{"status": "success", "result": {"title", "artist", ...} | null}`
//! or `{"status": "error", "error": {"error_code", "error_message"}}`.

use super::AudioIdentifier;
use async_trait::async_trait;
use base64::Engine;
use ccheck_common::config::AudioConfig;
use ccheck_common::{CheckOutcome, MediaReference};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("ccheck/", env!("CARGO_PKG_VERSION"));
const RETURN_FIELDS: &str = "apple_music,spotify";

pub const MSG_UNREACHABLE: &str = "could not contact fingerprinting service";
pub const MSG_NO_CREDENTIAL: &str = "fingerprinting service credential not configured";
pub const MSG_NO_MATCH: &str = "no match found, may be free";

/// AudD client errors
#[derive(Debug, Error)]
pub enum AuddError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}")]
    ApiError(u16),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing API token")]
    MissingApiToken,
}

/// AudD recognition response
#[derive(Debug, Clone, Deserialize)]
pub struct AuddResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<AuddMatch>,
    #[serde(default)]
    pub error: Option<AuddServiceError>,
}

/// Matched recording
#[derive(Debug, Clone, Deserialize)]
pub struct AuddMatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub song_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuddServiceError {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// AudD API client
pub struct AuddClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl AuddClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AuddError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AuddError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Build from the `[audio]` section and a resolved credential
    pub fn from_config(config: &AudioConfig, api_token: Option<String>) -> Result<Self, AuddError> {
        Self::new(
            config.endpoint.clone(),
            api_token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn has_api_token(&self) -> bool {
        self.api_token.is_some()
    }

    /// Send one recognition request and decode the response body
    pub async fn lookup(&self, source: &MediaReference) -> Result<AuddResponse, AuddError> {
        let api_token = self.api_token.as_deref().ok_or(AuddError::MissingApiToken)?;

        let mut params: Vec<(&str, String)> = vec![("api_token", api_token.to_string())];
        match source {
            MediaReference::Url(url) => params.push(("url", url.trim().to_string())),
            MediaReference::Upload { bytes, .. } => params.push((
                "audio",
                base64::engine::general_purpose::STANDARD.encode(bytes),
            )),
        }
        params.push(("return", RETURN_FIELDS.to_string()));

        debug!(source = ?source, "Querying AudD API");

        let response = self
            .http_client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuddError::Timeout
                } else {
                    AuddError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AuddError::ApiError(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                AuddError::Timeout
            } else {
                AuddError::NetworkError(e.to_string())
            }
        })?;

        serde_json::from_slice(&body).map_err(|e| AuddError::ParseError(e.to_string()))
    }

    /// Map a decoded response to a check outcome
    pub fn interpret(response: &AuddResponse) -> CheckOutcome {
        if response.status != "success" {
            let detail = response
                .error
                .as_ref()
                .and_then(|e| e.error_message.clone())
                .unwrap_or_else(|| format!("status {}", response.status));
            return CheckOutcome::TransportError(format!(
                "fingerprinting service reported an error: {}",
                detail
            ));
        }

        let Some(matched) = &response.result else {
            return CheckOutcome::Cleared(MSG_NO_MATCH.to_string());
        };

        let title = matched.title.as_deref().map(str::trim).unwrap_or_default();
        let artist = matched.artist.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() || artist.is_empty() {
            return CheckOutcome::Inconclusive("match returned without title or artist".to_string());
        }

        info!(
            title = %title,
            artist = %artist,
            album = matched.album.as_deref().unwrap_or(""),
            release_date = matched.release_date.as_deref().unwrap_or(""),
            song_link = matched.song_link.as_deref().unwrap_or(""),
            "AudD match found"
        );

        CheckOutcome::Flagged(format!("copyrighted: {} by {}", title, artist))
    }
}

#[async_trait]
impl AudioIdentifier for AuddClient {
    fn name(&self) -> &'static str {
        "AudD"
    }

    async fn identify_audio(&self, source: MediaReference) -> CheckOutcome {
        match self.lookup(&source).await {
            Ok(response) => Self::interpret(&response),
            Err(AuddError::MissingApiToken) => {
                warn!("AudD API token not configured, skipping audio check");
                CheckOutcome::TransportError(MSG_NO_CREDENTIAL.to_string())
            }
            Err(e) => {
                warn!(error = %e, "AudD lookup failed");
                CheckOutcome::TransportError(MSG_UNREACHABLE.to_string())
            }
        }
    }
}
