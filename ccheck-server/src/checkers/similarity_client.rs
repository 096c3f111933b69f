//! Text similarity client
//!
//! Posts `{"text1": <submission>, "text2": <reference>}` as JSON and reads
//! `{"score": <0.0-1.0>}` back. A missing score counts as 0; a score outside
//! that range is treated as a malformed response.

use super::TextScorer;
use async_trait::async_trait;
use ccheck_common::config::TextConfig;
use ccheck_common::CheckOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("ccheck/", env!("CARGO_PKG_VERSION"));

pub const MSG_TOO_SHORT: &str = "text too short to analyze";
pub const MSG_UNREACHABLE: &str = "could not connect to similarity service";

/// Similarity client errors
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}")]
    ApiError(u16),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Serialize)]
struct CompareRequest<'a> {
    text1: &'a str,
    text2: &'a str,
}

/// Similarity service response
#[derive(Debug, Clone, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub score: f64,
}

/// Similarity scoring client
pub struct SimilarityClient {
    http_client: reqwest::Client,
    endpoint: String,
    reference_text: String,
    /// Scores strictly above this are flagged
    threshold: f64,
    min_length: usize,
}

impl SimilarityClient {
    pub fn new(
        endpoint: impl Into<String>,
        reference_text: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SimilarityError> {
        let defaults = TextConfig::default();
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SimilarityError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            reference_text: reference_text.into(),
            threshold: defaults.threshold,
            min_length: defaults.min_length,
        })
    }

    /// Build from the `[text]` section and a resolved reference passage
    pub fn from_config(
        config: &TextConfig,
        reference_text: impl Into<String>,
    ) -> Result<Self, SimilarityError> {
        Ok(Self::new(
            config.endpoint.clone(),
            reference_text,
            Duration::from_secs(config.timeout_secs),
        )?
        .with_threshold(config.threshold)
        .with_min_length(config.min_length))
    }

    /// Set flag threshold (default: 0.8)
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set minimum analyzable length in characters (default: 20)
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Request a similarity score for `text`
    pub async fn compare(&self, text: &str) -> Result<f64, SimilarityError> {
        let request = CompareRequest {
            text1: text,
            text2: &self.reference_text,
        };

        debug!(text_chars = text.chars().count(), "Querying similarity API");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SimilarityError::Timeout
                } else {
                    SimilarityError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SimilarityError::ApiError(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SimilarityError::Timeout
            } else {
                SimilarityError::NetworkError(e.to_string())
            }
        })?;

        let parsed: CompareResponse =
            serde_json::from_slice(&body).map_err(|e| SimilarityError::ParseError(e.to_string()))?;

        if !(0.0..=1.0).contains(&parsed.score) {
            return Err(SimilarityError::ParseError(format!(
                "score out of range [0, 1]: {}",
                parsed.score
            )));
        }

        Ok(parsed.score)
    }

    /// Apply the flag threshold to a score
    pub fn verdict(&self, score: f64) -> CheckOutcome {
        if score > self.threshold {
            CheckOutcome::Flagged(format!(
                "high similarity detected (score: {:.2}), potential copyright",
                score
            ))
        } else {
            CheckOutcome::Cleared(format!(
                "low similarity (score: {:.2}), likely original",
                score
            ))
        }
    }
}

#[async_trait]
impl TextScorer for SimilarityClient {
    fn name(&self) -> &'static str {
        "similarity"
    }

    async fn score_text(&self, text: &str) -> CheckOutcome {
        if text.chars().count() < self.min_length {
            return CheckOutcome::Inconclusive(MSG_TOO_SHORT.to_string());
        }

        match self.compare(text).await {
            Ok(score) => {
                debug!(score = score, threshold = self.threshold, "Similarity score received");
                self.verdict(score)
            }
            Err(e) => {
                warn!(error = %e, "Similarity lookup failed");
                CheckOutcome::TransportError(MSG_UNREACHABLE.to_string())
            }
        }
    }
}
