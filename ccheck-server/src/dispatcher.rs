//! Check dispatcher
//!
//! Routes one submission to its leaf checker and turns the outcome into a
//! display message and a session log row.
//!
//! | Kind  | Payload      | Checker                          |
//! |-------|--------------|----------------------------------|
//! | Image | URL          | Domain Classifier                |
//! | Image | Upload       | none, manual check required      |
//! | Music | URL / Upload | Audio Fingerprint Client         |
//! | Text  | Text         | Text Similarity Client           |

use crate::checkers::{AudioIdentifier, DomainClassifier, TextScorer};
use ccheck_common::{
    CheckKind, CheckOutcome, Error, InputOrigin, LogRow, MediaReference, Result, VerdictMarker,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Characters of a text submission kept in its log row
pub const TEXT_SUMMARY_CHARS: usize = 50;

pub const MSG_IMAGE_UPLOAD: &str =
    "upload check for copyright not available, use a URL (manual check required)";
pub const VERDICT_MANUAL_CHECK: &str = "Manual Check Required";
pub const MSG_NOTHING_TO_CHECK: &str = "nothing to check";

/// Submission payload
#[derive(Debug, Clone)]
pub enum Payload {
    Media(MediaReference),
    Text(String),
}

/// Result of one dispatched submission
#[derive(Debug, Clone, Serialize)]
pub struct Dispatched {
    pub marker: VerdictMarker,
    pub display_message: String,
    /// `None` for empty submissions, which are not logged
    #[serde(skip)]
    pub log_row: Option<LogRow>,
}

impl Dispatched {
    fn checked(kind: CheckKind, origin: InputOrigin, summary: String, outcome: CheckOutcome) -> Self {
        let display_message = outcome.render();
        Self {
            marker: outcome.marker(),
            log_row: Some(LogRow::new(kind, origin, summary, display_message.clone())),
            display_message,
        }
    }

    fn empty() -> Self {
        Self {
            marker: VerdictMarker::Warning,
            display_message: format!("{}: {}", VerdictMarker::Warning, MSG_NOTHING_TO_CHECK),
            log_row: None,
        }
    }
}

/// Routes submissions to the leaf checkers
#[derive(Clone)]
pub struct Dispatcher {
    domains: DomainClassifier,
    audio: Arc<dyn AudioIdentifier>,
    text: Arc<dyn TextScorer>,
}

impl Dispatcher {
    pub fn new(
        domains: DomainClassifier,
        audio: Arc<dyn AudioIdentifier>,
        text: Arc<dyn TextScorer>,
    ) -> Self {
        Self { domains, audio, text }
    }

    /// Run one check
    ///
    /// # Errors
    /// `Error::InvalidInput` when the payload does not fit the kind
    /// (pasted text for an image or music check, media for a text check).
    pub async fn dispatch(&self, kind: CheckKind, payload: Payload) -> Result<Dispatched> {
        let dispatched = match (kind, payload) {
            (CheckKind::Image, Payload::Media(media)) => {
                if media.is_empty() {
                    return Ok(Dispatched::empty());
                }
                match media {
                    MediaReference::Url(url) => {
                        let url = url.trim().to_string();
                        let outcome = self.domains.classify_image_source(&url);
                        Dispatched::checked(kind, InputOrigin::Url, url, outcome)
                    }
                    MediaReference::Upload { filename, .. } => {
                        debug!(filename = %filename, "Image upload, no checker available");
                        Dispatched {
                            marker: VerdictMarker::Warning,
                            display_message: format!("{}: {}", VerdictMarker::Warning, MSG_IMAGE_UPLOAD),
                            log_row: Some(LogRow::new(
                                kind,
                                InputOrigin::Upload,
                                filename,
                                VERDICT_MANUAL_CHECK,
                            )),
                        }
                    }
                }
            }
            (CheckKind::Music, Payload::Media(media)) => {
                if media.is_empty() {
                    return Ok(Dispatched::empty());
                }
                let media = match media {
                    MediaReference::Url(url) => MediaReference::Url(url.trim().to_string()),
                    upload => upload,
                };
                let origin = media.origin();
                let summary = media.summary().to_string();
                debug!(checker = self.audio.name(), input = %summary, "Dispatching audio check");
                let outcome = self.audio.identify_audio(media).await;
                Dispatched::checked(kind, origin, summary, outcome)
            }
            (CheckKind::Text, Payload::Text(text)) => {
                if text.is_empty() {
                    return Ok(Dispatched::empty());
                }
                debug!(checker = self.text.name(), chars = text.chars().count(), "Dispatching text check");
                let outcome = self.text.score_text(&text).await;
                Dispatched::checked(kind, InputOrigin::Pasted, summarize_text(&text), outcome)
            }
            (CheckKind::Text, Payload::Media(_)) => {
                return Err(Error::InvalidInput(
                    "text checks take pasted text, not a URL or upload".to_string(),
                ))
            }
            (kind, Payload::Text(_)) => {
                return Err(Error::InvalidInput(format!(
                    "{} checks take a URL or an upload, not pasted text",
                    kind
                )))
            }
        };

        info!(
            kind = %kind,
            marker = %dispatched.marker,
            "Check complete"
        );

        Ok(dispatched)
    }
}

/// First 50 characters of a text submission followed by `...`
pub fn summarize_text(text: &str) -> String {
    let mut summary: String = text.chars().take(TEXT_SUMMARY_CHARS).collect();
    summary.push_str("...");
    summary
}
