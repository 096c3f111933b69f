//! Check data model shared by the checkers, dispatcher and session log
//!
//! A submission is classified by [`CheckKind`], carries a [`MediaReference`]
//! or pasted text, produces a [`CheckOutcome`] from exactly one leaf checker,
//! and is recorded as a [`LogRow`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Submission Types
// ============================================================================

/// Content kind selected by the user
///
/// Determines which leaf checker handles the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Image,
    Music,
    Text,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Image => "image",
            CheckKind::Music => "music",
            CheckKind::Text => "text",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(CheckKind::Image),
            "music" => Ok(CheckKind::Music),
            "text" => Ok(CheckKind::Text),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown check kind: {}",
                other
            ))),
        }
    }
}

/// Media submitted by the user: a remote URL or an uploaded file
///
/// Created per submission and consumed by the dispatcher.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaReference {
    Url(String),
    Upload { filename: String, bytes: Vec<u8> },
}

impl MediaReference {
    /// URL verbatim or upload filename, as recorded in the session log
    pub fn summary(&self) -> &str {
        match self {
            MediaReference::Url(url) => url,
            MediaReference::Upload { filename, .. } => filename,
        }
    }

    pub fn origin(&self) -> InputOrigin {
        match self {
            MediaReference::Url(_) => InputOrigin::Url,
            MediaReference::Upload { .. } => InputOrigin::Upload,
        }
    }

    /// True when there is nothing to check
    ///
    /// Whitespace counts as input. An upload is empty only when it has
    /// neither a filename nor any bytes.
    pub fn is_empty(&self) -> bool {
        match self {
            MediaReference::Url(url) => url.is_empty(),
            MediaReference::Upload { filename, bytes } => filename.is_empty() && bytes.is_empty(),
        }
    }
}

// Upload payloads can be megabytes; keep them out of debug logs.
impl fmt::Debug for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaReference::Url(url) => f.debug_tuple("Url").field(url).finish(),
            MediaReference::Upload { filename, bytes } => f
                .debug_struct("Upload")
                .field("filename", filename)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// How the input reached the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputOrigin {
    Url,
    Upload,
    Pasted,
}

// ============================================================================
// Outcome Types
// ============================================================================

/// Three-way classification shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictMarker {
    Cleared,
    Flagged,
    Warning,
}

impl VerdictMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictMarker::Cleared => "cleared",
            VerdictMarker::Flagged => "flagged",
            VerdictMarker::Warning => "warning",
        }
    }
}

impl fmt::Display for VerdictMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one leaf checker
///
/// Leaf checkers never return errors; every failure resolves to one of
/// these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Confirmed likely free
    Cleared(String),
    /// Confirmed likely copyrighted
    Flagged(String),
    /// Not enough signal to classify
    Inconclusive(String),
    /// External service unreachable, timed out, or answered unusably
    TransportError(String),
}

impl CheckOutcome {
    pub fn marker(&self) -> VerdictMarker {
        match self {
            CheckOutcome::Cleared(_) => VerdictMarker::Cleared,
            CheckOutcome::Flagged(_) => VerdictMarker::Flagged,
            CheckOutcome::Inconclusive(_) | CheckOutcome::TransportError(_) => {
                VerdictMarker::Warning
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CheckOutcome::Cleared(msg)
            | CheckOutcome::Flagged(msg)
            | CheckOutcome::Inconclusive(msg)
            | CheckOutcome::TransportError(msg) => msg,
        }
    }

    /// Display string: `"<marker>: <message>"`
    pub fn render(&self) -> String {
        format!("{}: {}", self.marker(), self.message())
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// One completed check in a session log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow {
    pub kind: CheckKind,
    pub origin: InputOrigin,
    /// URL or filename verbatim, or a truncated text excerpt
    pub input_summary: String,
    pub verdict: String,
}

impl LogRow {
    pub fn new(
        kind: CheckKind,
        origin: InputOrigin,
        input_summary: impl Into<String>,
        verdict: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            origin,
            input_summary: input_summary.into(),
            verdict: verdict.into(),
        }
    }

    /// Value of the `Type` column in the CSV export
    pub fn type_label(&self) -> &'static str {
        match (self.kind, self.origin) {
            (CheckKind::Image, InputOrigin::Upload) => "Image Upload",
            (CheckKind::Image, _) => "Image",
            (CheckKind::Music, InputOrigin::Upload) => "Music Upload",
            (CheckKind::Music, _) => "Music URL",
            (CheckKind::Text, _) => "Text",
        }
    }
}
