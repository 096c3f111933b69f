//! Leaf checkers
//!
//! Each checker performs one check strategy and resolves every failure to a
//! [`CheckOutcome`] variant:
//! 1. Domain Classifier - image URL host against a free-provider allow-list
//! 2. AudD Client - audio fingerprint lookup (URL or inline upload)
//! 3. Similarity Client - text similarity score against a reference passage
//!
//! The two network-backed checkers sit behind traits so the dispatcher can be
//! driven with in-process fakes.

pub mod audd_client;
pub mod domain_classifier;
pub mod similarity_client;

pub use audd_client::AuddClient;
pub use domain_classifier::DomainClassifier;
pub use similarity_client::SimilarityClient;

use async_trait::async_trait;
use ccheck_common::{CheckOutcome, MediaReference};

/// Audio recognition strategy
#[async_trait]
pub trait AudioIdentifier: Send + Sync {
    /// Checker name for log fields
    fn name(&self) -> &'static str;

    /// Identify a recording by URL or raw bytes
    async fn identify_audio(&self, source: MediaReference) -> CheckOutcome;
}

/// Text similarity strategy
#[async_trait]
pub trait TextScorer: Send + Sync {
    /// Checker name for log fields
    fn name(&self) -> &'static str;

    /// Score a passage against the reference corpus
    async fn score_text(&self, text: &str) -> CheckOutcome;
}
