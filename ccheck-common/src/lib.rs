//! # ccheck Common Library
//!
//! Shared code for the copyright check service:
//! - Check data model (kinds, media references, outcomes, log rows)
//! - Error types
//! - Bootstrap configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{CheckKind, CheckOutcome, InputOrigin, LogRow, MediaReference, VerdictMarker};
