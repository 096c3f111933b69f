//! Credential resolution for ccheck-server
//!
//! The fingerprinting service credential is resolved with ENV → TOML
//! priority. Absence is not fatal: audio checks then report a warning.

use ccheck_common::config::TomlConfig;
use tracing::{info, warn};

/// Environment variable holding the AudD API token
pub const AUDD_TOKEN_ENV_VAR: &str = "CCHECK_AUDD_API_TOKEN";

/// Resolve the AudD API token from environment or TOML
///
/// **Priority:** ENV → TOML
pub fn resolve_audd_api_token(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(AUDD_TOKEN_ENV_VAR)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .audio
        .api_token
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "AudD API token found in both {} and TOML config. Using environment (highest priority).",
            AUDD_TOKEN_ENV_VAR
        );
    }

    if let Some(key) = env_key {
        info!("AudD API token loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("AudD API token loaded from TOML config");
        return Some(key);
    }

    warn!(
        "AudD API token not configured; audio checks will report a warning. \
         Set {} or [audio] api_token in the config file.",
        AUDD_TOKEN_ENV_VAR
    );
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
