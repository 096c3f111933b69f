//! Bootstrap configuration loading and config file resolution
//!
//! Config file priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CCHECK_CONFIG`)
//! 3. Platform config directory (`<config_dir>/ccheck/ccheck.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing file is not fatal: a warning is logged and defaults apply.
//! A file that exists but does not parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CCHECK_CONFIG";

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "ccheck.toml";

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Resolved path did not exist; defaults apply
    Missing(PathBuf),
    /// No platform config directory; defaults apply
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::Defaults => {
                warn!("No config file location available, using built-in defaults")
            }
        }
    }
}

/// Bootstrap configuration loaded from TOML
///
/// Every section is optional; absent sections take their defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub image: ImageConfig,
    pub audio: AudioConfig,
    pub text: TextConfig,
    pub sessions: SessionConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on upload request bodies
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5790,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Image source allow-list
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageConfig {
    pub free_domains: Vec<String>,
    /// Require the host to equal a listed domain or be a subdomain of it.
    /// When false, any host containing a listed domain matches.
    pub strict_match: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            free_domains: vec![
                "unsplash.com".to_string(),
                "pexels.com".to_string(),
                "pixabay.com".to_string(),
            ],
            strict_match: false,
        }
    }
}

/// Audio fingerprinting service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioConfig {
    pub endpoint: String,
    /// Service credential; `CCHECK_AUDD_API_TOKEN` takes priority
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.audd.io/".to_string(),
            api_token: None,
            timeout_secs: 10,
        }
    }
}

/// Text similarity service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TextConfig {
    pub endpoint: String,
    /// Reference passage compared against submissions
    pub reference_text: String,
    /// File whose contents replace `reference_text` when set
    pub reference_file: Option<PathBuf>,
    /// Scores strictly above this are flagged
    pub threshold: f64,
    /// Shorter texts are not sent to the service
    pub min_length: usize,
    pub timeout_secs: u64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.text-similarity.com/compare".to_string(),
            reference_text: "publicly available content to compare".to_string(),
            reference_file: None,
            threshold: 0.8,
            min_length: 20,
            timeout_secs: 10,
        }
    }
}

/// Session lifetime limits
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            max_sessions: 1024,
        }
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
    }

    /// Resolve and load the config file, falling back to defaults when none exists
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        let (config, source) = Self::load_with_source(cli_arg)?;
        source.log();
        Ok(config)
    }

    /// Like [`TomlConfig::load`] but reports where the values came from
    /// instead of logging it, for callers that install a subscriber only
    /// after reading the `[logging]` section.
    pub fn load_with_source(cli_arg: Option<&Path>) -> Result<(Self, ConfigSource)> {
        match resolve_config_path(cli_arg) {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Reference passage for the similarity service
    ///
    /// Reads `reference_file` when configured.
    pub fn reference_text(&self) -> Result<String> {
        match &self.text.reference_file {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!(
                        "Read reference file {} failed: {}",
                        path.display(),
                        e
                    ))
                })?;
                if text.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "Reference file {} is empty",
                        path.display()
                    )));
                }
                Ok(text)
            }
            None => Ok(self.text.reference_text.clone()),
        }
    }
}

/// Config file path following the priority order in the module docs
///
/// Returns `None` only when no platform config directory exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path()
}

/// `<config_dir>/ccheck/ccheck.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ccheck").join(CONFIG_FILE_NAME))
}
