//! Unit tests for configuration loading and graceful degradation
//!
//! Covers:
//! - Missing TOML files fall back to defaults without failing
//! - Config path priority: CLI → CCHECK_CONFIG → platform default
//! - Unparseable TOML is a configuration error
//! - Reference text loaded from file
//!
//! Tests that manipulate CCHECK_CONFIG are marked with #[serial]
//! so they run sequentially, not in parallel.

use ccheck_common::config::{resolve_config_path, ConfigSource, TomlConfig, CONFIG_ENV_VAR};
use ccheck_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
#[serial]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let config = TomlConfig::load(Some(&missing)).unwrap();
    assert_eq!(config.server.port, 5790);
    assert_eq!(config.image.free_domains[0], "unsplash.com");
}

#[test]
#[serial]
fn test_load_with_source_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let (config, source) = TomlConfig::load_with_source(Some(&missing)).unwrap();
    assert_eq!(source, ConfigSource::Missing(missing));
    assert_eq!(config.server.port, 5790);
}

#[test]
#[serial]
fn test_load_with_source_reports_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

    let (config, source) = TomlConfig::load_with_source(Some(file.path())).unwrap();
    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(config.logging.level, "debug");
}

#[test]
#[serial]
fn test_load_from_cli_path() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 6001

[image]
free_domains = ["example-free.org"]
strict_match = true

[sessions]
max_sessions = 8
"#
    )
    .unwrap();

    let config = TomlConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server.port, 6001);
    assert_eq!(config.image.free_domains, vec!["example-free.org".to_string()]);
    assert!(config.image.strict_match);
    assert_eq!(config.sessions.max_sessions, 8);
    assert_eq!(config.sessions.idle_timeout_secs, 3600);
}

#[test]
#[serial]
fn test_invalid_toml_is_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[server\nport = ").unwrap();

    let result = TomlConfig::load(Some(file.path()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_env_var_path_used_without_cli_arg() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/ccheck-env-config.toml");

    let path = resolve_config_path(None).unwrap();
    assert_eq!(path.to_string_lossy(), "/tmp/ccheck-env-config.toml");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_arg_overrides_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/ccheck-env-config.toml");

    let cli = std::path::PathBuf::from("/tmp/ccheck-cli-config.toml");
    let path = resolve_config_path(Some(&cli)).unwrap();
    assert_eq!(path, cli);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_empty_env_var_falls_through() {
    env::set_var(CONFIG_ENV_VAR, "   ");

    let path = resolve_config_path(None);
    assert_eq!(path, ccheck_common::config::default_config_path());

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
fn test_reference_text_from_file() {
    let mut corpus = NamedTempFile::new().unwrap();
    write!(corpus, "the quick brown fox jumps over the lazy dog").unwrap();

    let mut config = TomlConfig::default();
    config.text.reference_file = Some(corpus.path().to_path_buf());

    let reference = config.reference_text().unwrap();
    assert_eq!(reference, "the quick brown fox jumps over the lazy dog");
}

#[test]
fn test_reference_text_default_inline() {
    let config = TomlConfig::default();
    assert_eq!(
        config.reference_text().unwrap(),
        "publicly available content to compare"
    );
}

#[test]
fn test_empty_reference_file_rejected() {
    let corpus = NamedTempFile::new().unwrap();

    let mut config = TomlConfig::default();
    config.text.reference_file = Some(corpus.path().to_path_buf());

    assert!(matches!(config.reference_text(), Err(Error::Config(_))));
}
