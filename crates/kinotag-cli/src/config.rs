//! Configuration for the `kinotag` binary.
//!
//! Loads from TOML files, environment variables, and defaults using the
//! `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag (also honoured via `KINOTAG_CONFIG`)
//! 2. XDG default: `~/.config/kinotag/config.toml`
//! 3. Built-in defaults
//!
//! Environment variables with the `KINOTAG` prefix overlay file values,
//! e.g. `KINOTAG_DATABASE_URL` for `database.url`.

use confyg::{Confygery, env};
use kinotag_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the `kinotag` binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KinotagConfig {
    /// Database configuration.
    pub database: DatabaseConfig,

    /// Classification oracle configuration.
    pub oracle: OracleConfig,

    /// Search configuration.
    pub search: SearchConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: Option<String>,
}

/// Classification oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Model ID used for classification calls.
    pub model: String,

    /// Cap on concurrently in-flight oracle calls.
    pub max_concurrency: usize,

    /// Completions between progress log lines.
    pub progress_every: usize,
}

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result limit when `--limit` is not given.
    pub default_limit: i64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_concurrency: 10,
            progress_every: 10,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

impl KinotagConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("KINOTAG");
        env_opts.add_section("database");
        env_opts.add_section("oracle");
        env_opts.add_section("search");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from the explicit flag or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kinotag").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = KinotagConfig::default();
        assert!(config.database.url.is_none());
        assert_eq!(config.oracle.model, "claude-sonnet-4-20250514");
        assert_eq!(config.oracle.max_concurrency, 10);
        assert_eq!(config.oracle.progress_every, 10);
        assert_eq!(config.search.default_limit, 5);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [database]
            url = "postgres://localhost/kinotag"

            [oracle]
            model = "claude-haiku-test"
            max_concurrency = 4

            [search]
            default_limit = 10
        "#;

        let config: KinotagConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/kinotag")
        );
        assert_eq!(config.oracle.model, "claude-haiku-test");
        assert_eq!(config.oracle.max_concurrency, 4);
        // Unset fields keep their defaults.
        assert_eq!(config.oracle.progress_every, 10);
        assert_eq!(config.search.default_limit, 10);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = KinotagConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[oracle]"));

        let parsed: KinotagConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.oracle.model, config.oracle.model);
        assert_eq!(parsed.search.default_limit, config.search.default_limit);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [database]
                url = "postgres://filehost/db"
                [oracle]
                max_concurrency = 2
            "#,
        )
        .unwrap();

        let config = KinotagConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.database.url.as_deref(), Some("postgres://filehost/db"));
        assert_eq!(config.oracle.max_concurrency, 2);
    }

    #[test]
    fn test_config_load_missing_file_falls_back_to_defaults() {
        let config = KinotagConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.oracle.max_concurrency, 10);
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = KinotagConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }
}
