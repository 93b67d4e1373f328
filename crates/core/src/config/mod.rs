//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHEETSCOPE_*)
//! 2. TOML config file (if SHEETSCOPE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which cache backend the retrieval layer is wired to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// SQLite file at `db_path`, survives restarts.
    #[default]
    Sqlite,
    /// Process-local map, gone on exit.
    Memory,
}

/// Credential used to authenticate against the document API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential<'a> {
    /// OAuth bearer token.
    AccessToken(&'a str),
    /// API key, only valid for publicly readable documents.
    ApiKey(&'a str),
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHEETSCOPE_*)
/// 2. TOML config file (if SHEETSCOPE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OAuth bearer token for the document API.
    ///
    /// Set via SHEETSCOPE_ACCESS_TOKEN environment variable.
    #[serde(default)]
    pub access_token: Option<String>,

    /// API key for publicly readable documents.
    ///
    /// Set via SHEETSCOPE_API_KEY environment variable.
    /// Ignored when an access token is present.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the document API.
    ///
    /// Set via SHEETSCOPE_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SHEETSCOPE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SHEETSCOPE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cache backend: "sqlite" (default) or "memory".
    ///
    /// Set via SHEETSCOPE_CACHE_BACKEND environment variable.
    #[serde(default)]
    pub cache_backend: CacheBackend,

    /// Path to SQLite cache database.
    ///
    /// Set via SHEETSCOPE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Sample size used when the caller does not request one.
    ///
    /// Set via SHEETSCOPE_DEFAULT_SAMPLE_SIZE environment variable.
    #[serde(default = "default_sample_size")]
    pub default_sample_size: u32,

    /// Upper bound on any requested sample size.
    ///
    /// Set via SHEETSCOPE_MAX_SAMPLE_SIZE environment variable.
    #[serde(default = "default_max_sample_size")]
    pub max_sample_size: u32,

    /// Row cap applied to snapshots when the caller does not supply one.
    ///
    /// Set via SHEETSCOPE_SNAPSHOT_MAX_ROWS environment variable.
    #[serde(default = "default_snapshot_max_rows")]
    pub snapshot_max_rows: u32,

    /// Fixed column cap applied to snapshots.
    ///
    /// Set via SHEETSCOPE_SNAPSHOT_MAX_COLUMNS environment variable.
    #[serde(default = "default_snapshot_max_columns")]
    pub snapshot_max_columns: u32,

    /// Workbooks with more sheets than this use the reduced structure projection.
    ///
    /// Set via SHEETSCOPE_LARGE_WORKBOOK_SHEETS environment variable.
    #[serde(default = "default_large_workbook_sheets")]
    pub large_workbook_sheets: usize,
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com/v4".into()
}

fn default_user_agent() -> String {
    "sheetscope/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./sheetscope-cache.sqlite")
}

fn default_sample_size() -> u32 {
    100
}

fn default_max_sample_size() -> u32 {
    500
}

fn default_snapshot_max_rows() -> u32 {
    5_000
}

fn default_snapshot_max_columns() -> u32 {
    100
}

fn default_large_workbook_sheets() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_key: None,
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_backend: CacheBackend::default(),
            db_path: default_db_path(),
            default_sample_size: default_sample_size(),
            max_sample_size: default_max_sample_size(),
            snapshot_max_rows: default_snapshot_max_rows(),
            snapshot_max_columns: default_snapshot_max_columns(),
            large_workbook_sheets: default_large_workbook_sheets(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHEETSCOPE_`
    /// 2. TOML file from `SHEETSCOPE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHEETSCOPE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHEETSCOPE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve the credential to authenticate with (for deferred validation).
    ///
    /// An access token wins over an API key when both are set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if neither credential is set.
    pub fn require_credentials(&self) -> Result<Credential<'_>, ConfigError> {
        if let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Credential::AccessToken(token));
        }
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(Credential::ApiKey(key));
        }
        Err(ConfigError::Missing {
            field: "access_token".into(),
            hint: "Set SHEETSCOPE_ACCESS_TOKEN or SHEETSCOPE_API_KEY environment variable".into(),
        })
    }
}
