//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `base_url` is empty
    /// - a sample size or snapshot cap is 0
    /// - `default_sample_size` exceeds `max_sample_size`
    /// - `large_workbook_sheets` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "base_url".into(), reason: "must not be empty".into() });
        }

        for (field, value) in [
            ("default_sample_size", self.default_sample_size),
            ("max_sample_size", self.max_sample_size),
            ("snapshot_max_rows", self.snapshot_max_rows),
            ("snapshot_max_columns", self.snapshot_max_columns),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be greater than 0".into() });
            }
        }

        if self.default_sample_size > self.max_sample_size {
            return Err(ConfigError::Invalid {
                field: "default_sample_size".into(),
                reason: format!("must not exceed max_sample_size ({})", self.max_sample_size),
            });
        }

        if self.large_workbook_sheets == 0 {
            return Err(ConfigError::Invalid {
                field: "large_workbook_sheets".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.access_token.is_some() && self.api_key.is_some() {
            tracing::warn!("Both access_token and api_key are set; access_token takes precedence");
        }

        Ok(())
    }
}
