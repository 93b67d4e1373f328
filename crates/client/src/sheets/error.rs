//! Document API client error types.

use std::sync::Arc;

/// Errors from the spreadsheet document API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SheetsError {
    /// Neither an access token nor an API key was configured.
    #[error("missing credentials: set an access token or API key")]
    MissingCredentials,

    /// Invalid client configuration (e.g., unusable base URL).
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Authentication or authorization failed.
    #[error("authentication failed: HTTP {status}")]
    AuthError { status: u16 },

    /// The document or range does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the document API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SheetsError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SheetsError::RateLimited | SheetsError::Timeout | SheetsError::Network(_) => true,
            SheetsError::HttpError { status } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SheetsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SheetsError::Timeout } else { SheetsError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SheetsError::MissingCredentials;
        assert!(err.to_string().contains("credentials"));

        let err = SheetsError::HttpError { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(SheetsError::RateLimited.is_transient());
        assert!(SheetsError::Timeout.is_transient());
        assert!(SheetsError::HttpError { status: 503 }.is_transient());
        assert!(!SheetsError::HttpError { status: 400 }.is_transient());
        assert!(!SheetsError::AuthError { status: 403 }.is_transient());
        assert!(!SheetsError::NotFound("abc".into()).is_transient());
        assert!(!SheetsError::Parse("eof".into()).is_transient());
    }
}
