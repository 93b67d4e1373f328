//! Spreadsheet document API client.
//!
//! Two read operations back every retrieval tier:
//!
//! - **get spreadsheet**: `GET {base}/spreadsheets/{id}` with a `fields` mask,
//!   optional `ranges`, and `includeGridData`
//! - **get range values**: `GET {base}/spreadsheets/{id}/values/{range}` with a
//!   `valueRenderOption`
//!
//! ### Behavior
//!
//! - Authenticates with an OAuth bearer token or an API key.
//! - Maps 401/403, 404 and 429 onto dedicated error variants.
//! - Never retries; callers decide based on [`SheetsError::is_transient`].

pub mod error;
pub mod request;
pub mod response;

pub use error::SheetsError;
pub use request::{SpreadsheetRequest, ValueRenderOption};
pub use response::{Spreadsheet, ValueRange};

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;
use sheetscope_core::{AppConfig, ConfigError, Credential};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default base URL for the document API.
const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "sheetscope/0.1";

/// Remote document operations the retrieval tiers depend on.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Fetch a spreadsheet resource restricted to `request.fields`.
    async fn get_spreadsheet(
        &self, spreadsheet_id: &str, request: &SpreadsheetRequest,
    ) -> Result<Spreadsheet, SheetsError>;

    /// Fetch the values of one A1 range.
    async fn get_values(
        &self, spreadsheet_id: &str, range: &str, render: ValueRenderOption,
    ) -> Result<ValueRange, SheetsError>;
}

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// `key=<api key>` query parameter.
    ApiKey(String),
}

impl std::fmt::Debug for SheetsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsAuth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            SheetsAuth::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

/// Document API client configuration.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Credential attached to every request.
    pub auth: SheetsAuth,
    /// Base URL (default: https://sheets.googleapis.com/v4).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: sheetscope/0.1).
    pub user_agent: String,
}

impl SheetsConfig {
    /// Configuration with default endpoint, timeout and user agent.
    pub fn new(auth: SheetsAuth) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Build from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SheetsError> {
        let auth = match config.require_credentials() {
            Ok(Credential::AccessToken(token)) => SheetsAuth::Bearer(token.to_string()),
            Ok(Credential::ApiKey(key)) => SheetsAuth::ApiKey(key.to_string()),
            Err(ConfigError::Missing { .. }) => return Err(SheetsError::MissingCredentials),
            Err(e) => return Err(SheetsError::InvalidConfig(e.to_string())),
        };

        Ok(Self {
            auth,
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// HTTP client for the spreadsheet document API.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
    base_url: Url,
}

impl SheetsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SheetsConfig) -> Result<Self, SheetsError> {
        match &config.auth {
            SheetsAuth::Bearer(secret) | SheetsAuth::ApiKey(secret) if secret.is_empty() => {
                return Err(SheetsError::MissingCredentials);
            }
            _ => {}
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SheetsError::InvalidConfig(format!("base_url {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(SheetsError::InvalidConfig(format!("base_url {} cannot be a base", config.base_url)));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| SheetsError::Network(Arc::new(e)))?;

        Ok(Self { http, config, base_url })
    }

    /// Create a new client from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SheetsError> {
        Self::new(SheetsConfig::from_app_config(config)?)
    }

    /// URL of the spreadsheet resource.
    pub fn spreadsheet_url(&self, spreadsheet_id: &str) -> Url {
        self.endpoint(&["spreadsheets", spreadsheet_id])
    }

    /// URL of a values range. The range is percent-encoded as one path segment.
    pub fn values_url(&self, spreadsheet_id: &str, range: &str) -> Url {
        self.endpoint(&["spreadsheets", spreadsheet_id, "values", range])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(
        &self, url: Url, query: &[(&str, String)], what: &str,
    ) -> Result<T, SheetsError> {
        let start = Instant::now();

        let mut request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(query);
        request = match &self.config.auth {
            SheetsAuth::Bearer(token) => request.bearer_auth(token),
            SheetsAuth::ApiKey(key) => request.query(&[("key", key)]),
        };

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("document API response status: {}", status);

        if let Some(err) = status_error(status, what) {
            return Err(err);
        }

        let bytes = response.bytes().await?;
        let parsed = serde_json::from_slice(&bytes).map_err(|e| SheetsError::Parse(e.to_string()))?;

        tracing::debug!("{} completed in {:?} ({} bytes)", what, start.elapsed(), bytes.len());

        Ok(parsed)
    }
}

/// Map a non-success HTTP status onto an error. `None` for success.
fn status_error(status: StatusCode, what: &str) -> Option<SheetsError> {
    match status.as_u16() {
        401 | 403 => Some(SheetsError::AuthError { status: status.as_u16() }),
        404 => Some(SheetsError::NotFound(what.to_string())),
        429 => Some(SheetsError::RateLimited),
        _ if status.is_client_error() || status.is_server_error() => {
            Some(SheetsError::HttpError { status: status.as_u16() })
        }
        _ => None,
    }
}

#[async_trait]
impl SheetsApi for SheetsClient {
    async fn get_spreadsheet(
        &self, spreadsheet_id: &str, request: &SpreadsheetRequest,
    ) -> Result<Spreadsheet, SheetsError> {
        tracing::debug!(
            "fetching spreadsheet {} (grid_data={}, ranges={})",
            spreadsheet_id,
            request.include_grid_data,
            request.ranges.len()
        );
        let what = format!("spreadsheet {spreadsheet_id}");
        self.send(self.spreadsheet_url(spreadsheet_id), &request.query_pairs(), &what)
            .await
    }

    async fn get_values(
        &self, spreadsheet_id: &str, range: &str, render: ValueRenderOption,
    ) -> Result<ValueRange, SheetsError> {
        tracing::debug!("fetching values {} from {}", range, spreadsheet_id);
        let what = format!("range {range} of spreadsheet {spreadsheet_id}");
        let query = [("valueRenderOption", render.as_str().to_string()), ("majorDimension", "ROWS".to_string())];
        self.send(self.values_url(spreadsheet_id, range), &query, &what).await
    }
}
