//! Retrieval error taxonomy.

use crate::sheets::SheetsError;

/// Errors surfaced by tiered retrieval.
///
/// Remote failures pass through untouched so callers can tell a missing
/// document or sheet apart from a transient fetch failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RetrievalError {
    /// The document has no sheets, or the requested sheet id is absent.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The remote document client failed.
    #[error("REMOTE_FETCH_FAILED: {0}")]
    Remote(#[from] SheetsError),
}

impl RetrievalError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RetrievalError::NotFound(_) | RetrievalError::Remote(SheetsError::NotFound(_)))
    }

    /// Whether a later retry of the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RetrievalError::NotFound(_) => false,
            RetrievalError::Remote(e) => e.is_transient(),
        }
    }
}
