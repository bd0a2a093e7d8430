//! Catalog error types.

use thiserror::Error;

/// Errors that can occur when talking to a quiz store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A store location (directory or listing endpoint) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The remote store returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl CatalogError {
    /// Whether retrying the same request cannot help.
    pub fn is_permanent(&self) -> bool {
        match self {
            CatalogError::NotFound(_) | CatalogError::AuthenticationFailed(_) => true,
            CatalogError::ApiError { status, .. } => (400..500).contains(status),
            CatalogError::Timeout(_) | CatalogError::NetworkError(_) => false,
        }
    }
}
