//! Error types for the Vend REST client

use vend_auth::HttpError;

/// Errors from resource requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Result alias for resource operations.
pub type Result<T> = std::result::Result<T, Error>;
