//! Error types for the authentication gateway

use crate::http::HttpError;

/// Errors from gateway operations.
///
/// `Configuration` and `Validation` are raised before any collaborator is
/// called. `RemoteAuthentication` carries the provider's `error` value
/// verbatim.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("remote authentication failed: {0}")]
    RemoteAuthentication(String),

    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

/// Result alias for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;
