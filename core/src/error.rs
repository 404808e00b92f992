//! Error types for the PetFriends API client.
//!
//! # Design
//! Only local and transport failures are errors. Any HTTP status the server
//! sends back, 4xx and 5xx included, is returned to the caller as an
//! `ApiResponse`; a body that is not JSON falls back to text and is not an
//! error either.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `PetClient` builders and `ApiClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `get_api_key` was called with an empty email or password.
    #[error("{0} must not be empty")]
    EmptyCredential(&'static str),

    /// The photo to upload could not be read. No request was sent.
    #[error("failed to read pet photo {}: {source}", .path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout,
    /// body read).
    #[error("HTTP transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// A response body could not be deserialized into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
