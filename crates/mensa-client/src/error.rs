//! Client error types.

use thiserror::Error;

/// Errors that can occur when talking to the upstream menu API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connect, timeout, body, JSON decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message or response body.
        message: String,
    },
}
