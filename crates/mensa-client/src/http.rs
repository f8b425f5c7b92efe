//! Shared HTTP response helpers.
//!
//! Centralizes the status-code check so the client module stays focused on
//! request construction.

use crate::error::ClientError;

/// Check an HTTP response for error conditions.
///
/// Returns the response unchanged on success; maps any non-success status
/// to [`ClientError::Api`] with the response body as the message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
