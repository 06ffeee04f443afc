//! Error types for the remote user directory.

use thiserror::Error;

/// Failures talking to the remote user service.
///
/// Every variant surfaces from a load as the store's user-visible error
/// string. Delete settles are never surfaced (see `UserStore::delete_by_id`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered, but not with a success status.
    #[error("user service returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not a user list.
    #[error("malformed user list: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
