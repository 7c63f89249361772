//! Access layer error types.
//!
//! Every backend operation fails with [`ApiError`]. The three wire-level
//! failures are `Transport`, `Http` and `Decode`; `Storage` covers the durable
//! write performed by login and logout.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Message shown to users when the backend cannot be reached.
pub const TRANSPORT_USER_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Message shown to users when the backend answers with something unreadable.
pub const DECODE_USER_MESSAGE: &str = "Unexpected response from the server.";

/// Access layer error type.
///
/// Errors are always propagated to the caller; nothing is retried or
/// swallowed here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP call could not complete (DNS, refused connection, offline,
    /// interrupted body).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    ///
    /// `message` is the backend's `error` field when one was sent, otherwise
    /// `HTTP error: status <code>`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body was not valid JSON or did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// The session token could not be written to durable storage.
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The HTTP client could not be built.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Returns the HTTP status for `Http` failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the backend rejected the call for lack of valid
    /// credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }

    /// Text a screen should render for this failure.
    ///
    /// Backend messages are shown verbatim; transport and decode failures get
    /// a generic message so internals never reach the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Transport(_) => TRANSPORT_USER_MESSAGE.to_string(),
            ApiError::Decode(_) | ApiError::Encode(_) => DECODE_USER_MESSAGE.to_string(),
            ApiError::Storage(_) => "Your session could not be saved on this device.".to_string(),
            ApiError::Configuration(reason) => reason.clone(),
        }
    }
}

/// Durable token storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
