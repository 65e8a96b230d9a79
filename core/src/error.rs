//! Error types for the counter API client.
//!
//! # Design
//! A rejected request and a garbled success are different failures: the
//! first lands in `Http` carrying the service's status, headers and raw body,
//! the second in `DeserializationError`. Callers that retry can key off
//! `Http` alone; a schema mismatch is never worth retrying.

use std::fmt;

use thiserror::Error;

/// What the service sent back with a non-2xx status.
///
/// `message` and `body` both hold the raw response text. `body` is optional
/// so records built by hand (for example from a cached failure) can omit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub message: String,
    pub body: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

/// Errors returned by `CounterClient` operations and `parse_*` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("{0}")]
    Http(ErrorResponse),

    /// A 2xx body was not JSON or matched none of the permitted shapes.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response was obtained from the transport.
    #[error("transport failed: {0}")]
    TransportError(String),

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl ApiError {
    /// HTTP status of a rejected request, `None` for every other failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http(record) => Some(record.status),
            _ => None,
        }
    }

    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ApiError::Http(record) => Some(record),
            _ => None,
        }
    }
}
