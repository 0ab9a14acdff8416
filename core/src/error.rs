//! Error types for the student API client.
//!
//! # Design
//! The server answers failures with an error envelope carrying a message and
//! an optional list of field-level validation strings. Anything else that
//! comes back with a non-2xx status (an HTML page from a proxy, an empty
//! body) only tells us the status line, so it lands in `Http`. A 404 is not
//! special-cased into its own variant; `is_not_found` inspects the status.

use thiserror::Error;

/// Errors returned by `StudentClient` parse methods and by transports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned a well-formed error envelope.
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        errors: Vec<String>,
    },

    /// The server returned a non-2xx status whose body was not an error envelope.
    #[error("HTTP error {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A success body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message suitable for an error panel or notification.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Server-side validation messages; empty for every other kind of failure.
    pub fn validation_errors(&self) -> &[String] {
        match self {
            ApiError::Api { errors, .. } => errors,
            _ => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
