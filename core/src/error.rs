//! Error types for the Cloud Conformity API client.
//!
//! # Design
//! `HttpStatus` carries the reason phrase from the fixed status table plus
//! the original response, so callers can inspect the raw status and body of
//! a failed call. Transport failures and JSON decode failures are terminal
//! and surfaced as-is — there is no retry or recovery anywhere in this
//! library.

use std::fmt;

use crate::http::HttpResponse;

/// Errors returned by `ConformityClient` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The response status is in the library's error table. The reason is
    /// the conventional phrase for the code, e.g. `404 Not Found`.
    HttpStatus {
        status: u16,
        reason: &'static str,
        response: HttpResponse,
    },

    /// A connection-level failure from the HTTP collaborator.
    Transport(String),

    /// The response body could not be decoded as JSON, or a field the
    /// client must read was missing from an otherwise-successful response.
    Deserialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::HttpStatus { reason, .. } => write!(f, "{reason}"),
            ApiError::Transport(msg) => write!(f, "transport failure: {msg}"),
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_displays_reason_phrase() {
        let err = ApiError::HttpStatus {
            status: 404,
            reason: "404 Not Found",
            response: HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: String::new(),
            },
        };
        assert_eq!(err.to_string(), "404 Not Found");
    }

    #[test]
    fn transport_display_includes_cause() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport failure: connection refused");
    }
}
