//! Response normalization: the status table and JSON decoding.
//!
//! # Design
//! Which statuses are errors is a frozen lookup table, not a chain of
//! conditionals, so the policy is auditable and testable as data. The table
//! deliberately routes 201/202/204 — conventionally success codes — into the
//! error path: no Cloud Conformity operation this client wraps ever answers
//! with them, so their appearance means the call did not do what the caller
//! asked. Any status absent from the table (200, but also 418, 503, ...) is
//! treated as success and the body is decoded as JSON.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Statuses the client refuses, with their conventional reason phrases.
///
/// Per the Cloud Conformity status code documentation. Do not "fix" this to
/// conventional 2xx-is-success logic — the table IS the contract.
const ERROR_STATUSES: [(u16, &str); 11] = [
    (201, "201 Created"),
    (202, "202 Accepted"),
    (204, "204 No Content"),
    (301, "301 Moved Permanently"),
    (304, "304 Not Modified"),
    (400, "400 Bad Request"),
    (401, "401 Unauthorized"),
    (403, "403 Forbidden"),
    (404, "404 Not Found"),
    (422, "422 Unprocessable Entity"),
    (500, "500 Internal Server Error"),
];

/// Look up the reason phrase for a status in the error table.
pub fn error_reason(status: u16) -> Option<&'static str> {
    ERROR_STATUSES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, reason)| *reason)
}

/// Normalize a response: classify the status, then decode the body.
///
/// A status in the error table fails with `ApiError::HttpStatus` carrying
/// the original response; the body is never touched in that case. Any other
/// status is success and the body must be valid JSON.
pub fn process_response(response: HttpResponse) -> Result<Value, ApiError> {
    if let Some(reason) = error_reason(response.status) {
        return Err(ApiError::HttpStatus {
            status: response.status,
            reason,
            response,
        });
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
