//! Mapping of transport-level signals to [`ExecutionError`] categories.
//!
//! | Signal                         | Category           |
//! |--------------------------------|--------------------|
//! | HTTP 408 or client timeout     | `Timeout`          |
//! | HTTP 429                       | `RateLimited`      |
//! | HTTP 503                       | `ServiceUnavailable` |
//! | other status with a message    | `ServerReported`   |
//! | anything else                  | `UnknownFailure`   |

use arena_core::ExecutionError;

use crate::types::ErrorBody;

/// Classify a non-2xx execute response from its status and raw body
pub fn classify_status(status: u16, body: &str) -> ExecutionError {
    match status {
        408 => ExecutionError::Timeout,
        429 => ExecutionError::RateLimited,
        503 => ExecutionError::ServiceUnavailable,
        _ => match server_message(body) {
            Some(message) => ExecutionError::ServerReported(message),
            None => ExecutionError::unknown(format!("HTTP {} without message", status)),
        },
    }
}

/// Classify a failure that produced no usable HTTP response
pub fn classify_transport_error(err: &reqwest::Error) -> ExecutionError {
    if err.is_timeout() {
        return ExecutionError::Timeout;
    }
    if let Some(status) = err.status() {
        return classify_status(status.as_u16(), "");
    }
    ExecutionError::unknown(err.to_string())
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
}
