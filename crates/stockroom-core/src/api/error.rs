use serde::Deserialize;
use thiserror::Error;

use crate::session::StorageError;

/// Message used when an error response carries no usable `message` field.
pub const GENERIC_SERVER_MESSAGE: &str = "The server could not process the request";

/// Message used when a request was sent but no response came back.
pub const UNREACHABLE_MESSAGE: &str = "No response from server. Check your connection and try again.";

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message} (status {status})")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Unreachable { message: String },

    #[error("Invalid request: {message}")]
    RequestConfig { message: String },

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    /// Build a `Server` error from a non-success response body.
    ///
    /// The message comes from a JSON `{ "message": ... }` body when there is
    /// one; anything else falls back to a generic message.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string());

        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }

    /// Classify a transport failure that never produced a response.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::RequestConfig {
                message: err.to_string(),
            }
        } else {
            ApiError::Unreachable {
                message: UNREACHABLE_MESSAGE.to_string(),
            }
        }
    }

    /// HTTP-style status for this error, as screens display it.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Server { status, .. } => *status,
            ApiError::Unreachable { .. } => 503,
            ApiError::RequestConfig { .. } | ApiError::Storage(_) => 500,
            ApiError::Validation(_) => 400,
        }
    }

    /// Human-readable message without the status suffix.
    pub fn message(&self) -> String {
        match self {
            ApiError::Server { message, .. }
            | ApiError::Unreachable { message }
            | ApiError::RequestConfig { message } => message.clone(),
            ApiError::Storage(e) => e.to_string(),
            ApiError::Validation(problems) => problems.join("; "),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401, .. })
    }
}
