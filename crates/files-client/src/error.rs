//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// One rejected input as reported by the gateway
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Violation {
    pub msg: String,
    #[serde(default)]
    pub input: serde_json::Value,
}

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// The gateway rejected the request input (422)
    #[error("Invalid request: {}", .0.iter().map(|v| v.msg.as_str()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<Violation>),

    /// Any other non-success response
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ClientError {
    /// Build an error from a non-success response body
    pub fn from_response(status: u16, body: &str, path: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));

        match status {
            404 => Self::NotFound(path.to_string()),
            422 => match serde_json::from_value::<Vec<Violation>>(detail.clone()) {
                Ok(violations) => Self::Validation(violations),
                Err(_) => Self::Api {
                    status,
                    detail: detail.to_string(),
                },
            },
            _ => Self::Api {
                status,
                detail: match detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
            },
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
