//! Client error type.

use thiserror::Error;

/// Errors surfaced by [`crate::ApiClient`] and session storage.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with `success: false`.
    #[error("{message}")]
    Rejected {
        message: String,
        details: Option<String>,
        credit_balance: Option<i64>,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Text to show the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected {
                message,
                details: Some(details),
                ..
            } => format!("{message}: {details}"),
            other => other.to_string(),
        }
    }
}
