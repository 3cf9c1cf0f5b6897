//! Application error types.
//!
//! Each variant maps to a fixed status and message; internal detail carried
//! by a variant is logged and never sent to the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use texmage_core::auth::AuthError;
use texmage_core::generation::ProviderError;
use texmage_core::store::StoreError;
use texmage_core::validation::ValidationError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing details")]
    MissingInput,

    #[error("No credits left (balance {balance})")]
    NoCredits { balance: i64 },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Status and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Fill the inputs properly"),
            AppError::DuplicateEmail => (StatusCode::BAD_REQUEST, "User already exists."),
            AppError::InvalidCredentials => (StatusCode::BAD_REQUEST, "Invalid credentials."),
            // Auth and generation failures travel in a 200 envelope; clients
            // branch on `success`.
            AppError::MissingToken => (StatusCode::OK, "Token not found. Login again"),
            AppError::InvalidToken => (StatusCode::OK, "Not authorized. Login again"),
            AppError::MissingInput => (StatusCode::OK, "Missing details"),
            AppError::NoCredits { .. } => (StatusCode::OK, "You have no credits left."),
            AppError::Provider(_) => (StatusCode::OK, "Error generating image."),
            AppError::NotFound(_) => (StatusCode::OK, "User not found"),
            AppError::Persistence(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            AppError::Provider(detail) => error!(%detail, "image generation failed"),
            AppError::Persistence(detail) => error!(%detail, "persistence failure"),
            AppError::Internal(detail) => error!(%detail, "internal error"),
            _ => {}
        }
        let details = match &self {
            AppError::Validation(d) => Some(d.clone()),
            _ => None,
        };
        let credit_balance = match &self {
            AppError::NoCredits { balance } => Some(*balance),
            _ => None,
        };
        let body = Json(ErrorResponse {
            success: false,
            message: message.to_string(),
            details,
            credit_balance,
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            StoreError::DbError(e) => AppError::Persistence(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken => AppError::InvalidToken,
            AuthError::TokenError(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.0)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Provider(e.to_string())
    }
}

/// `details` sent for a body that is not valid JSON. Parser output stays in
/// the logs.
pub const INVALID_JSON_DETAILS: &str = "Request body must be a JSON object";

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        tracing::debug!(rejection = %e.body_text(), "json body rejected");
        AppError::Validation(INVALID_JSON_DETAILS.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn validation_carries_first_failure_as_details() {
        let (status, body) = render(AppError::Validation("Name is required.".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Fill the inputs properly");
        assert_eq!(body["details"], "Name is required.");
    }

    #[tokio::test]
    async fn no_credits_echoes_balance() {
        let (status, body) = render(AppError::NoCredits { balance: 0 }).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["creditBalance"], 0);
    }

    #[tokio::test]
    async fn provider_failure_hides_detail_and_balance() {
        let (status, body) = render(AppError::Provider("HTTP 503 upstream down".into())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Error generating image.");
        assert!(body.get("creditBalance").is_none());
        assert!(!body.to_string().contains("503"));
    }

    #[tokio::test]
    async fn persistence_failure_is_generic_500() {
        let (status, body) = render(AppError::Persistence("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error.");
        assert!(!body.to_string().contains("refused"));
    }

    #[test]
    fn duplicate_store_error_maps_to_duplicate_email() {
        assert!(matches!(
            AppError::from(StoreError::DuplicateEmail),
            AppError::DuplicateEmail
        ));
    }

    #[test]
    fn invalid_token_maps_to_fixed_message() {
        let err = AppError::from(AuthError::InvalidToken);
        assert_eq!(err.status_and_message().1, "Not authorized. Login again");
    }
}
