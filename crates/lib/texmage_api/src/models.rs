//! Wire models for the HTTP API.
//!
//! Every response carries a `success` flag. Field names are camelCase on the
//! wire to match the browser client.

use serde::{Deserialize, Serialize};
use texmage_core::models::user::PublicUser;

/// `POST /signup` body. Fields are optional so validation can name the
/// missing one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /login` body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /image/generate-image` body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateImageRequest {
    pub prompt: Option<String>,
}

/// Successful signup or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

/// `GET /credits` success.
#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub success: bool,
    pub credits: i64,
    pub name: String,
}

/// `POST /image/generate-image` success.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub success: bool,
    pub message: String,
    pub credit_balance: i64,
    /// `data:image/png;base64,...`
    pub result_image: String,
}

/// `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub version: String,
    pub database: bool,
}

/// Failure envelope shared by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_balance: Option<i64>,
}
