//! Authentication middleware: `token` header extraction and JWT verification.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use texmage_core::auth::jwt::verify_token;
use texmage_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::AppError;

/// Header carrying the identity token. Not the `Authorization` scheme.
pub const TOKEN_HEADER: &str = "token";

/// Verified identity, stored in request extensions for protected handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

/// Resolve the request's token header to an identity.
///
/// A missing or empty header is [`AppError::MissingToken`]; anything that
/// fails verification is [`AppError::InvalidToken`].
pub fn authenticate(headers: &HeaderMap, secret: &[u8]) -> Result<AuthenticatedUser, AppError> {
    let value = headers.get(TOKEN_HEADER).ok_or(AppError::MissingToken)?;
    let token = value.to_str().map_err(|_| AppError::InvalidToken)?.trim();
    if token.is_empty() {
        return Err(AppError::MissingToken);
    }
    let claims = verify_token(token, secret)?;
    Ok(AuthenticatedUser(claims))
}

/// Axum middleware: runs [`authenticate`] and injects `AuthenticatedUser`
/// into request extensions. Rejected requests never reach the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), state.config.jwt_secret.as_bytes())?;
    tracing::debug!(user_id = %user.user_id(), "request authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
