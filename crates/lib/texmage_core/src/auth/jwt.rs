//! JWT token generation and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Token lifetime: 30 days.
pub const TOKEN_VALIDITY_DAYS: i64 = 30;

/// Issue a signed identity token (HS256, 30 day expiry) for a user.
pub fn issue_token(user_id: &str, email: &str, secret: &[u8]) -> Result<String, AuthError> {
    issue_token_at(user_id, email, secret, Utc::now())
}

/// Issue a token as if minted at `issued_at`. The validity window starts there.
pub fn issue_token_at(
    user_id: &str,
    email: &str,
    secret: &[u8],
    issued_at: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = TokenClaims {
        user_id: user_id.to_string(),
        email: email.to_string(),
        exp: (issued_at + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        iat: issued_at.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify a token, returning its claims.
///
/// Bad signatures, malformed input and expired tokens all collapse into
/// [`AuthError::InvalidToken`].
pub fn verify_token(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    // Expiry is exact; no clock tolerance past the validity window.
    validation.leeway = 0;
    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            AuthError::InvalidToken
        })?
        .claims;
    if claims.user_id.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(claims)
}
