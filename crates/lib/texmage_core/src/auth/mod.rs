//! Authentication primitives.
//!
//! Provides secret hashing and signed identity tokens shared by the
//! account and generation flows in `texmage_api`.

pub mod jwt;
pub mod password;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signature, shape or expiry check failed. Callers get no finer detail.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
