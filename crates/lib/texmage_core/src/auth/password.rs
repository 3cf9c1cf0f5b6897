//! Secret hashing via bcrypt.

use super::AuthError;

/// Default bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with_cost(password, BCRYPT_COST)
}

/// Hash a password with an explicit bcrypt cost. Each hash carries its own salt.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}
