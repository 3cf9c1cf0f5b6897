//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// JWT claims embedded in identity tokens.
///
/// Field names match the tokens minted by earlier deployments, so tokens
/// issued before a restart keep verifying as long as the secret is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Id of the user the token was issued to.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Email at issuance time.
    pub email: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
