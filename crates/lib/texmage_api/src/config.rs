//! API server configuration.

use std::fmt;

use texmage_core::auth::password::BCRYPT_COST;
use texmage_core::generation::clipdrop::CLIPDROP_API_URL;
use thiserror::Error;

/// Lowest and highest cost factors bcrypt accepts.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Configuration errors detected before the server starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Missing(&'static str),

    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3000").
    pub bind_addr: String,
    /// Token signing secret.
    pub jwt_secret: String,
    /// bcrypt cost factor for new password hashes.
    pub bcrypt_cost: u32,
    /// Text-to-image provider endpoint.
    pub provider_url: String,
    /// Text-to-image provider API key.
    pub provider_api_key: String,
}

impl ApiConfig {
    /// Config with default bind address, cost factor and provider endpoint.
    pub fn new(jwt_secret: impl Into<String>, provider_api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            jwt_secret: jwt_secret.into(),
            bcrypt_cost: BCRYPT_COST,
            provider_url: CLIPDROP_API_URL.into(),
            provider_api_key: provider_api_key.into(),
        }
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.provider_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("CLIPDROP_API_KEY"));
        }
        if self.provider_url.trim().is_empty() {
            return Err(ConfigError::Missing("PROVIDER_URL"));
        }
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.bcrypt_cost));
        }
        Ok(())
    }
}

// Secrets stay out of logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("provider_url", &self.provider_url)
            .field("provider_api_key", &"<redacted>")
            .finish()
    }
}
