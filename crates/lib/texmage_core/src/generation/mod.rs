//! Image generation: the external text-to-image provider seam.
//!
//! The provider is opaque: a prompt goes in, raw PNG bytes come out.
//! [`clipdrop::ClipdropProvider`] is the HTTP implementation.

pub mod clipdrop;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

pub use clipdrop::ClipdropProvider;

/// Provider call failures. The detail is for logs only.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider returned an empty image")]
    EmptyImage,
}

/// A text-to-image backend.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate an image for `prompt`, returning the raw bitmap bytes.
    ///
    /// One attempt per call: no retry, no backoff.
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Encode PNG bytes as an inline `data:` URI.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
