//! ClipDrop text-to-image provider.
//!
//! Posts the prompt as a multipart form with an `x-api-key` header and reads
//! the PNG bytes from the response body.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;

use super::{ImageProvider, ProviderError};

/// Public ClipDrop text-to-image endpoint.
pub const CLIPDROP_API_URL: &str = "https://clipdrop-api.co/text-to-image/v1";

/// HTTP client for the ClipDrop API.
#[derive(Clone)]
pub struct ClipdropProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ClipdropProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(CLIPDROP_API_URL, api_key)
    }

    /// Point the provider at a different endpoint (staging, local fakes).
    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageProvider for ClipdropProvider {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let form = Form::new().text("prompt", prompt.to_string());

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ProviderError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyImage);
        }
        tracing::debug!(size = bytes.len(), "provider returned image");
        Ok(bytes.to_vec())
    }
}
