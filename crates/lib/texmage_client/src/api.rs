//! HTTP client for the Texmage API.

use reqwest::{Client, RequestBuilder};
use serde_json::json;
use url::Url;

use crate::error::ClientError;
use crate::models::{ApiReply, AuthReply, CreditsReply, GeneratedImage};

/// Header the API reads the session token from.
pub const TOKEN_HEADER: &str = "token";

/// Thin reqwest client over the four API endpoints.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// `base_url` is the server root, with or without a trailing slash.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthReply, ClientError> {
        let body = json!({ "name": name, "email": email, "password": password });
        let req = self.http.post(self.url("signup")?).json(&body);
        self.send(req).await?.into_auth()
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthReply, ClientError> {
        let body = json!({ "email": email, "password": password });
        let req = self.http.post(self.url("login")?).json(&body);
        self.send(req).await?.into_auth()
    }

    #[tracing::instrument(skip_all)]
    pub async fn credits(&self, token: &str) -> Result<CreditsReply, ClientError> {
        let req = self
            .http
            .get(self.url("credits")?)
            .header(TOKEN_HEADER, token);
        self.send(req).await?.into_credits()
    }

    #[tracing::instrument(skip(self, token))]
    pub async fn generate_image(
        &self,
        token: &str,
        prompt: &str,
    ) -> Result<GeneratedImage, ClientError> {
        let req = self
            .http
            .post(self.url("image/generate-image")?)
            .header(TOKEN_HEADER, token)
            .json(&json!({ "prompt": prompt }));
        self.send(req).await?.into_image()
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Failures arrive as JSON envelopes on both 200 and 4xx/5xx, so the body
    /// is parsed regardless of status.
    async fn send(&self, req: RequestBuilder) -> Result<ApiReply, ClientError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        serde_json::from_slice::<ApiReply>(&body).map_err(|_| {
            tracing::debug!(%status, size = body.len(), "non-envelope response");
            ClientError::UnexpectedResponse(format!("status {status}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(
            client.url("credits").unwrap().as_str(),
            "http://localhost:3000/api/credits"
        );
    }

    #[test]
    fn bare_host_joins_at_root() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        assert_eq!(
            client.url("image/generate-image").unwrap().as_str(),
            "http://localhost:3000/image/generate-image"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
