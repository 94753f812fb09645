// HTTP client wrapper
// One pipeline per logical service, bound to a fixed base path, with
// bearer attachment and the 401 refresh-and-replay protocol.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Request, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::SessionManager;

/// Request pipeline for one logical service (auth, policy, notification, admin)
pub struct ApiClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Service base, e.g. `http://host/api/auth`
    base_url: Url,

    /// Shared credential owner
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Create a pipeline bound to `base_path` under the configured API URL.
    pub fn new(
        config: &ClientConfig,
        base_path: &str,
        session: Arc<SessionManager>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.endpoint(base_path)?,
            session,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}{}", base, path))
            .with_context(|| format!("Invalid request path: {}", path))
            .map_err(Error::from)
    }

    fn bearer(token: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(&format!("Bearer {}", token))
            .context("Access token is not a valid header value")
            .map_err(Error::from)
    }

    /// Execute a request, attaching the bearer token when a session exists.
    ///
    /// On 401 with a stored refresh token: refresh once, replay the
    /// original request once with the new token, and return the replay's
    /// outcome as if no failure had occurred. The replay never triggers a
    /// second refresh. Every other response passes through unchanged.
    async fn execute(&self, mut request: Request) -> Result<Response> {
        let attached_token = self.session.access_token().await;
        if let Some(token) = &attached_token {
            request
                .headers_mut()
                .insert(AUTHORIZATION, Self::bearer(token)?);
        }

        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        let attempt = request
            .try_clone()
            .ok_or_else(|| Error::Internal(anyhow::anyhow!("Request body is not cloneable")))?;
        let response = self.client.execute(attempt).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // 401: refresh and replay once, if we have something to refresh with
        let stale_token = match attached_token {
            Some(token) if self.session.refresh_token().await.is_some() => token,
            _ => return Ok(response),
        };

        tracing::warn!(method = %method, url = %url, "Received 401, refreshing session and retrying");
        let new_token = self.session.refresh(&stale_token).await?;

        request
            .headers_mut()
            .insert(AUTHORIZATION, Self::bearer(&new_token)?);
        let retried = self.client.execute(request).await?;
        Ok(retried)
    }

    /// Map a non-success response to `Error::Api`, extracting the
    /// backend's `{"detail": "..."}` message when present.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| {
                v.get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(text);

        tracing::debug!(status = status.as_u16(), message = %message, "API error response");
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn request_json<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let response = Self::check(self.execute(request).await?).await?;
        Ok(response.json().await?)
    }

    async fn request_unit(&self, request: Request) -> Result<()> {
        Self::check(self.execute(request).await?).await?;
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.client.get(self.url(path)?).build()?;
        self.request_json(request).await
    }

    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let request = self.client.get(self.url(path)?).query(params).build()?;
        self.request_json(request).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.url(path)?).json(body).build()?;
        self.request_json(request).await
    }

    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.client.post(self.url(path)?).json(body).build()?;
        self.request_unit(request).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<()> {
        let request = self.client.post(self.url(path)?).build()?;
        self.request_unit(request).await
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self
            .client
            .request(Method::PATCH, self.url(path)?)
            .json(body)
            .build()?;
        self.request_json(request).await
    }

    pub async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let request = self
            .client
            .request(Method::PATCH, self.url(path)?)
            .json(body)
            .build()?;
        self.request_unit(request).await
    }

    pub async fn patch_empty(&self, path: &str) -> Result<()> {
        let request = self.client.request(Method::PATCH, self.url(path)?).build()?;
        self.request_unit(request).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self
            .client
            .request(Method::DELETE, self.url(path)?)
            .build()?;
        self.request_unit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CredentialStore;

    fn test_client(base_path: &str) -> ApiClient {
        let config = ClientConfig::new("http://localhost:8000", "/tmp/unused.db").unwrap();
        let session = Arc::new(
            SessionManager::with_store(&config, CredentialStore::in_memory().unwrap()).unwrap(),
        );
        ApiClient::new(&config, base_path, session).unwrap()
    }

    #[test]
    fn test_url_joins_base_path() {
        let client = test_client("/api/auth");
        let url = client.url("/login").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/auth/login");

        let client = test_client("/api");
        let url = client.url("/policies/search").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/policies/search");
    }

    #[test]
    fn test_bearer_header_format() {
        let header = ApiClient::bearer("at-1").unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer at-1");
    }
}
