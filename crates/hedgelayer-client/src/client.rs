// HTTP layer for the Hedge Layer API (direct reqwest, no SDK).

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};

/// Thin client over the Hedge Layer HTTP API.
///
/// Carries the base URL and bearer token; every method surfaces non-2xx
/// responses as `ApiError::Status` and performs no retries.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    authenticated: bool,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ApiError::Setup(e.to_string()))?,
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authenticated: token.is_some(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn api_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let query: Vec<(&str, &str)> = params
            .iter()
            .copied()
            .filter(|(_, v)| !v.is_empty())
            .collect();

        tracing::debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .query(&query)
            .send()
            .await?;

        Self::read_json(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        tracing::debug!(path, "POST");
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        Self::read_json(response).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        tracing::debug!(path, "PATCH");
        let response = self.http.patch(self.url(path)).json(body).send().await?;

        Self::read_json(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(path, "DELETE");
        let response = self.http.delete(self.url(path)).send().await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }

    /// POST to a streaming endpoint and hand back the raw response; the
    /// caller owns consumption of the body.
    pub async fn stream<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        tracing::debug!(path, "POST (stream)");
        let response = self
            .http
            .post(self.url(path))
            .header(ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn status_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status, "API error response");

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|parsed| {
                parsed
                    .get("error")
                    .or_else(|| parsed.get("message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        ApiError::Status { status, message }
    }
}
