//! JSON request helpers over [`HttpClient`]

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thanksync_domain::{ApiConfig, Result};
use tracing::{debug, instrument};

use super::errors::ApiError;
use crate::http::HttpClient;

/// `{"error": {"type": "..."}}` as embedded in API answers
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorEnvelope {
    pub(crate) fn into_error(self) -> ApiError {
        ApiError::Envelope { kind: self.kind }
    }
}

/// Shared JSON client for both API endpoints
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
}

impl ApiClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http: Arc::new(http) }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::from_config(config)?))
    }

    /// POST `body` as JSON and decode the answer.
    #[instrument(skip(self, body))]
    pub async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request =
            self.http.request(Method::POST, url).header(ACCEPT, "application/json").json(body);
        let response = self.http.send(request).await?;
        decode(response).await
    }

    /// GET with a bearer token and query parameters, decoding the answer.
    #[instrument(skip(self, token))]
    pub async fn get_json<R>(&self, url: &str, token: &str, query: &[(&str, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let request = self
            .http
            .request(Method::GET, url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .query(query);
        let response = self.http.send(request).await?;
        decode(response).await
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(%status, "API answered with an error status");
        return Err(ApiError::from_status(status, body).into());
    }

    let bytes = response.bytes().await.map_err(|err| ApiError::Decode(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()).into())
}
