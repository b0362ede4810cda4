//! Credentials exchange for the listing's bearer token
//!
//! A fresh token is requested at the start of every pass; nothing is cached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thanksync_core::AccessTokenProvider;
use thanksync_domain::{ApiConfig, Result};
use tracing::{debug, instrument};

use super::client::{ApiClient, ErrorEnvelope};
use super::errors::ApiError;

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<ErrorEnvelope>,
}

/// Exchanges the configured email and password for an access token
pub struct CredentialsAuthenticator {
    client: ApiClient,
    endpoint: String,
    email: String,
    password: String,
}

impl CredentialsAuthenticator {
    pub fn new(
        client: ApiClient,
        endpoint: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self { client, endpoint: endpoint.into(), email: email.into(), password: password.into() }
    }

    pub fn from_config(client: ApiClient, config: &ApiConfig) -> Self {
        Self::new(client, &config.auth_endpoint, &config.email, &config.password)
    }
}

#[async_trait]
impl AccessTokenProvider for CredentialsAuthenticator {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn access_token(&self) -> Result<String> {
        let request = AuthRequest { email: &self.email, password: &self.password };
        let response: AuthResponse = self.client.post_json(&self.endpoint, &request).await?;

        if let Some(envelope) = response.error {
            return Err(envelope.into_error().into());
        }

        match response.access_token {
            Some(token) if !token.is_empty() => {
                debug!("access token acquired");
                Ok(token)
            }
            _ => Err(ApiError::MissingToken.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use thanksync_domain::ThanksyncError;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::HttpClient;

    fn authenticator(server: &MockServer) -> CredentialsAuthenticator {
        let http = HttpClient::builder().max_attempts(1).build().unwrap();
        CredentialsAuthenticator::new(
            ApiClient::new(http),
            format!("{}/auth", server.uri()),
            "robot@example.com",
            "s3cret",
        )
    }

    #[tokio::test]
    async fn posts_credentials_and_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth"))
            .and(body_json(json!({"email": "robot@example.com", "password": "s3cret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let token = authenticator(&server).access_token().await.unwrap();

        assert_eq!(token, "abc");
    }

    #[tokio::test]
    async fn error_envelope_is_an_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": {"type": "invalid_credentials"}})),
            )
            .mount(&server)
            .await;

        let err = authenticator(&server).access_token().await.unwrap_err();

        match err {
            ThanksyncError::Remote(msg) => assert!(msg.contains("invalid_credentials")),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_status_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = authenticator(&server).access_token().await.unwrap_err();

        assert!(matches!(err, ThanksyncError::Auth(_)));
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": ""})))
            .mount(&server)
            .await;

        let err = authenticator(&server).access_token().await.unwrap_err();

        assert!(matches!(err, ThanksyncError::Auth(_)));
    }
}
