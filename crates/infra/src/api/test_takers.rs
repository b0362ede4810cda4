//! Paginated test-taker listing

use async_trait::async_trait;
use serde::Deserialize;
use thanksync_core::TestTakerSource;
use thanksync_domain::{ApiConfig, Result, TestTaker, TestTakerPage};
use tracing::{debug, instrument};

use super::client::{ApiClient, ErrorEnvelope};

#[derive(Debug, Deserialize)]
struct TestTakersResponse {
    #[serde(default)]
    test_takers: Vec<ApiTestTaker>,
    #[serde(default)]
    total: usize,
    #[serde(default)]
    error: Option<ErrorEnvelope>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContactInfo {
    full_name: String,
    contact_email: String,
}

/// Listing entry. Fields the engine does not use are ignored.
#[derive(Debug, Deserialize)]
struct ApiTestTaker {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    is_demo: bool,
    #[serde(default)]
    percent: i64,
    finished_at: i64,
    #[serde(default)]
    contact_info: ContactInfo,
}

impl From<ApiTestTaker> for TestTaker {
    /// Contact details, when filled in, take precedence over the account ones.
    fn from(api: ApiTestTaker) -> Self {
        let ApiTestTaker { id, name, email, is_demo, percent, finished_at, contact_info } = api;
        Self {
            id,
            name: if contact_info.full_name.is_empty() { name } else { contact_info.full_name },
            email: if contact_info.contact_email.is_empty() {
                email
            } else {
                contact_info.contact_email
            },
            is_demo,
            percent,
            finished_at,
        }
    }
}

/// [`TestTakerSource`] backed by the remote listing endpoint
pub struct ApiTestTakerSource {
    client: ApiClient,
    endpoint: String,
}

impl ApiTestTakerSource {
    pub fn new(client: ApiClient, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn from_config(client: ApiClient, config: &ApiConfig) -> Self {
        Self::new(client, &config.test_takers_endpoint)
    }
}

#[async_trait]
impl TestTakerSource for ApiTestTakerSource {
    #[instrument(skip(self, token), fields(endpoint = %self.endpoint))]
    async fn list_page(&self, token: &str, limit: usize, offset: usize) -> Result<TestTakerPage> {
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let response: TestTakersResponse =
            self.client.get_json(&self.endpoint, token, &query).await?;

        if let Some(envelope) = response.error {
            return Err(envelope.into_error().into());
        }

        debug!(received = response.test_takers.len(), total = response.total, "fetched page");
        let test_takers = response.test_takers.into_iter().map(TestTaker::from).collect();
        Ok(TestTakerPage::new(test_takers, response.total))
    }
}
