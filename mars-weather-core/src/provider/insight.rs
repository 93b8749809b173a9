use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::{FetchError, provider::truncate_body};

use super::ReportProvider;

pub const DEFAULT_ENDPOINT: &str = "https://api.nasa.gov/insight_weather/";

/// Fetches the InSight weather feed from the NASA API.
#[derive(Debug, Clone)]
pub struct InsightProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl InsightProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at a different base URL, e.g. a mirror or a test server.
    pub fn with_endpoint(mut self, endpoint: &str) -> anyhow::Result<Self> {
        let url = Url::parse(endpoint)
            .with_context(|| format!("Invalid endpoint URL: {endpoint}"))?;
        self.endpoint = url.into();
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReportProvider for InsightProvider {
    async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError> {
        tracing::info!("Fetching data from: {}", self.endpoint);

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("feedtype", "json"),
                ("ver", "1.0"),
            ])
            .send()
            .await?;

        let status = res.status();
        tracing::debug!("HTTP Response Status Code: {}", status.as_u16());

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let bytes = res.bytes().await?;
        Ok(bytes.to_vec())
    }
}
