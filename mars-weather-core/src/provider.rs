use crate::{
    Config, FetchError, SolWeather,
    decode::decode_report,
    provider::insight::InsightProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod file;
pub mod insight;

/// Source of raw report payloads.
#[async_trait]
pub trait ReportProvider: Send + Sync + Debug {
    async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError>;
}

/// Construct the InSight provider from config.
///
/// Falls back to NASA's public demo key when no key has been configured.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ReportProvider>> {
    if config.api_key.is_none() {
        tracing::warn!(
            "No API key configured, using the rate-limited demo key. \
             Run `mars-weather configure` to set your own."
        );
    }

    let provider = InsightProvider::new(config.api_key_or_demo().to_owned())
        .with_endpoint(config.endpoint_or_default())?;

    Ok(Box::new(provider))
}

/// Fetch one payload and turn it into display rows.
pub async fn load_weather(provider: &dyn ReportProvider) -> Result<Vec<SolWeather>, FetchError> {
    let payload = provider.fetch_payload().await?;
    let report = decode_report(&payload)?;

    tracing::debug!("sol_keys: {:?}", report.sol_keys);

    Ok(report.project())
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
