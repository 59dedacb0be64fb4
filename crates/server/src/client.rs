//! HTTP client for the upstream prediction feed.

use std::time::Duration;

use demandlens_core::config::UpstreamConfig;
use demandlens_core::{parse_prediction_feed, ApplicationError, IngestOptions, IngestReport};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                ApplicationError::Integration(format!("failed to build feed client: {error}"))
            })?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    /// Fetch and validate the current prediction feed. The token is passed
    /// explicitly so callers decide whether the request is authenticated.
    pub async fn fetch(
        &self,
        token: Option<&SecretString>,
        options: IngestOptions,
    ) -> Result<IngestReport, ApplicationError> {
        let url = format!("{}/predictions", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|error| {
            ApplicationError::Integration(format!("prediction feed request failed: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::Integration(format!(
                "prediction feed returned status {status}"
            )));
        }

        let payload = response.text().await.map_err(|error| {
            ApplicationError::Integration(format!("prediction feed body read failed: {error}"))
        })?;

        let report = parse_prediction_feed(&payload, options)?;
        if !report.rejected.is_empty() {
            warn!(
                event_name = "feed.fetch.rejected_entries",
                rejected = report.rejected.len(),
                accepted = report.records.len(),
                "prediction feed contained malformed entries"
            );
        }

        Ok(report)
    }
}
