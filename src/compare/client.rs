//! HTTP client for the price comparison backend.

use super::models::{ComparisonOutcome, ComparisonRequest, ComparisonResponse};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Error string for any non-success HTTP status.
pub const SERVER_ERROR: &str = "Server error";

/// Error string for transport failures and unreadable responses.
pub const FETCH_ERROR: &str = "Failed to fetch comparison data";

/// Trait for comparison lookups - enables mocking for tests.
///
/// Implementations never fail: problems come back as
/// [`ComparisonOutcome::error`].
#[async_trait]
pub trait ComparisonBackend: Send + Sync {
    async fn compare(&self, title: &str, marketplace: &str, price: Option<&str>)
        -> ComparisonOutcome;
}

/// Comparison backend reached over HTTP.
pub struct ComparisonClient {
    client: Client,
    base_url: String,
}

impl ComparisonClient {
    /// Creates a client for the backend configured in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, config.backend_url.clone())
    }

    /// Creates a client against an explicit base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.backend_timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build comparison client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Endpoint the request is posted to.
    pub fn endpoint(&self) -> String {
        format!("{}/compare-prices", self.base_url)
    }

    async fn post(&self, request: &ComparisonRequest) -> Result<ComparisonOutcome> {
        let body = serde_json::to_string(request).context("Failed to encode request")?;
        let url = self.endpoint();

        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            warn!("Comparison backend returned status: {}", status);
            return Ok(ComparisonOutcome::failed(SERVER_ERROR));
        }

        let text = response.text().await.context("Failed to read response body")?;
        let parsed: ComparisonResponse =
            serde_json::from_str(&text).context("Failed to decode comparison response")?;

        Ok(ComparisonOutcome::found(parsed.results))
    }
}

#[async_trait]
impl ComparisonBackend for ComparisonClient {
    async fn compare(
        &self,
        title: &str,
        marketplace: &str,
        price: Option<&str>,
    ) -> ComparisonOutcome {
        let request = ComparisonRequest::new(title, marketplace, price);
        info!("Comparing prices for {:?} from {}", title, marketplace);

        match self.post(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Error fetching comparison: {:#}", e);
                ComparisonOutcome::failed(FETCH_ERROR)
            }
        }
    }
}
