//! Full pipeline over one page: extraction, coordinator, overlay.

use crate::compare::{ComparisonBackend, ComparisonClient};
use crate::config::Config;
use crate::extract::PageDocument;
use crate::format::Formatter;
use crate::page::{PageClient, PageFetcher, PageSession};
use crate::presenter::{OverlayChannel, OverlayState};
use crate::router::{AckStatus, Coordinator, LoggingToolbar, PageChannel, Reply};
use crate::store::{TabId, TabStore};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Tab identifier used for CLI runs.
const CLI_TAB: TabId = 1;

/// Runs a page through detection, extraction and comparison.
pub struct ScanCommand {
    config: Config,
}

impl ScanCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scans `url`, reading the page from `html_path` when given and
    /// fetching it otherwise.
    pub async fn execute(&self, url: &str, html_path: Option<&Path>) -> Result<String> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        let backend =
            ComparisonClient::new(&self.config).context("Failed to create comparison client")?;

        let html = match html_path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read HTML file: {}", path.display()))?,
            None => {
                let client = PageClient::new(&self.config).context("Failed to create HTTP client")?;
                client.fetch(&url).await?
            }
        };

        let state = self.run(&url, &html, Arc::new(backend)).await?;
        Ok(Formatter::new(self.config.format).format_overlay(&state))
    }

    /// Fetches with a provided client (for testing).
    pub async fn execute_with_clients(
        &self,
        fetcher: &impl PageFetcher,
        backend: Arc<dyn ComparisonBackend>,
        url: &str,
    ) -> Result<String> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        let html = fetcher.fetch(&url).await?;

        let state = self.run(&url, &html, backend).await?;
        Ok(Formatter::new(self.config.format).format_overlay(&state))
    }

    /// Drives one page session through the coordinator and returns what
    /// the overlay ends up showing.
    pub async fn run(
        &self,
        url: &Url,
        html: &str,
        backend: Arc<dyn ComparisonBackend>,
    ) -> Result<OverlayState> {
        let session = PageSession::new(CLI_TAB, url.clone(), &self.config);

        let message = {
            let document = PageDocument::parse(html, url.clone());
            session.run_extraction(&document)
        };
        let Some(message) = message else {
            anyhow::bail!("No product detected on {}", url);
        };

        let (overlay, ready) = OverlayChannel::new(CLI_TAB, self.config.overlay_ready_timeout());
        let overlay = Arc::new(overlay);
        ready.send(true).context("Overlay channel closed")?;

        let page: Arc<dyn PageChannel> = overlay.clone();
        let coordinator = Coordinator::from_config(
            &self.config,
            TabStore::in_memory(),
            backend,
            page,
            Arc::new(LoggingToolbar),
        );

        match coordinator.handle_message(session.sender(), message).await {
            Reply::Ack(ack) if ack.status == AckStatus::Received => {}
            other => anyhow::bail!("Coordinator rejected product: {:?}", other),
        }

        let record = coordinator
            .store()
            .get(CLI_TAB)
            .await
            .context("Failed to read stored product")?
            .context("Product was not stored")?;

        info!("Requesting comparisons for {:?}", record.title);
        coordinator.handle_message(session.sender(), session.request_overlay(record)).await;

        Ok(overlay.state())
    }
}
