//! Detection and extraction over a saved page.

use crate::config::Config;
use crate::extract::{self, PageDocument};
use crate::format::Formatter;
use crate::marketplace::{self, MarketplaceId};
use anyhow::{Context, Result};
use std::path::Path;
use url::Url;

/// Runs detection, and optionally extraction, without the coordinator.
pub struct ExtractCommand {
    config: Config,
}

impl ExtractCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Detects the marketplace for `url`, using `html_path` for page
    /// signals when given.
    pub fn detect(&self, url: &str, html_path: Option<&Path>) -> Result<Option<MarketplaceId>> {
        let url = parse_url(url)?;
        let html = html_path.map(read_html).transpose()?;
        Ok(self.detect_html(&url, html.as_deref()))
    }

    pub fn detect_html(&self, url: &Url, html: Option<&str>) -> Option<MarketplaceId> {
        let document = html.map(|html| PageDocument::parse(html, url.clone()));
        marketplace::detect(url, document.as_ref())
    }

    /// Extracts the product from the page saved at `html_path`.
    pub fn execute(&self, url: &str, html_path: &Path) -> Result<String> {
        let url = parse_url(url)?;
        let html = read_html(html_path)?;
        self.execute_html(&url, &html)
    }

    /// Extracts from HTML already in memory (for testing).
    pub fn execute_html(&self, url: &Url, html: &str) -> Result<String> {
        let document = PageDocument::parse(html, url.clone());
        let id = marketplace::detect(url, Some(&document))
            .with_context(|| format!("Unsupported marketplace: {}", url))?;

        let record = extract::extract(&document, id)?;
        Ok(Formatter::new(self.config.format).format_product(&record))
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).with_context(|| format!("Invalid URL: {}", url))
}

fn read_html(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read HTML file: {}", path.display()))
}
