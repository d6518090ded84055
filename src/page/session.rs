//! Per-page extraction session.

use crate::config::Config;
use crate::extract::{self, PageDocument, ProductRecord};
use crate::marketplace;
use crate::router::{Message, Sender};
use crate::store::TabId;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Which wait precedes an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// First extraction after the page loaded.
    Initial,
    /// Extraction after an in-page navigation changed the URL.
    Renavigation,
}

/// State owned by the script running inside one page.
#[derive(Debug, Clone)]
pub struct PageSession {
    tab_id: TabId,
    last_url: Url,
    settle_delay: Duration,
    renavigation_delay: Duration,
}

impl PageSession {
    pub fn new(tab_id: TabId, url: Url, config: &Config) -> Self {
        Self::with_delays(
            tab_id,
            url,
            Duration::from_millis(config.settle_delay_ms),
            Duration::from_millis(config.renavigation_delay_ms),
        )
    }

    pub fn with_delays(
        tab_id: TabId,
        url: Url,
        settle_delay: Duration,
        renavigation_delay: Duration,
    ) -> Self {
        Self { tab_id, last_url: url, settle_delay, renavigation_delay }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn last_url(&self) -> &Url {
        &self.last_url
    }

    /// Sender identity for messages from this page.
    pub fn sender(&self) -> Sender {
        Sender::tab(self.tab_id)
    }

    /// Records `url` and reports whether it differs from the last one seen.
    pub fn observe_location(&mut self, url: &Url) -> bool {
        if *url == self.last_url {
            return false;
        }

        debug!("Location changed on tab {}: {} -> {}", self.tab_id, self.last_url, url);
        self.last_url = url.clone();
        true
    }

    pub fn delay_for(&self, kind: Settle) -> Duration {
        match kind {
            Settle::Initial => self.settle_delay,
            Settle::Renavigation => self.renavigation_delay,
        }
    }

    /// Waits for dynamic content to render before extracting.
    pub async fn settle(&self, kind: Settle) {
        let delay = self.delay_for(kind);
        if !delay.is_zero() {
            debug!("Settling {:?} for {}ms", kind, delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }

    /// Detects and extracts the product on `document`.
    ///
    /// Returns `None` when the page is not a recognised product page; no
    /// message is sent in that case.
    pub fn run_extraction(&self, document: &PageDocument) -> Option<Message> {
        let Some(id) = marketplace::detect(document.location(), Some(document)) else {
            debug!("Unsupported marketplace: {}", document.location());
            return None;
        };

        match extract::extract(document, id) {
            Ok(record) => {
                info!("Extracted product on {}: {}", id, record.title);
                Some(Message::ProductDetected { data: record })
            }
            Err(e) => {
                info!("Could not extract product: {}", e);
                None
            }
        }
    }

    /// Re-extracts after an in-page navigation.
    ///
    /// Returns `None` without waiting when the document's location matches
    /// the last one observed. Otherwise records the new location, waits the
    /// renavigation delay and extracts.
    pub async fn on_location_change(&mut self, document: &PageDocument) -> Option<Message> {
        if !self.observe_location(document.location()) {
            return None;
        }

        self.settle(Settle::Renavigation).await;
        self.run_extraction(document)
    }

    /// Asks the coordinator to show the overlay for `record`.
    pub fn request_overlay(&self, record: ProductRecord) -> Message {
        Message::FetchComparisonAndShowOverlay { product_data: record }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET_PAGE: &str = r#"
        <html><body>
            <div id="dp-container">
                <span id="productTitle"> Widget </span>
                <span id="priceblock_ourprice">$39.99</span>
                <img id="landingImage" src="https://x/img.jpg">
            </div>
        </body></html>
    "#;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn make_session(start: &str) -> PageSession {
        PageSession::with_delays(
            1,
            url(start),
            Duration::from_millis(2000),
            Duration::from_millis(3000),
        )
    }

    #[test]
    fn test_observe_location() {
        let mut session = make_session("https://www.amazon.com/dp/A");

        assert!(!session.observe_location(&url("https://www.amazon.com/dp/A")));
        assert!(session.observe_location(&url("https://www.amazon.com/dp/B")));
        assert_eq!(session.last_url().as_str(), "https://www.amazon.com/dp/B");
        assert!(!session.observe_location(&url("https://www.amazon.com/dp/B")));
    }

    #[test]
    fn test_default_delays_from_config() {
        let session = PageSession::new(1, url("https://www.ebay.com/itm/1"), &Config::default());
        assert_eq!(session.delay_for(Settle::Initial), Duration::from_millis(2000));
        assert_eq!(session.delay_for(Settle::Renavigation), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_full_delay() {
        let session = make_session("https://www.amazon.com/dp/A");
        let start = tokio::time::Instant::now();

        session.settle(Settle::Renavigation).await;

        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[test]
    fn test_run_extraction_on_product_page() {
        let session = make_session("https://www.amazon.com/dp/B000WIDGET");
        let doc = PageDocument::parse(WIDGET_PAGE, url("https://www.amazon.com/dp/B000WIDGET"));

        match session.run_extraction(&doc) {
            Some(Message::ProductDetected { data }) => {
                assert_eq!(data.title, "Widget");
                assert_eq!(data.price.as_deref(), Some("$39.99"));
                assert_eq!(data.marketplace, "amazon");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_location_change_same_url_is_ignored() {
        let mut session = make_session("https://www.amazon.com/dp/B000WIDGET");
        let doc = PageDocument::parse(WIDGET_PAGE, url("https://www.amazon.com/dp/B000WIDGET"));
        let start = tokio::time::Instant::now();

        assert!(session.on_location_change(&doc).await.is_none());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_location_change_reextracts_after_delay() {
        let mut session = make_session("https://www.amazon.com/dp/B000WIDGET");
        let doc = PageDocument::parse(WIDGET_PAGE, url("https://www.amazon.com/dp/B000OTHER"));
        let start = tokio::time::Instant::now();

        match session.on_location_change(&doc).await {
            Some(Message::ProductDetected { data }) => {
                assert_eq!(data.title, "Widget");
                assert_eq!(data.url, "https://www.amazon.com/dp/B000OTHER");
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(start.elapsed() >= Duration::from_millis(3000));
        assert_eq!(session.last_url().as_str(), "https://www.amazon.com/dp/B000OTHER");

        // Same location again: nothing new to extract.
        assert!(session.on_location_change(&doc).await.is_none());
    }

    #[test]
    fn test_run_extraction_unsupported_site() {
        let session = make_session("https://example.com/widget");
        let doc = PageDocument::parse(WIDGET_PAGE, url("https://example.com/widget"));
        assert!(session.run_extraction(&doc).is_none());
    }

    #[test]
    fn test_run_extraction_without_title() {
        let session = make_session("https://www.ebay.com/itm/1");
        let doc = PageDocument::parse(
            "<html><body><p>Listing ended</p></body></html>",
            url("https://www.ebay.com/itm/1"),
        );
        assert!(session.run_extraction(&doc).is_none());
    }

    #[test]
    fn test_request_overlay_message() {
        let session = make_session("https://www.ebay.com/itm/1");
        let record = ProductRecord {
            title: "Widget".to_string(),
            price: None,
            image: None,
            marketplace: "ebay".to_string(),
            url: "https://www.ebay.com/itm/1".to_string(),
            extracted_at: 1,
        };

        assert_eq!(
            session.request_overlay(record.clone()),
            Message::FetchComparisonAndShowOverlay { product_data: record }
        );
        assert_eq!(session.sender(), Sender::tab(1));
    }
}
