//! Backend comparison command implementation.

use crate::compare::{ComparisonBackend, ComparisonClient};
use crate::config::{Config, OutputFormat};
use crate::extract::ProductRecord;
use crate::format::Formatter;
use crate::marketplace::MarketplaceId;
use crate::presenter::PopupView;
use anyhow::{Context, Result};
use tracing::info;

/// Asks the configured backend for listings matching `title`.
pub async fn compare_prices(
    config: &Config,
    title: &str,
    marketplace: &str,
    price: Option<&str>,
) -> Result<String> {
    let client = ComparisonClient::new(config).context("Failed to create comparison client")?;
    compare_prices_with_client(&client, config.format, title, marketplace, price).await
}

/// Executes a comparison with a provided backend (for testing).
pub async fn compare_prices_with_client(
    backend: &dyn ComparisonBackend,
    format: OutputFormat,
    title: &str,
    marketplace: &str,
    price: Option<&str>,
) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Product title is required");
    }

    let id: MarketplaceId = marketplace.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let product = ProductRecord {
        title: title.to_string(),
        price: price.and_then(crate::price::clean),
        image: None,
        marketplace: id.to_string(),
        url: String::new(),
        extracted_at: chrono::Utc::now().timestamp_millis(),
    };

    let outcome =
        backend.compare(&product.title, &product.marketplace, product.price.as_deref()).await;
    let formatter = Formatter::new(format);

    match PopupView::build(Some(product), outcome) {
        PopupView::Error(message) => anyhow::bail!(message),
        PopupView::Results { rows, best_deal, .. } => {
            info!("Found {} listings", rows.len());
            let mut output = formatter.format_rows(&rows);
            let readable = matches!(format, OutputFormat::Table | OutputFormat::Markdown);
            if let (Some(deal), true) = (best_deal, readable) {
                output.push_str(&format!("\n\nBest deal: {}", deal.headline()));
            }
            Ok(output)
        }
        _ => Ok(formatter.format_rows(&[])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{ComparisonOutcome, ComparisonResult, FETCH_ERROR};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockBackend {
        outcome: ComparisonOutcome,
        calls: Mutex<Vec<(String, String, Option<String>)>>,
    }

    #[async_trait]
    impl ComparisonBackend for MockBackend {
        async fn compare(
            &self,
            title: &str,
            marketplace: &str,
            price: Option<&str>,
        ) -> ComparisonOutcome {
            self.calls.lock().unwrap().push((
                title.to_string(),
                marketplace.to_string(),
                price.map(str::to_string),
            ));
            self.outcome.clone()
        }
    }

    fn listing(marketplace: &str, price: &str) -> ComparisonResult {
        ComparisonResult {
            marketplace: marketplace.to_string(),
            title: "Widget".to_string(),
            price: price.to_string(),
            url: format!("https://{}.example/widget", marketplace),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_compare_with_best_deal() {
        let backend = MockBackend {
            outcome: ComparisonOutcome::found(vec![
                listing("ebay", "$35.00"),
                listing("target", "$49.00"),
            ]),
            ..MockBackend::default()
        };

        let output = compare_prices_with_client(
            &backend,
            OutputFormat::Table,
            " Widget ",
            "amazon",
            Some("$39.99"),
        )
        .await
        .unwrap();

        assert!(output.contains("eBay US"));
        assert!(output.contains("Target US"));
        assert!(output.contains("Best deal: Save 4.99 at eBay US"));

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].0, "Widget");
        assert_eq!(calls[0].1, "amazon");
        assert_eq!(calls[0].2.as_deref(), Some("$39.99"));
    }

    #[tokio::test]
    async fn test_compare_normalizes_marketplace_and_price() {
        let backend = MockBackend::default();

        compare_prices_with_client(
            &backend,
            OutputFormat::Json,
            "Widget",
            "EBAY_AU",
            Some("AU 149"),
        )
        .await
        .unwrap();

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].1, "ebay_au");
        assert_eq!(calls[0].2.as_deref(), Some("$149"));
    }

    #[tokio::test]
    async fn test_compare_no_results() {
        let backend = MockBackend::default();
        let output =
            compare_prices_with_client(&backend, OutputFormat::Table, "Widget", "walmart", None)
                .await
                .unwrap();
        assert!(output.contains("No similar products"));
    }

    #[tokio::test]
    async fn test_compare_backend_failure() {
        let backend = MockBackend {
            outcome: ComparisonOutcome::failed(FETCH_ERROR),
            ..MockBackend::default()
        };
        let err =
            compare_prices_with_client(&backend, OutputFormat::Table, "Widget", "amazon", None)
                .await
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch comparison data: Failed to fetch comparison data"
        );
    }

    #[tokio::test]
    async fn test_compare_rejects_bad_input() {
        let backend = MockBackend::default();

        let err = compare_prices_with_client(&backend, OutputFormat::Table, "  ", "amazon", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("title is required"));

        let err =
            compare_prices_with_client(&backend, OutputFormat::Table, "Widget", "bestbuy", None)
                .await
                .unwrap_err();
        assert!(err.to_string().contains("Unknown marketplace"));
        assert!(backend.calls.lock().unwrap().is_empty());
    }
}
