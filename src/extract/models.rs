//! The product record produced by extraction.

use serde::{Deserialize, Serialize};

/// A product scraped from one page load, owned by the tab that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product title, never empty
    pub title: String,
    /// Display price such as `$39.99`
    pub price: Option<String>,
    /// Absolute image URL
    pub image: Option<String>,
    /// Marketplace identifier (`amazon`, `ebay_au`, ...)
    pub marketplace: String,
    /// Page the record was extracted from
    pub url: String,
    /// Extraction instant, milliseconds since the Unix epoch
    pub extracted_at: i64,
}

impl ProductRecord {
    /// Numeric magnitude of the display price, `0.0` when unknown.
    pub fn price_value(&self) -> f64 {
        self.price.as_deref().map(crate::price::parse_numeric).unwrap_or(0.0)
    }
}
