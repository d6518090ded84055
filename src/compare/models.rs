//! Wire types for the comparison backend.

use serde::{Deserialize, Serialize};

/// Body of `POST /compare-prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    pub title: String,
    pub current_marketplace: String,
    pub current_price: String,
}

impl ComparisonRequest {
    pub fn new(title: &str, marketplace: &str, price: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            current_marketplace: marketplace.to_string(),
            current_price: price.unwrap_or_default().to_string(),
        }
    }
}

/// A candidate listing on another marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub marketplace: String,
    pub title: String,
    pub price: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Successful backend response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComparisonResponse {
    #[serde(default)]
    pub results: Vec<ComparisonResult>,
}

/// What a comparison request yields: results, or an error string for the
/// presenters. Never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    pub results: Vec<ComparisonResult>,
    pub error: Option<String>,
}

impl ComparisonOutcome {
    pub fn found(results: Vec<ComparisonResult>) -> Self {
        Self { results, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { results: Vec::new(), error: Some(error.into()) }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
