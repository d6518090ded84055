//! Messages exchanged between the page session, the coordinator and the
//! popup.
//!
//! Each direction is a closed enum tagged by `action`, matching the JSON
//! shape the extension contexts exchange.

use crate::compare::{ComparisonOutcome, ComparisonResult};
use crate::extract::ProductRecord;
use crate::store::TabId;
use serde::{Deserialize, Serialize};

/// Requests handled by the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    /// A page session extracted a product.
    ProductDetected { data: ProductRecord },

    /// Show the overlay on the sender's tab, then fill in comparisons.
    #[serde(rename_all = "camelCase")]
    FetchComparisonAndShowOverlay { product_data: ProductRecord },

    /// Popup lookup; answered directly with a [`ComparisonOutcome`].
    #[serde(rename_all = "camelCase")]
    FetchComparison { product_data: ProductRecord },
}

/// Signals the coordinator sends to a page's overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageSignal {
    /// Show the product with a loading state for comparisons.
    #[serde(rename_all = "camelCase")]
    ShowOverlay {
        product_data: ProductRecord,
        comparison_results: Vec<ComparisonResult>,
        error: Option<String>,
    },

    /// Replace the loading state with results or an error.
    #[serde(rename_all = "camelCase")]
    UpdateOverlay {
        product_data: ProductRecord,
        comparison_results: Vec<ComparisonResult>,
        error: Option<String>,
    },
}

impl PageSignal {
    pub fn show_loading(product: ProductRecord) -> Self {
        PageSignal::ShowOverlay {
            product_data: product,
            comparison_results: Vec::new(),
            error: None,
        }
    }

    pub fn update(product: ProductRecord, outcome: ComparisonOutcome) -> Self {
        PageSignal::UpdateOverlay {
            product_data: product,
            comparison_results: outcome.results,
            error: outcome.error,
        }
    }

    /// The `action` tag, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            PageSignal::ShowOverlay { .. } => "showOverlay",
            PageSignal::UpdateOverlay { .. } => "updateOverlay",
        }
    }
}

/// Who sent a message. Popup messages carry no tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sender {
    pub tab_id: Option<TabId>,
}

impl Sender {
    pub fn tab(tab_id: TabId) -> Self {
        Self { tab_id: Some(tab_id) }
    }

    pub fn popup() -> Self {
        Self { tab_id: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Received,
    Error,
}

/// Acknowledgement for `productDetected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn received() -> Self {
        Self { status: AckStatus::Received, error: None }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self { status: AckStatus::Error, error: Some(error.into()) }
    }
}

/// Coordinator reply to a [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Ack(Ack),
    Comparison(ComparisonOutcome),
    /// Only transport-level acknowledgement.
    Empty,
}

/// Tab lifecycle status reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    Loading,
    Complete,
}

/// Tab lifecycle events the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEvent {
    Updated { tab_id: TabId, status: TabStatus },
    Removed { tab_id: TabId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_record() -> ProductRecord {
        ProductRecord {
            title: "Widget".to_string(),
            price: Some("$39.99".to_string()),
            image: None,
            marketplace: "amazon".to_string(),
            url: "https://www.amazon.com/dp/B0".to_string(),
            extracted_at: 1,
        }
    }

    #[test]
    fn test_message_tags() {
        let message = Message::ProductDetected { data: make_record() };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["action"], "productDetected");
        assert_eq!(value["data"]["title"], "Widget");

        let message = Message::FetchComparisonAndShowOverlay { product_data: make_record() };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["action"], "fetchComparisonAndShowOverlay");
        assert_eq!(value["productData"]["extractedAt"], 1);
    }

    #[test]
    fn test_message_from_json() {
        let message: Message = serde_json::from_value(json!({
            "action": "fetchComparison",
            "productData": {
                "title": "Widget", "price": null, "image": null,
                "marketplace": "ebay", "url": "https://www.ebay.com/itm/1", "extractedAt": 5
            }
        }))
        .unwrap();

        match message {
            Message::FetchComparison { product_data } => {
                assert_eq!(product_data.marketplace, "ebay")
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = serde_json::from_value::<Message>(json!({"action": "test", "debug": true}));
        assert!(result.is_err());
    }

    #[test]
    fn test_page_signal_shape() {
        let signal = PageSignal::update(make_record(), ComparisonOutcome::failed("Server error"));
        let value = serde_json::to_value(&signal).unwrap();
        assert_eq!(value["action"], "updateOverlay");
        assert_eq!(value["comparisonResults"], json!([]));
        assert_eq!(value["error"], "Server error");
        assert_eq!(signal.action(), "updateOverlay");

        assert_eq!(PageSignal::show_loading(make_record()).action(), "showOverlay");
    }

    #[test]
    fn test_ack_shape() {
        assert_eq!(serde_json::to_value(Ack::received()).unwrap(), json!({"status": "received"}));
        assert_eq!(
            serde_json::to_value(Ack::error("disk full")).unwrap(),
            json!({"status": "error", "error": "disk full"})
        );
    }
}
