//! Toolbar popup presentation model.

use super::rows::{build_rows, PriceClass, ResultRow};
use crate::compare::ComparisonOutcome;
use crate::extract::ProductRecord;
use crate::router::{Coordinator, Message, Reply, Sender};
use crate::store::TabId;
use tracing::{debug, warn};

/// Cheapest listing strictly below the current price.
#[derive(Debug, Clone, PartialEq)]
pub struct BestDeal {
    pub row: ResultRow,
    pub savings: f64,
}

impl BestDeal {
    /// `Save 4.99 at eBay US`
    pub fn headline(&self) -> String {
        format!("Save {:.2} at {}", self.savings, self.row.marketplace_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupView {
    /// No product stored for the active tab.
    NoProduct,
    Error(String),
    NoResults { product: ProductRecord },
    Results {
        product: ProductRecord,
        rows: Vec<ResultRow>,
        best_deal: Option<BestDeal>,
    },
}

impl PopupView {
    /// Builds the view for a stored record and its comparison outcome.
    pub fn build(product: Option<ProductRecord>, outcome: ComparisonOutcome) -> Self {
        let Some(product) = product else {
            return PopupView::NoProduct;
        };

        if let Some(error) = outcome.error {
            return PopupView::Error(format!("Failed to fetch comparison data: {}", error));
        }

        if outcome.results.is_empty() {
            return PopupView::NoResults { product };
        }

        let current = product.price_value();
        let rows = build_rows(outcome.results, current);
        let best_deal = best_deal(&rows, current);

        PopupView::Results { product, rows, best_deal }
    }

    /// Loads the active tab's record and asks the coordinator for
    /// comparisons, as the popup does when opened.
    pub async fn open(coordinator: &Coordinator, tab_id: TabId) -> Self {
        let product = match coordinator.store().get(tab_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                debug!("No product data for tab {}", tab_id);
                return PopupView::NoProduct;
            }
            Err(e) => {
                warn!("Popup could not read product data: {}", e);
                return PopupView::Error("Failed to load price comparison data.".to_string());
            }
        };

        let message = Message::FetchComparison { product_data: product.clone() };
        match coordinator.handle_message(Sender::popup(), message).await {
            Reply::Comparison(outcome) => PopupView::build(Some(product), outcome),
            other => {
                warn!("Unexpected reply to fetchComparison: {:?}", other);
                PopupView::Error("Failed to load price comparison data.".to_string())
            }
        }
    }
}

fn best_deal(rows: &[ResultRow], current: f64) -> Option<BestDeal> {
    rows.iter()
        .filter(|row| row.class == PriceClass::Lower)
        .min_by(|a, b| a.price_value.total_cmp(&b.price_value))
        .map(|row| BestDeal { row: row.clone(), savings: current - row.price_value })
}
