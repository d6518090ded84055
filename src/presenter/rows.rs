//! Comparison rows annotated against the current price.

use crate::compare::ComparisonResult;
use crate::marketplace;
use crate::price;
use serde::Serialize;

/// How a listing's price relates to the current product's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceClass {
    Lower,
    Higher,
    Same,
}

/// One comparison listing ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub result: ComparisonResult,
    pub marketplace_name: String,
    pub logo: Option<&'static str>,
    pub price_value: f64,
    pub class: PriceClass,
    /// Present only when the listing is strictly cheaper.
    pub savings: Option<f64>,
}

impl ResultRow {
    /// Annotates `result` against `current`, the numeric current price.
    ///
    /// Unparseable listing prices (`0.0`) are always [`PriceClass::Same`].
    pub fn new(result: ComparisonResult, current: f64) -> Self {
        let price_value = price::parse_numeric(&result.price);

        let class = if price_value <= 0.0 {
            PriceClass::Same
        } else if price_value < current {
            PriceClass::Lower
        } else if price_value > current {
            PriceClass::Higher
        } else {
            PriceClass::Same
        };

        let savings = (class == PriceClass::Lower).then(|| current - price_value);

        Self {
            marketplace_name: marketplace::display_name(&result.marketplace),
            logo: marketplace::logo_path(&result.marketplace),
            result,
            price_value,
            class,
            savings,
        }
    }

    /// `Save 4.99` label for cheaper listings.
    pub fn savings_label(&self) -> Option<String> {
        self.savings.map(|s| format!("Save {:.2}", s))
    }
}

/// Annotates every result in backend order.
pub fn build_rows(results: Vec<ComparisonResult>, current: f64) -> Vec<ResultRow> {
    results.into_iter().map(|r| ResultRow::new(r, current)).collect()
}
