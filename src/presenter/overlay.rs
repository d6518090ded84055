//! In-page overlay presentation model.
//!
//! [`Overlay`] holds what the floating panel shows for one page.
//! [`OverlayChannel`] is the [`PageChannel`] a page exposes to the
//! coordinator: signals are applied to the overlay once the page reports
//! readiness, and dropped with [`DeliveryError::ReceiverGone`] if it never
//! does within the configured bound.

use super::rows::{build_rows, ResultRow};
use crate::compare::ComparisonResult;
use crate::error::DeliveryError;
use crate::extract::ProductRecord;
use crate::router::{PageChannel, PageSignal};
use crate::store::TabId;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, trace};

pub const NO_RESULTS_NOTICE: &str = "No similar products found on other marketplaces";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum OverlayState {
    #[default]
    Hidden,
    /// Product shown, comparisons still loading.
    Loading { product: ProductRecord },
    Results { product: ProductRecord, rows: Vec<ResultRow> },
    NoResults { product: ProductRecord },
    Failed { product: ProductRecord, error: String },
}

impl OverlayState {
    pub fn product(&self) -> Option<&ProductRecord> {
        match self {
            OverlayState::Hidden => None,
            OverlayState::Loading { product }
            | OverlayState::Results { product, .. }
            | OverlayState::NoResults { product }
            | OverlayState::Failed { product, .. } => Some(product),
        }
    }

    /// Text shown in place of result rows, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            OverlayState::NoResults { .. } => Some(NO_RESULTS_NOTICE.to_string()),
            OverlayState::Failed { error, .. } => {
                Some(format!("Error fetching comparisons: {}", error))
            }
            _ => None,
        }
    }
}

/// The floating comparison panel for one page.
#[derive(Debug, Default)]
pub struct Overlay {
    state: OverlayState,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != OverlayState::Hidden
    }

    /// Shows `product` with comparisons loading.
    pub fn show(&mut self, product: ProductRecord) {
        self.state = OverlayState::Loading { product };
    }

    /// Replaces the loading state. An error wins over results.
    pub fn update(
        &mut self,
        product: ProductRecord,
        results: Vec<ComparisonResult>,
        error: Option<String>,
    ) {
        self.state = match error {
            Some(error) => OverlayState::Failed { product, error },
            None if results.is_empty() => OverlayState::NoResults { product },
            None => {
                let current = product.price_value();
                OverlayState::Results { rows: build_rows(results, current), product }
            }
        };
    }

    pub fn hide(&mut self) {
        self.state = OverlayState::Hidden;
    }

    pub fn apply(&mut self, signal: PageSignal) {
        match signal {
            PageSignal::ShowOverlay { product_data, .. } => self.show(product_data),
            PageSignal::UpdateOverlay { product_data, comparison_results, error } => {
                self.update(product_data, comparison_results, error)
            }
        }
    }
}

/// Delivers page signals for a single tab into its [`Overlay`].
pub struct OverlayChannel {
    tab_id: TabId,
    overlay: Arc<Mutex<Overlay>>,
    ready: watch::Receiver<bool>,
    ready_timeout: Duration,
}

impl OverlayChannel {
    /// Creates a channel for `tab_id`, returning the sender the page uses to
    /// report that its overlay is mounted.
    pub fn new(tab_id: TabId, ready_timeout: Duration) -> (Self, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let channel = Self {
            tab_id,
            overlay: Arc::new(Mutex::new(Overlay::new())),
            ready: rx,
            ready_timeout,
        };
        (channel, tx)
    }

    /// Snapshot of the overlay state.
    pub fn state(&self) -> OverlayState {
        self.overlay.lock().map(|overlay| overlay.state().clone()).unwrap_or_default()
    }

    pub fn hide(&self) {
        if let Ok(mut overlay) = self.overlay.lock() {
            overlay.hide();
        }
    }

    async fn wait_ready(&self) -> bool {
        if *self.ready.borrow() {
            return true;
        }

        trace!("Waiting for overlay on tab {} to initialize", self.tab_id);
        let mut ready = self.ready.clone();
        let waited = tokio::time::timeout(self.ready_timeout, ready.wait_for(|r| *r)).await;
        waited.is_ok_and(|changed| changed.is_ok())
    }
}

#[async_trait]
impl PageChannel for OverlayChannel {
    async fn send(&self, tab_id: TabId, signal: PageSignal) -> Result<(), DeliveryError> {
        if tab_id != self.tab_id || !self.wait_ready().await {
            return Err(DeliveryError::ReceiverGone { tab_id });
        }

        debug!("Overlay on tab {} received {}", tab_id, signal.action());
        let mut overlay = self.overlay.lock().map_err(|e| DeliveryError::Failed {
            tab_id,
            reason: e.to_string(),
        })?;
        overlay.apply(signal);
        Ok(())
    }
}
