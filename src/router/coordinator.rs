//! Background coordinator: persists detections, drives the toolbar badge,
//! and runs the two-phase overlay flow.

use super::channels::{Badge, PageChannel, Toolbar};
use super::messages::{Ack, Message, PageSignal, Reply, Sender, TabEvent, TabStatus};
use crate::compare::ComparisonBackend;
use crate::config::Config;
use crate::error::DeliveryError;
use crate::extract::ProductRecord;
use crate::store::{spawn_expiry_sweep, TabId, TabStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Progress of the overlay flow for one tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    /// The tab started a navigation; a new record is expected.
    AwaitingExtraction,
    /// `showOverlay` went out; the backend has not answered yet.
    AwaitingComparison,
    /// `updateOverlay` went out with results or an error.
    Delivered,
}

/// Routes messages between page sessions, the popup and the backend.
pub struct Coordinator {
    store: TabStore,
    backend: Arc<dyn ComparisonBackend>,
    page: Arc<dyn PageChannel>,
    toolbar: Arc<dyn Toolbar>,
    states: Mutex<HashMap<TabId, RequestState>>,
    cleanup: Mutex<Option<JoinHandle<()>>>,
}

impl Coordinator {
    pub fn new(
        store: TabStore,
        backend: Arc<dyn ComparisonBackend>,
        page: Arc<dyn PageChannel>,
        toolbar: Arc<dyn Toolbar>,
    ) -> Self {
        Self {
            store,
            backend,
            page,
            toolbar,
            states: Mutex::new(HashMap::new()),
            cleanup: Mutex::new(None),
        }
    }

    /// Builds a coordinator and starts the expiry sweep with the configured
    /// interval and retention. Must be called inside a tokio runtime.
    pub fn from_config(
        config: &Config,
        store: TabStore,
        backend: Arc<dyn ComparisonBackend>,
        page: Arc<dyn PageChannel>,
        toolbar: Arc<dyn Toolbar>,
    ) -> Self {
        let coordinator = Self::new(store, backend, page, toolbar);
        coordinator.start_cleanup(config.sweep_interval(), config.retention());
        coordinator
    }

    /// The store this coordinator writes to.
    pub fn store(&self) -> &TabStore {
        &self.store
    }

    /// Current flow state for a tab.
    pub fn state(&self, tab_id: TabId) -> RequestState {
        self.states
            .lock()
            .map(|states| states.get(&tab_id).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    fn set_state(&self, tab_id: TabId, state: RequestState) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(tab_id, state);
        }
    }

    fn forget(&self, tab_id: TabId) {
        if let Ok(mut states) = self.states.lock() {
            states.remove(&tab_id);
        }
    }

    /// Starts the periodic expiry sweep over this coordinator's store,
    /// replacing any sweep already running. A zero period disables it.
    ///
    /// The sweep is aborted when the coordinator is dropped.
    pub fn start_cleanup(&self, period: Duration, retention: Duration) {
        let Ok(mut cleanup) = self.cleanup.lock() else {
            return;
        };

        if let Some(previous) = cleanup.take() {
            previous.abort();
        }

        if period.is_zero() {
            debug!("Expiry sweep disabled");
            return;
        }

        debug!(
            "Sweeping records older than {}s every {}s",
            retention.as_secs(),
            period.as_secs()
        );
        *cleanup = Some(spawn_expiry_sweep(self.store.clone(), period, retention));
    }

    /// Whether the expiry sweep is running.
    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup
            .lock()
            .map(|cleanup| cleanup.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Handles one message. Never fails: problems come back in the reply.
    pub async fn handle_message(&self, sender: Sender, message: Message) -> Reply {
        match message {
            Message::ProductDetected { data } => {
                Reply::Ack(self.on_product_detected(sender, data).await)
            }
            Message::FetchComparisonAndShowOverlay { product_data } => {
                match sender.tab_id {
                    Some(tab_id) => {
                        self.on_request_comparison_and_overlay(tab_id, product_data).await
                    }
                    None => warn!("fetchComparisonAndShowOverlay without a sender tab, ignoring"),
                }
                Reply::Empty
            }
            Message::FetchComparison { product_data } => {
                let outcome = self
                    .backend
                    .compare(
                        &product_data.title,
                        &product_data.marketplace,
                        product_data.price.as_deref(),
                    )
                    .await;
                Reply::Comparison(outcome)
            }
        }
    }

    /// Persists a detected product and marks the tab's toolbar icon.
    pub async fn on_product_detected(&self, sender: Sender, record: ProductRecord) -> Ack {
        let Some(tab_id) = sender.tab_id else {
            warn!("productDetected without a sender tab");
            return Ack::error("no sender tab");
        };

        info!("Product detected on tab {}: {}", tab_id, record.title);

        if let Err(e) = self.store.set(tab_id, &record).await {
            warn!("Error saving product data for tab {}: {}", tab_id, e);
            return Ack::error(e.to_string());
        }

        self.toolbar.set_badge(tab_id, Badge::detected()).await;
        self.set_state(tab_id, RequestState::Idle);
        Ack::received()
    }

    /// Shows the product immediately, then updates the overlay once the
    /// backend answers.
    ///
    /// The comparison request runs alongside delivery of `showOverlay`, and
    /// `updateOverlay` is only sent after both finish.
    pub async fn on_request_comparison_and_overlay(&self, tab_id: TabId, record: ProductRecord) {
        self.set_state(tab_id, RequestState::AwaitingComparison);

        let show = self.deliver(tab_id, PageSignal::show_loading(record.clone()));
        let compare =
            self.backend.compare(&record.title, &record.marketplace, record.price.as_deref());
        let ((), outcome) = tokio::join!(show, compare);

        if let Some(error) = &outcome.error {
            debug!("Comparison for tab {} failed: {}", tab_id, error);
        }

        self.deliver(tab_id, PageSignal::update(record, outcome)).await;
        self.set_state(tab_id, RequestState::Delivered);
    }

    /// Reacts to tab lifecycle changes.
    pub async fn handle_tab_event(&self, event: TabEvent) {
        match event {
            TabEvent::Updated { tab_id, status: TabStatus::Loading } => {
                self.toolbar.set_badge(tab_id, Badge::cleared()).await;
                self.remove_record(tab_id).await;
                self.set_state(tab_id, RequestState::AwaitingExtraction);
            }
            TabEvent::Updated { status: TabStatus::Complete, .. } => {}
            TabEvent::Removed { tab_id } => {
                self.remove_record(tab_id).await;
                self.forget(tab_id);
            }
        }
    }

    async fn remove_record(&self, tab_id: TabId) {
        if let Err(e) = self.store.remove(tab_id).await {
            warn!("Error clearing product data for tab {}: {}", tab_id, e);
        }
    }

    async fn deliver(&self, tab_id: TabId, signal: PageSignal) {
        let action = signal.action();
        match self.page.send(tab_id, signal).await {
            Ok(()) => debug!("Sent {} to tab {}", action, tab_id),
            Err(DeliveryError::ReceiverGone { .. }) => {
                debug!("Tab {} no longer listening, dropped {}", tab_id, action)
            }
            Err(e) => warn!("Error sending {}: {}", action, e),
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if let Ok(mut cleanup) = self.cleanup.lock() {
            if let Some(handle) = cleanup.take() {
                handle.abort();
            }
        }
    }
}
