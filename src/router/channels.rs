//! Outbound seams of the coordinator: page delivery and the toolbar badge.

use super::messages::PageSignal;
use crate::error::DeliveryError;
use crate::store::TabId;
use async_trait::async_trait;
use tracing::info;

/// Delivers signals to the page context of a tab.
#[async_trait]
pub trait PageChannel: Send + Sync {
    /// Returns [`DeliveryError::ReceiverGone`] when the tab no longer has a
    /// listening page.
    async fn send(&self, tab_id: TabId, signal: PageSignal) -> Result<(), DeliveryError>;
}

/// Toolbar badge state for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: Option<&'static str>,
}

impl Badge {
    /// Marker shown when a product was detected.
    pub fn detected() -> Self {
        Self { text: "!".to_string(), color: Some("#007bff") }
    }

    pub fn cleared() -> Self {
        Self { text: String::new(), color: None }
    }

    pub fn is_cleared(&self) -> bool {
        self.text.is_empty()
    }
}

/// The extension's toolbar icon.
#[async_trait]
pub trait Toolbar: Send + Sync {
    async fn set_badge(&self, tab_id: TabId, badge: Badge);
}

/// Toolbar that only logs badge changes, for headless runs.
#[derive(Debug, Default)]
pub struct LoggingToolbar;

#[async_trait]
impl Toolbar for LoggingToolbar {
    async fn set_badge(&self, tab_id: TabId, badge: Badge) {
        if badge.is_cleared() {
            info!("Badge cleared for tab {}", tab_id);
        } else {
            let color = badge.color.unwrap_or("default");
            info!("Badge {:?} ({}) set for tab {}", badge.text, color, tab_id);
        }
    }
}
