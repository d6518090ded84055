//! Error types shared across the extraction pipeline.

use thiserror::Error;

/// Extraction failures. Only a missing title aborts extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no product title found for marketplace {marketplace}")]
    NoTitleFound { marketplace: String },
}

/// Failures raised by the tab-scoped store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode stored value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode stored value for {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend rejected operation: {0}")]
    Backend(String),
}

/// Failures delivering a signal to a page context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The tab navigated away or closed; nothing is listening any more.
    #[error("receiving end does not exist for tab {tab_id}")]
    ReceiverGone { tab_id: u32 },

    #[error("delivery to tab {tab_id} failed: {reason}")]
    Failed { tab_id: u32, reason: String },
}
