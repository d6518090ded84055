//! pricepulse - Cross-marketplace price comparison for product pages
//!
//! Detects the marketplace behind a product page, extracts title, price and
//! image with per-marketplace selector tables, keeps one record per browser
//! tab, and relays comparison results from a backend to the overlay and
//! popup presenters.

pub mod commands;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod marketplace;
pub mod page;
pub mod presenter;
pub mod price;
pub mod router;
pub mod store;

pub use config::Config;
pub use extract::ProductRecord;
pub use marketplace::{Marketplace, MarketplaceId, Region};
