//! Marketplace identification: regions, registry, selector tables and
//! page classification.

pub mod detector;
pub mod registry;
pub mod regions;
pub mod selectors;

pub use detector::detect;
pub use registry::{display_name, logo_path, Marketplace, MarketplaceId};
pub use regions::Region;
