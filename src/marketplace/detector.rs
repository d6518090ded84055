//! Classifies a page location into a marketplace identifier.

use super::registry::{Marketplace, MarketplaceId};
use super::regions::Region;
use super::selectors::{AMAZON_PRODUCT_MARKERS, AMAZON_PRODUCT_PATHS};
use crate::extract::PageDocument;
use scraper::Selector;
use std::sync::LazyLock;
use tracing::{debug, trace};
use url::Url;

static PRODUCT_MARKERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    AMAZON_PRODUCT_MARKERS.iter().filter_map(|css| Selector::parse(css).ok()).collect()
});

/// Detects the marketplace a page belongs to.
///
/// Hosts are matched by brand keyword; multi-country brands take their
/// region from the host suffix and default to the US storefront. Brands
/// that need page confirmation (Amazon) also require a product path or a
/// product-page marker in `hints`, so search and category pages on a
/// matching host are not detected.
pub fn detect(url: &Url, hints: Option<&PageDocument>) -> Option<MarketplaceId> {
    let host = url.host_str()?.to_ascii_lowercase();

    let Some(marketplace) = Marketplace::all().iter().copied().find(|m| host.contains(m.slug()))
    else {
        trace!("No marketplace for host {}", host);
        return None;
    };

    if marketplace.requires_page_signal() && !has_product_signal(url, hints) {
        debug!("{} host without product signals: {}", marketplace.slug(), url);
        return None;
    }

    let region = marketplace
        .fixed_region()
        .or_else(|| Region::from_host(&host))
        .unwrap_or_default();

    Some(MarketplaceId::new(marketplace, region))
}

/// Parses `url` first; unparseable locations are never detected.
pub fn detect_str(url: &str, hints: Option<&PageDocument>) -> Option<MarketplaceId> {
    match Url::parse(url) {
        Ok(parsed) => detect(&parsed, hints),
        Err(e) => {
            debug!("Cannot detect marketplace for {:?}: {}", url, e);
            None
        }
    }
}

fn has_product_signal(url: &Url, hints: Option<&PageDocument>) -> bool {
    let path = url.path();
    if AMAZON_PRODUCT_PATHS.iter().any(|segment| path.contains(segment)) {
        return true;
    }

    hints.is_some_and(|document| PRODUCT_MARKERS.iter().any(|marker| document.contains(marker)))
}
