//! Turns a detected product page into a [`ProductRecord`].

use super::document::{first_match, ExtractionRule, PageDocument, RuleKind};
use super::models::ProductRecord;
use crate::error::ExtractError;
use crate::marketplace::selectors::{self, SelectorTable};
use crate::marketplace::{Marketplace, MarketplaceId};
use crate::price;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Compiled rules for one marketplace.
#[derive(Debug)]
pub struct RuleSet {
    pub title: Vec<ExtractionRule>,
    pub price: Vec<ExtractionRule>,
    pub image: Vec<ExtractionRule>,
}

impl RuleSet {
    fn compile(table: &SelectorTable) -> Self {
        let compile = |list: &[&'static str], kind: RuleKind| -> Vec<ExtractionRule> {
            list.iter().filter_map(|css| ExtractionRule::new(*css, kind)).collect()
        };

        Self {
            title: compile(table.title, RuleKind::Text),
            price: compile(table.price, RuleKind::Text),
            image: compile(table.image, RuleKind::Image),
        }
    }
}

static RULES: LazyLock<HashMap<Marketplace, RuleSet>> = LazyLock::new(|| {
    Marketplace::all()
        .iter()
        .map(|m| (*m, RuleSet::compile(selectors::table(*m))))
        .collect()
});

/// Rules for a marketplace; regional storefronts share the base table.
pub fn rules_for(marketplace: Marketplace) -> &'static RuleSet {
    &RULES[&marketplace]
}

/// Extracts the product shown on `document`, stamped with the current time.
pub fn extract(document: &PageDocument, id: MarketplaceId) -> Result<ProductRecord, ExtractError> {
    extract_at(document, id, chrono::Utc::now().timestamp_millis())
}

/// Extracts the product shown on `document` with an explicit timestamp.
///
/// Price and image are looked up even when the title is missing so the
/// failure is logged with everything that was found.
pub fn extract_at(
    document: &PageDocument,
    id: MarketplaceId,
    extracted_at: i64,
) -> Result<ProductRecord, ExtractError> {
    let rules = rules_for(id.marketplace);

    let title = first_match(&rules.title, document);
    let raw_price = first_match(&rules.price, document);
    let image = first_match(&rules.image, document);

    let Some(title) = title else {
        info!(
            "Could not extract product title on {} (price: {:?}, image: {:?})",
            id, raw_price, image
        );
        return Err(ExtractError::NoTitleFound { marketplace: id.to_string() });
    };

    let price = raw_price.as_deref().and_then(price::clean);
    debug!("Extracted {:?} at {:?} from {}", title, price, document.location());

    Ok(ProductRecord {
        title,
        price,
        image,
        marketplace: id.to_string(),
        url: document.location().to_string(),
        extracted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::Region;
    use url::Url;

    fn page(html: &str, url: &str) -> PageDocument {
        PageDocument::parse(html, Url::parse(url).unwrap())
    }

    #[test]
    fn test_extract_amazon_widget() {
        let doc = page(
            r#"<html><body>
                <span id="productTitle">  Widget  </span>
                <span id="priceblock_ourprice">Was $50 Now $39.99</span>
                <img id="landingImage" src="https://x/img.jpg">
            </body></html>"#,
            "https://www.amazon.com/dp/B000WIDGET",
        );

        let id = MarketplaceId::new(Marketplace::Amazon, Region::Us);
        let record = extract_at(&doc, id, 42).unwrap();

        assert_eq!(record.title, "Widget");
        assert_eq!(record.price.as_deref(), Some("$39.99"));
        assert_eq!(record.image.as_deref(), Some("https://x/img.jpg"));
        assert_eq!(record.marketplace, "amazon");
        assert_eq!(record.url, "https://www.amazon.com/dp/B000WIDGET");
        assert_eq!(record.extracted_at, 42);
    }

    #[test]
    fn test_missing_title_is_fatal() {
        let doc = page(
            r#"<span id="priceblock_ourprice">$10.00</span>"#,
            "https://www.amazon.com/dp/B000000000",
        );

        let id = MarketplaceId::new(Marketplace::Amazon, Region::Us);
        let err = extract_at(&doc, id, 0).unwrap_err();
        assert_eq!(err, ExtractError::NoTitleFound { marketplace: "amazon".to_string() });
    }

    #[test]
    fn test_price_and_image_are_optional() {
        let doc = page(
            r#"<h1 data-automation-id="product-title">Kettle</h1>
               <div class="hero-image"><img src="/local.png"></div>"#,
            "https://www.walmart.com/ip/kettle/123",
        );

        let id = MarketplaceId::new(Marketplace::Walmart, Region::Us);
        let record = extract_at(&doc, id, 0).unwrap();
        assert_eq!(record.title, "Kettle");
        assert_eq!(record.price, None);
        assert_eq!(record.image, None);
    }

    #[test]
    fn test_regional_variant_uses_base_table() {
        let doc = page(
            r#"<h1 id="x-title-label-lbl">Headphones</h1>
               <span id="prcIsum">AU $149.00</span>
               <img id="icImg" src="https://i.ebayimg.com/h.jpg">"#,
            "https://www.ebay.com.au/itm/1234",
        );

        let id = MarketplaceId::new(Marketplace::Ebay, Region::Au);
        let record = extract_at(&doc, id, 0).unwrap();
        assert_eq!(record.title, "Headphones");
        assert_eq!(record.price.as_deref(), Some("AU$149.00"));
        assert_eq!(record.marketplace, "ebay_au");
    }

    #[test]
    fn test_first_selector_candidate_wins() {
        let doc = page(
            r#"<h1 class="a-size-large">Fallback title</h1>
               <span id="productTitle">Primary title</span>"#,
            "https://www.amazon.com/dp/B000000000",
        );

        let id = MarketplaceId::new(Marketplace::Amazon, Region::Us);
        assert_eq!(extract_at(&doc, id, 0).unwrap().title, "Primary title");
    }

    #[test]
    fn test_trivial_title_falls_through() {
        let doc = page(
            r#"<span id="productTitle">()</span>
               <div id="title">Real title</div>"#,
            "https://www.amazon.com/dp/B000000000",
        );

        let id = MarketplaceId::new(Marketplace::Amazon, Region::Us);
        assert_eq!(extract_at(&doc, id, 0).unwrap().title, "Real title");
    }

    #[test]
    fn test_extract_stamps_current_time() {
        let doc = page(r#"<span id="productTitle">Clock</span>"#, "https://www.amazon.com/dp/B0");
        let before = chrono::Utc::now().timestamp_millis();
        let record = extract(&doc, MarketplaceId::new(Marketplace::Amazon, Region::Us)).unwrap();
        assert!(record.extracted_at >= before);
    }

    #[test]
    fn test_every_marketplace_has_compiled_rules() {
        for marketplace in Marketplace::all() {
            let rules = rules_for(*marketplace);
            assert!(!rules.title.is_empty(), "{:?}", marketplace);
        }
    }
}
