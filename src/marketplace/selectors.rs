//! CSS selector tables for marketplace product pages.
//!
//! Every list is ordered: the extractor tries candidates front to back and
//! keeps the first acceptable match. Regional storefronts share their base
//! marketplace's table.
//!
//! **Update process**: When extraction fails on a live page, capture the
//! HTML, adjust the table here, and add a fixture under `tests/fixtures`.

use super::registry::Marketplace;

/// Ordered selector candidates for one marketplace.
#[derive(Debug, Clone, Copy)]
pub struct SelectorTable {
    pub title: &'static [&'static str],
    pub price: &'static [&'static str],
    pub image: &'static [&'static str],
}

const AMAZON: SelectorTable = SelectorTable {
    title: &["#productTitle", "#title", ".product-title", "h1.a-size-large"],
    price: &[
        "#corePrice_feature_div .a-price .a-offscreen",
        ".a-price-current .a-price-amount",
        ".a-price .a-price-amount",
        "#priceblock_ourprice",
        "#priceblock_dealprice",
        ".a-size-medium.a-color-price",
        ".a-price-range",
    ],
    image: &["#landingImage", "#imgBlkFront", ".a-dynamic-image", ".imgTagWrapper img"],
};

const EBAY: SelectorTable = SelectorTable {
    title: &["#x-title-label-lbl", ".x-item-title-label", "h1#it-ttl", ".notranslate"],
    price: &["#prcIsum", "#mm-saleDscPrc", ".x-price-primary", ".notranslate", ".notranslate span"],
    image: &["#icImg", "#image", ".ux-image-magnify__container img"],
};

const WALMART: SelectorTable = SelectorTable {
    title: &[
        "[data-automation-id=\"product-title\"]",
        "h1[data-automation-id=\"product-title\"]",
        ".prod-ProductTitle",
    ],
    price: &[
        "[data-automation-id=\"product-price\"]",
        ".price-current",
        ".price-group .price-current",
        "[itemprop=\"price\"]",
    ],
    image: &[
        "[data-testid=\"hero-image-container\"] img",
        ".prod-hero-image img",
        ".hero-image img",
    ],
};

const TARGET: SelectorTable = SelectorTable {
    title: &[
        "[data-test=\"product-title\"]",
        "h1[data-test=\"product-title\"]",
        ".pdp-product-name",
    ],
    price: &["[data-test=\"product-price\"]", ".price-current"],
    image: &["[data-test=\"hero-image\"] img", ".ProductImages img", ".slide img"],
};

const JBHIFI: SelectorTable = SelectorTable {
    title: &["h1.product-title", "h1[itemprop=\"name\"]", ".product-title"],
    price: &[".PriceTag_actual", ".price .amount", "[itemprop=\"price\"]"],
    image: &[".product-image img", "img[itemprop=\"image\"]"],
};

const THE_GOOD_GUYS: SelectorTable = SelectorTable {
    title: &["h1.product-title", "h1[itemprop=\"name\"]", ".pdp-title"],
    price: &[".pricepoint-price", ".price", "[itemprop=\"price\"]"],
    image: &[".product-gallery img", "img[itemprop=\"image\"]"],
};

const MYDEAL: SelectorTable = SelectorTable {
    title: &["h1.product-title", "h1[itemprop=\"name\"]", "h1"],
    price: &[".price-container .price", "[itemprop=\"price\"]", ".price"],
    image: &[".product-image img", "img[itemprop=\"image\"]"],
};

/// Elements that only appear on Amazon product detail pages.
pub const AMAZON_PRODUCT_MARKERS: &[&str] =
    &["#productTitle", "#dp-container", "input#ASIN", "#ppd"];

/// Path segments that mark an Amazon URL as a product page.
pub const AMAZON_PRODUCT_PATHS: &[&str] = &["/dp/", "/gp/product/", "/product/", "/item/"];

/// Returns the selector table for a marketplace.
pub fn table(marketplace: Marketplace) -> &'static SelectorTable {
    match marketplace {
        Marketplace::Amazon => &AMAZON,
        Marketplace::Ebay => &EBAY,
        Marketplace::Walmart => &WALMART,
        Marketplace::Target => &TARGET,
        Marketplace::JbHifi => &JBHIFI,
        Marketplace::TheGoodGuys => &THE_GOOD_GUYS,
        Marketplace::MyDeal => &MYDEAL,
    }
}
