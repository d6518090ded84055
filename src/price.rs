//! Free-text price normalization.
//!
//! Marketplace price elements carry labels, strike-through prices and odd
//! whitespace. [`clean`] reduces that to a display string such as `$39.99`;
//! [`parse_numeric`] turns a display string into a magnitude for
//! cheapest-of-N comparisons.
//!
//! Separators are read US-style (`1,234.56`). Comma-decimal formats such as
//! `1.234,56` are not normalized, and currencies are never converted.

use crate::marketplace::Region;
use regex_lite::Regex;
use std::sync::LazyLock;

/// Symbol prefixed when the matched amount has no currency marker.
pub const DEFAULT_SYMBOL: &str = "$";

/// Label phrases removed before matching. Longer phrases come first.
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:current price|was price|sale price|price)\b").expect("valid noise regex")
});

/// A struck-through "was $50" segment preceding the live price.
static WAS_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwas\s*:?\s*[$£€¥₹]?\s?\d(?:[\d,]*\d)?(?:\.\d+)?")
        .expect("valid was-amount regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Optional currency code and/or symbol, digits with thousands separators,
/// optional decimals, optional trailing code or symbol.
///
/// Three-letter codes are limited to the currencies of known regions so
/// words such as `OFF` or `NOW` are never read as a currency. A two-letter
/// prefix (`AU`, `US`) only counts when a symbol follows it.
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    let codes = currency_codes().join("|");
    let pattern = format!(
        r"(?:\b(?:{codes})\s?[$£€¥₹]?|\b[A-Z]{{2}}\s?[$£€¥₹]|[$£€¥₹])?\s?\d(?:[\d,]*\d)?(?:\.\d+)?(?:\s?(?:(?:{codes})\b|[$£€¥₹]))?"
    );
    Regex::new(&pattern).expect("valid amount regex")
});

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d(?:[\d,]*\d)?(?:\.\d+)?").expect("valid digits regex"));

/// ISO codes of every supported region's currency, deduplicated.
fn currency_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = Region::all().iter().map(Region::currency).collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}

const SYMBOLS: [char; 5] = ['$', '£', '€', '¥', '₹'];

/// Normalizes raw price text into a display price.
///
/// Returns `None` for empty input. When no amount-shaped run is found the
/// noise-stripped text is returned as-is; callers must not parse that
/// numerically.
///
/// ```
/// use pricepulse::price::clean;
///
/// assert_eq!(clean("Current Price: $1,234.56").as_deref(), Some("$1,234.56"));
/// assert_eq!(clean("Was $50 Now $39.99").as_deref(), Some("$39.99"));
/// assert_eq!(clean(""), None);
/// ```
pub fn clean(raw: &str) -> Option<String> {
    let stripped = NOISE.replace_all(raw, " ");
    let stripped = WAS_AMOUNT.replace_all(&stripped, " ");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let cleaned = collapsed.trim().trim_start_matches([':', '-']).trim();

    if cleaned.is_empty() {
        return None;
    }

    let Some(found) = AMOUNT.find(cleaned) else {
        return Some(cleaned.to_string());
    };

    let amount: String = found.as_str().chars().filter(|c| !c.is_whitespace()).collect();
    // Letters in the match can only come from a currency code.
    let has_marker =
        amount.contains(SYMBOLS) || amount.chars().any(|c| c.is_ascii_alphabetic());

    if has_marker {
        Some(amount)
    } else {
        Some(format!("{DEFAULT_SYMBOL}{amount}"))
    }
}

/// Parses the first digit run of a display price, `0.0` when there is none.
///
/// Only meant for ordering prices against each other.
pub fn parse_numeric(display: &str) -> f64 {
    DIGITS
        .find(display)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0.0)
}
