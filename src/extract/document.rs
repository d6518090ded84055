//! Parsed pages and the extraction rules applied to them.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

/// Attributes read for an image rule, in order.
const IMAGE_ATTRS: &[&str] = &["src", "data-old-hires", "data-src"];

/// Matches that carry no information.
const PLACEHOLDERS: &[&str] = &["()", "--", "...", "\u{2026}"];

/// A loaded page: its DOM plus the location it was loaded from.
pub struct PageDocument {
    html: Html,
    location: Url,
}

impl PageDocument {
    /// Parses an HTML document served from `location`.
    pub fn parse(html: &str, location: Url) -> Self {
        Self { html: Html::parse_document(html), location }
    }

    /// Page location at parse time.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Elements matching `selector`, in document order.
    pub fn select<'a>(
        &'a self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    /// Whether any element matches `selector`.
    pub fn contains(&self, selector: &Selector) -> bool {
        self.html.select(selector).next().is_some()
    }
}

/// What a rule reads from the elements it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Trimmed, whitespace-collapsed text content.
    Text,
    /// An absolute http(s) image source.
    Image,
}

/// One selector candidate; applying it to a document yields at most one value.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    css: &'static str,
    selector: Selector,
    kind: RuleKind,
}

impl ExtractionRule {
    /// Compiles a rule, or `None` when the selector does not parse.
    pub fn new(css: &'static str, kind: RuleKind) -> Option<Self> {
        match Selector::parse(css) {
            Ok(selector) => Some(Self { css, selector, kind }),
            Err(e) => {
                warn!("Skipping invalid selector {:?}: {:?}", css, e);
                None
            }
        }
    }

    /// Source selector text.
    pub fn css(&self) -> &'static str {
        self.css
    }

    /// Returns the first acceptable value among the matching elements.
    pub fn apply(&self, document: &PageDocument) -> Option<String> {
        document.select(&self.selector).find_map(|element| match self.kind {
            RuleKind::Text => accepted_text(element),
            RuleKind::Image => absolute_image_source(element),
        })
    }
}

/// Applies rules in order and returns the first value produced.
pub fn first_match(rules: &[ExtractionRule], document: &PageDocument) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(document))
}

fn accepted_text(element: ElementRef) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if is_trivial(&text) {
        None
    } else {
        Some(text)
    }
}

fn is_trivial(text: &str) -> bool {
    text.chars().count() <= 1 || PLACEHOLDERS.contains(&text)
}

fn absolute_image_source(element: ElementRef) -> Option<String> {
    IMAGE_ATTRS
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .find(|src| src.starts_with("https://") || src.starts_with("http://"))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> PageDocument {
        PageDocument::parse(html, Url::parse("https://shop.example/item/1").unwrap())
    }

    #[test]
    fn test_text_rule_collapses_whitespace() {
        let page = doc(r#"<h1 id="t">
            Wireless   <b>Mouse</b>
        </h1>"#);
        let rule = ExtractionRule::new("#t", RuleKind::Text).unwrap();
        assert_eq!(rule.apply(&page).as_deref(), Some("Wireless Mouse"));
    }

    #[test]
    fn test_text_rule_rejects_trivial_matches() {
        let page = doc(r#"<span class="p">()</span><span class="p">x</span><span class="p"> </span>"#);
        let rule = ExtractionRule::new(".p", RuleKind::Text).unwrap();
        assert_eq!(rule.apply(&page), None);
    }

    #[test]
    fn test_text_rule_skips_to_next_element() {
        let page = doc(r#"<span class="p">()</span><span class="p">$12.00</span>"#);
        let rule = ExtractionRule::new(".p", RuleKind::Text).unwrap();
        assert_eq!(rule.apply(&page).as_deref(), Some("$12.00"));
    }

    #[test]
    fn test_image_rule_requires_absolute_url() {
        let page = doc(
            r#"<img class="i" src="/relative.jpg">
               <img class="i" src="data:image/gif;base64,AAAA" data-old-hires="https://cdn.example/big.jpg">"#,
        );
        let rule = ExtractionRule::new(".i", RuleKind::Image).unwrap();
        assert_eq!(rule.apply(&page).as_deref(), Some("https://cdn.example/big.jpg"));
    }

    #[test]
    fn test_first_match_respects_rule_order() {
        let page = doc(r#"<div class="b">second</div><div class="a">first</div>"#);
        let rules = vec![
            ExtractionRule::new(".a", RuleKind::Text).unwrap(),
            ExtractionRule::new(".b", RuleKind::Text).unwrap(),
        ];
        assert_eq!(first_match(&rules, &page).as_deref(), Some("first"));
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        assert!(ExtractionRule::new("div:contains('x')", RuleKind::Text).is_none());
    }

    #[test]
    fn test_document_contains() {
        let page = doc(r#"<div id="dp-container"></div>"#);
        assert!(page.contains(&Selector::parse("#dp-container").unwrap()));
        assert!(!page.contains(&Selector::parse("#productTitle").unwrap()));
        assert_eq!(page.location().path(), "/item/1");
    }
}
