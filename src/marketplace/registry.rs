//! Marketplace identifiers and their display metadata.

use super::regions::Region;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Retailers with a selector table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marketplace {
    Amazon,
    Ebay,
    Walmart,
    Target,
    JbHifi,
    TheGoodGuys,
    MyDeal,
}

impl Marketplace {
    /// Base identifier, also the keyword searched for in page hosts.
    pub fn slug(&self) -> &'static str {
        match self {
            Marketplace::Amazon => "amazon",
            Marketplace::Ebay => "ebay",
            Marketplace::Walmart => "walmart",
            Marketplace::Target => "target",
            Marketplace::JbHifi => "jbhifi",
            Marketplace::TheGoodGuys => "thegoodguys",
            Marketplace::MyDeal => "mydeal",
        }
    }

    /// Region for single-storefront retailers; `None` when the region comes
    /// from the host suffix.
    pub fn fixed_region(&self) -> Option<Region> {
        match self {
            Marketplace::Amazon | Marketplace::Ebay | Marketplace::Target => None,
            Marketplace::Walmart => Some(Region::Us),
            Marketplace::JbHifi | Marketplace::TheGoodGuys | Marketplace::MyDeal => {
                Some(Region::Au)
            }
        }
    }

    /// Whether the host alone is not enough to call a page a product page.
    pub fn requires_page_signal(&self) -> bool {
        matches!(self, Marketplace::Amazon)
    }

    /// Returns all known marketplaces in host-matching order.
    pub fn all() -> &'static [Marketplace] {
        &[
            Marketplace::Amazon,
            Marketplace::Ebay,
            Marketplace::Walmart,
            Marketplace::Target,
            Marketplace::JbHifi,
            Marketplace::TheGoodGuys,
            Marketplace::MyDeal,
        ]
    }
}

/// A marketplace plus storefront region, rendered `amazon` or `amazon_au`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarketplaceId {
    pub marketplace: Marketplace,
    pub region: Region,
}

impl MarketplaceId {
    pub fn new(marketplace: Marketplace, region: Region) -> Self {
        Self { marketplace, region }
    }

    /// Human-readable name via the registry.
    pub fn display_name(&self) -> String {
        display_name(&self.to_string())
    }
}

impl fmt::Display for MarketplaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Region::Us => write!(f, "{}", self.marketplace.slug()),
            region => write!(f, "{}_{}", self.marketplace.slug(), region.code()),
        }
    }
}

impl FromStr for MarketplaceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let (base, region) = match s.split_once('_') {
            Some((base, code)) => {
                let region = code.parse::<Region>().map_err(|e| e.to_string())?;
                (base, Some(region))
            }
            None => (s.as_str(), None),
        };

        let marketplace = Marketplace::all()
            .iter()
            .copied()
            .find(|m| m.slug() == base)
            .ok_or_else(|| format!("Unknown marketplace: {}", s))?;

        let region = match (marketplace.fixed_region(), region) {
            (Some(fixed), Some(region)) if region != fixed => {
                return Err(format!("{} is only available in region {}", base, fixed));
            }
            (Some(fixed), _) => fixed,
            (None, region) => region.unwrap_or_default(),
        };

        Ok(Self::new(marketplace, region))
    }
}

/// A registered identifier with its display name and logo asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub logo: Option<&'static str>,
}

const REGISTRY: &[RegistryEntry] = &[
    RegistryEntry { id: "amazon", name: "Amazon US", logo: Some("icons/amazon_logo.png") },
    RegistryEntry { id: "amazon_au", name: "Amazon AU", logo: Some("icons/amazon_au_logo.png") },
    RegistryEntry { id: "amazon_uk", name: "Amazon UK", logo: None },
    RegistryEntry { id: "ebay", name: "eBay US", logo: Some("icons/ebay_logo.png") },
    RegistryEntry { id: "ebay_au", name: "eBay AU", logo: Some("icons/ebay_au_logo.png") },
    RegistryEntry { id: "walmart", name: "Walmart", logo: Some("icons/walmart_logo.png") },
    RegistryEntry { id: "target", name: "Target US", logo: Some("icons/target_logo.png") },
    RegistryEntry { id: "target_au", name: "Target AU", logo: Some("icons/target_au_logo.png") },
    RegistryEntry { id: "jbhifi_au", name: "JB Hi-Fi", logo: Some("icons/jbhifi_au_logo.png") },
    RegistryEntry {
        id: "thegoodguys_au",
        name: "The Good Guys",
        logo: Some("icons/thegoodguys_au_logo.png"),
    },
    RegistryEntry { id: "mydeal_au", name: "MyDeal", logo: Some("icons/mydeal_au_logo.png") },
];

/// Returns every registered identifier.
pub fn entries() -> &'static [RegistryEntry] {
    REGISTRY
}

/// Looks up a registered identifier.
pub fn lookup(id: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.id == id)
}

/// Display name for any identifier string.
///
/// Unregistered identifiers get a derived label: a trailing `_au` is
/// dropped, underscores become spaces, and the result is upper-cased.
pub fn display_name(id: &str) -> String {
    match lookup(id) {
        Some(entry) => entry.name.to_string(),
        None => id.strip_suffix("_au").unwrap_or(id).replace('_', " ").to_uppercase(),
    }
}

/// Logo asset path for an identifier, if one ships with the extension.
pub fn logo_path(id: &str) -> Option<&'static str> {
    lookup(id).and_then(|entry| entry.logo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(MarketplaceId::new(Marketplace::Amazon, Region::Us).to_string(), "amazon");
        assert_eq!(MarketplaceId::new(Marketplace::Amazon, Region::Au).to_string(), "amazon_au");
        assert_eq!(MarketplaceId::new(Marketplace::JbHifi, Region::Au).to_string(), "jbhifi_au");
    }

    #[test]
    fn test_id_parse() {
        let id: MarketplaceId = "ebay_uk".parse().unwrap();
        assert_eq!(id, MarketplaceId::new(Marketplace::Ebay, Region::Uk));

        let id: MarketplaceId = "Walmart".parse().unwrap();
        assert_eq!(id, MarketplaceId::new(Marketplace::Walmart, Region::Us));

        assert!("bestbuy".parse::<MarketplaceId>().is_err());
        assert!("amazon_zz".parse::<MarketplaceId>().is_err());
    }

    #[test]
    fn test_id_parse_single_region_brand() {
        let id: MarketplaceId = "jbhifi".parse().unwrap();
        assert_eq!(id, MarketplaceId::new(Marketplace::JbHifi, Region::Au));
        assert_eq!(id.to_string(), "jbhifi_au");
        assert!(lookup(&id.to_string()).is_some());

        let id: MarketplaceId = "thegoodguys_au".parse().unwrap();
        assert_eq!(id.to_string(), "thegoodguys_au");

        let err = "jbhifi_us".parse::<MarketplaceId>().unwrap_err();
        assert!(err.contains("only available in region au"));
        assert!("walmart_au".parse::<MarketplaceId>().is_err());
    }

    #[test]
    fn test_registered_names() {
        assert_eq!(display_name("amazon"), "Amazon US");
        assert_eq!(display_name("thegoodguys_au"), "The Good Guys");
        assert_eq!(MarketplaceId::new(Marketplace::Target, Region::Au).display_name(), "Target AU");
    }

    #[test]
    fn test_unregistered_names_are_derived() {
        assert_eq!(display_name("bigw_au"), "BIGW");
        assert_eq!(display_name("amazon_de"), "AMAZON DE");
        assert_eq!(display_name("best_buy"), "BEST BUY");
    }

    #[test]
    fn test_logo_path() {
        assert_eq!(logo_path("ebay_au"), Some("icons/ebay_au_logo.png"));
        assert_eq!(logo_path("amazon_uk"), None);
        assert_eq!(logo_path("unknown"), None);
    }

    #[test]
    fn test_every_detectable_default_id_is_registered() {
        for marketplace in Marketplace::all() {
            let region = marketplace.fixed_region().unwrap_or_default();
            let id = MarketplaceId::new(*marketplace, region).to_string();
            assert!(lookup(&id).is_some(), "{} missing from registry", id);
        }
    }
}
