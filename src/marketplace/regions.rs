//! Marketplace regions and host-suffix classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Country storefront a marketplace page belongs to. `Us` is the base region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    Ca,
    Au,
    De,
    Fr,
    Es,
    It,
    Jp,
    In,
    Mx,
    Br,
}

/// Host suffixes mapped to regions. Lookup picks the longest matching
/// suffix, so `.com.au` wins over `.com`.
const HOST_SUFFIXES: &[(&str, Region)] = &[
    (".com.au", Region::Au),
    (".co.uk", Region::Uk),
    (".co.jp", Region::Jp),
    (".com.mx", Region::Mx),
    (".com.br", Region::Br),
    (".com", Region::Us),
    (".ca", Region::Ca),
    (".de", Region::De),
    (".fr", Region::Fr),
    (".es", Region::Es),
    (".it", Region::It),
    (".in", Region::In),
    (".au", Region::Au),
    (".uk", Region::Uk),
];

impl Region {
    /// Classifies a host by its longest known suffix.
    ///
    /// Returns `None` when no suffix matches; callers fall back to the
    /// base region.
    pub fn from_host(host: &str) -> Option<Region> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();

        HOST_SUFFIXES
            .iter()
            .filter(|(suffix, _)| host.ends_with(suffix))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, region)| *region)
    }

    /// Short code used in marketplace identifiers (`amazon_au`).
    pub fn code(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Ca => "ca",
            Region::Au => "au",
            Region::De => "de",
            Region::Fr => "fr",
            Region::Es => "es",
            Region::It => "it",
            Region::Jp => "jp",
            Region::In => "in",
            Region::Mx => "mx",
            Region::Br => "br",
        }
    }

    /// Returns the currency code for this region.
    pub fn currency(&self) -> &'static str {
        match self {
            Region::Us => "USD",
            Region::Uk => "GBP",
            Region::De | Region::Fr | Region::Es | Region::It => "EUR",
            Region::Ca => "CAD",
            Region::Au => "AUD",
            Region::Jp => "JPY",
            Region::In => "INR",
            Region::Br => "BRL",
            Region::Mx => "MXN",
        }
    }

    /// Returns the Accept-Language header value for this region.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Region::Us | Region::Ca => "en-US,en;q=0.9",
            Region::Au => "en-AU,en;q=0.9",
            Region::Uk => "en-GB,en;q=0.9",
            Region::De => "de-DE,de;q=0.9,en;q=0.8",
            Region::Fr => "fr-FR,fr;q=0.9,en;q=0.8",
            Region::Es | Region::Mx => "es-ES,es;q=0.9,en;q=0.8",
            Region::It => "it-IT,it;q=0.9,en;q=0.8",
            Region::Jp => "ja-JP,ja;q=0.9,en;q=0.8",
            Region::In => "en-IN,en;q=0.9,hi;q=0.8",
            Region::Br => "pt-BR,pt;q=0.9,en;q=0.8",
        }
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[
            Region::Us,
            Region::Uk,
            Region::Ca,
            Region::Au,
            Region::De,
            Region::Fr,
            Region::Es,
            Region::It,
            Region::Jp,
            Region::In,
            Region::Mx,
            Region::Br,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Region::Us),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "ca" | "canada" => Ok(Region::Ca),
            "au" | "australia" => Ok(Region::Au),
            "de" | "germany" => Ok(Region::De),
            "fr" | "france" => Ok(Region::Fr),
            "es" | "spain" => Ok(Region::Es),
            "it" | "italy" => Ok(Region::It),
            "jp" | "japan" => Ok(Region::Jp),
            "in" | "india" => Ok(Region::In),
            "mx" | "mexico" => Ok(Region::Mx),
            "br" | "brazil" => Ok(Region::Br),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionParseError(String);

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown region '{}'. Valid regions: us, uk, ca, au, de, fr, es, it, jp, in, mx, br",
            self.0
        )
    }
}

impl std::error::Error for RegionParseError {}
