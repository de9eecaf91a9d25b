// src/catalog/mod.rs
// =============================================================================
// This module describes WHAT we fetch.
//
// - AssetId: the identifier the CoinCap API uses for one coin ("bitcoin")
// - Catalog: the fixed, ordered list of ids we track (no duplicates)
// - AssetRecord: one successfully fetched coin (see record.rs)
//
// The catalog is decided once at startup (built-in default or --assets) and
// is only ever read afterwards.
// =============================================================================

mod record;

pub use record::AssetRecord;

use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Coins tracked when no `--assets` list is given.
pub const DEFAULT_ASSETS: &[&str] = &[
    "bitcoin",
    "ethereum",
    "tether",
    "binance-coin",
    "solana",
    "usd-coin",
    "xrp",
    "dogecoin",
    "cardano",
    "tron",
    "avalanche",
    "chainlink",
    "polkadot",
    "polygon",
    "litecoin",
    "shiba-inu",
    "bitcoin-cash",
    "uniswap",
    "stellar",
    "monero",
];

/// Opaque identifier of one fetchable asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        AssetId::new(id)
    }
}

/// Ordered, duplicate-free list of asset ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    ids: Vec<AssetId>,
}

impl Catalog {
    /// Builds a catalog, keeping the given order.
    ///
    /// Ids are trimmed. Blank ids and duplicates are rejected, an empty
    /// list is fine.
    pub fn new<I, S>(ids: I) -> Result<Self, TrackerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for raw in ids {
            let id = raw.as_ref().trim();
            if id.is_empty() {
                return Err(TrackerError::BlankAssetId);
            }
            if !seen.insert(id.to_string()) {
                return Err(TrackerError::DuplicateAsset(id.to_string()));
            }
            out.push(AssetId::new(id));
        }

        Ok(Catalog { ids: out })
    }

    /// The built-in list of tracked coins.
    pub fn default_assets() -> Self {
        Catalog {
            ids: DEFAULT_ASSETS.iter().map(|id| AssetId::new(*id)).collect(),
        }
    }

    pub fn ids(&self) -> &[AssetId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keeps_order() {
        let catalog = Catalog::new(["ethereum", "bitcoin", "xrp"]).unwrap();
        let ids: Vec<&str> = catalog.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["ethereum", "bitcoin", "xrp"]);
    }

    #[test]
    fn test_catalog_trims_ids() {
        let catalog = Catalog::new([" bitcoin ", "ethereum\n"]).unwrap();
        assert_eq!(catalog.ids()[0].as_str(), "bitcoin");
        assert_eq!(catalog.ids()[1].as_str(), "ethereum");
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = Catalog::new(["bitcoin", "ethereum", "bitcoin"]);
        assert!(matches!(result, Err(TrackerError::DuplicateAsset(id)) if id == "bitcoin"));
    }

    #[test]
    fn test_catalog_rejects_blank_ids() {
        let result = Catalog::new(["bitcoin", "  "]);
        assert!(matches!(result, Err(TrackerError::BlankAssetId)));
    }

    #[test]
    fn test_empty_catalog_is_allowed() {
        let catalog = Catalog::new(Vec::<String>::new()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_default_assets_have_no_duplicates() {
        let catalog = Catalog::new(DEFAULT_ASSETS.iter()).unwrap();
        assert_eq!(catalog, Catalog::default_assets());
        assert_eq!(catalog.len(), DEFAULT_ASSETS.len());
    }
}
