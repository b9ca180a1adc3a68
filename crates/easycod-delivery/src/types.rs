//! Provider response types.
//!
//! Fee fields arrive as numbers or numeric strings depending on the provider
//! (and sometimes on the region), so they are kept as raw JSON values here and
//! interpreted by [`crate::normalize`].

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// One region's fees as sent by Noest and the EcoTrack family.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeeEntry {
    #[serde(default)]
    pub wilaya_id: Option<Value>,
    #[serde(default)]
    pub tarif: Option<Value>,
    #[serde(default)]
    pub tarif_stopdesk: Option<Value>,
}

/// A fee collection that is either an array or an object keyed by wilaya id.
///
/// Object-shaped collections come out in numeric key order (`"2"` before
/// `"10"`); keys that are not numbers follow, in string order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FeeCollection {
    List(Vec<RawFeeEntry>),
    Keyed(BTreeMap<String, RawFeeEntry>),
}

impl FeeCollection {
    /// Flattens the collection into `(key, entry)` pairs; list entries have no key.
    #[must_use]
    pub fn into_entries(self) -> Vec<(Option<String>, RawFeeEntry)> {
        match self {
            FeeCollection::List(entries) => entries.into_iter().map(|e| (None, e)).collect(),
            FeeCollection::Keyed(map) => {
                let mut entries: Vec<(String, RawFeeEntry)> = map.into_iter().collect();
                entries.sort_by_key(|(key, _)| (numeric_key(key).is_none(), numeric_key(key)));
                entries.into_iter().map(|(k, e)| (Some(k), e)).collect()
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            FeeCollection::List(entries) => entries.len(),
            FeeCollection::Keyed(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn numeric_key(key: &str) -> Option<u64> {
    key.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// Noest
// ---------------------------------------------------------------------------

/// `GET /api/public/fees` → `{ "tarifs": { "delivery": { "16": { ... } }, "return": ... } }`.
#[derive(Debug, Deserialize)]
pub struct NoestFeesResponse {
    pub tarifs: NoestTarifs,
}

#[derive(Debug, Deserialize)]
pub struct NoestTarifs {
    pub delivery: FeeCollection,
}

// ---------------------------------------------------------------------------
// EcoTrack family
// ---------------------------------------------------------------------------

/// `GET /api/v1/get/fees`. Resellers disagree on the envelope key, so every
/// observed variant is accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EcotrackFeesResponse {
    Livraison { livraison: Vec<RawFeeEntry> },
    Data { data: Vec<RawFeeEntry> },
    Bare(Vec<RawFeeEntry>),
}

impl EcotrackFeesResponse {
    #[must_use]
    pub fn into_entries(self) -> Vec<RawFeeEntry> {
        match self {
            EcotrackFeesResponse::Livraison { livraison } => livraison,
            EcotrackFeesResponse::Data { data } => data,
            EcotrackFeesResponse::Bare(entries) => entries,
        }
    }
}
