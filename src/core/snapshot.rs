//! Immutable rate snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Fiat rates and crypto prices observed at the same refresh instant, both
/// expressed against the base fiat currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Units of each fiat currency per one unit of base.
    #[serde(rename = "fiat_rates", default)]
    fiat: BTreeMap<String, f64>,
    /// Price of one unit of each crypto currency in base.
    #[serde(rename = "crypto_usd", default)]
    crypto: BTreeMap<String, f64>,
}

impl RateSnapshot {
    pub fn new(fiat: BTreeMap<String, f64>, crypto: BTreeMap<String, f64>) -> Self {
        Self { fiat, crypto }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fiat.is_empty() && self.crypto.is_empty()
    }

    pub fn fiat_rate(&self, code: &str) -> Option<f64> {
        self.fiat.get(code).copied()
    }

    pub fn crypto_price(&self, code: &str) -> Option<f64> {
        self.crypto.get(code).copied()
    }

    pub fn fiat_rates(&self) -> &BTreeMap<String, f64> {
        &self.fiat
    }

    pub fn crypto_prices(&self) -> &BTreeMap<String, f64> {
        &self.crypto
    }
}

/// A snapshot as persisted on disk, with the time it was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    #[serde(flatten)]
    pub snapshot: RateSnapshot,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated(Arc<RateSnapshot>),
    Failed(String),
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated(_))
    }
}
