//! Owns the current rate snapshot and refreshes it from live providers.

use super::currency::SupportedSet;
use super::provider::{LiveCryptoProvider, LiveFiatProvider};
use super::snapshot::{RateSnapshot, RefreshOutcome};
use crate::store::rate_cache::RateCache;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    /// No rates at all yet.
    Uninitialized,
    /// The latest refresh succeeded.
    Live,
    /// Serving an older snapshot, either because the latest refresh failed
    /// or because only the cache has been read so far.
    Degraded { reason: String },
}

impl Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedStatus::Uninitialized => write!(f, "no rates yet"),
            FeedStatus::Live => write!(f, "live"),
            FeedStatus::Degraded { reason } => write!(f, "degraded ({reason})"),
        }
    }
}

/// What readers observe: one status and one whole snapshot.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub status: FeedStatus,
    pub snapshot: Arc<RateSnapshot>,
}

pub struct RateSnapshotManager {
    fiat: Arc<dyn LiveFiatProvider>,
    crypto: Option<Arc<dyn LiveCryptoProvider>>,
    supported: SupportedSet,
    cache: RateCache,
    state: watch::Sender<FeedState>,
    refresh_lock: Mutex<()>,
}

impl RateSnapshotManager {
    /// Seeds the snapshot from `cache`. Pass `crypto: None` to run fiat-only.
    /// Crypto prices are always requested in the base currency.
    pub fn new(
        fiat: Arc<dyn LiveFiatProvider>,
        crypto: Option<Arc<dyn LiveCryptoProvider>>,
        supported: SupportedSet,
        cache: RateCache,
    ) -> Self {
        let initial = match cache.load_cached() {
            Some(cached) if !cached.snapshot.is_empty() => {
                info!(
                    fiat = cached.snapshot.fiat_rates().len(),
                    crypto = cached.snapshot.crypto_prices().len(),
                    saved_at = %cached.saved_at,
                    "Loaded cached rates"
                );
                FeedState {
                    status: FeedStatus::Degraded {
                        reason: format!(
                            "serving cached rates from {}",
                            cached.saved_at.format("%Y-%m-%d %H:%M UTC")
                        ),
                    },
                    snapshot: Arc::new(cached.snapshot),
                }
            }
            _ => {
                info!("Rate cache is empty");
                FeedState {
                    status: FeedStatus::Uninitialized,
                    snapshot: Arc::new(RateSnapshot::empty()),
                }
            }
        };
        let (state, _) = watch::channel(initial);

        Self {
            fiat,
            crypto,
            supported,
            cache,
            state,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn supported(&self) -> &SupportedSet {
        &self.supported
    }

    pub fn snapshot(&self) -> Arc<RateSnapshot> {
        Arc::clone(&self.state.borrow().snapshot)
    }

    pub fn status(&self) -> FeedStatus {
        self.state.borrow().status.clone()
    }

    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Fetches fiat and crypto together and commits them as one snapshot.
    /// If either fetch fails nothing is committed.
    #[instrument(name = "RateRefresh", skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let _guard = self.refresh_lock.lock().await;

        let base = self.supported.base_code().to_string();
        let codes: Vec<String> = self.supported.crypto_codes().map(str::to_string).collect();

        let fiat_fut = self.fiat.fetch_live_fiat(&base);
        let crypto_fut = async {
            match &self.crypto {
                Some(provider) if !codes.is_empty() => {
                    provider.fetch_live_crypto(&codes, &base).await
                }
                _ => Ok(HashMap::new()),
            }
        };
        let (fiat, crypto) = tokio::join!(fiat_fut, crypto_fut);

        let (fiat, crypto) = match (fiat, crypto) {
            (Ok(fiat), Ok(crypto)) => (fiat, crypto),
            (Err(e), _) | (_, Err(e)) => {
                let reason = e.to_string();
                warn!(%reason, "Rate refresh failed, keeping previous snapshot");
                self.state.send_modify(|s| {
                    s.status = FeedStatus::Degraded {
                        reason: reason.clone(),
                    }
                });
                return RefreshOutcome::Failed(reason);
            }
        };

        let snapshot = Arc::new(self.build_snapshot(fiat, crypto));
        if let Err(e) = self.cache.store(&snapshot) {
            warn!(error = %e, "Could not persist rate cache");
        }
        self.state.send_replace(FeedState {
            status: FeedStatus::Live,
            snapshot: Arc::clone(&snapshot),
        });
        info!(
            fiat = snapshot.fiat_rates().len(),
            crypto = snapshot.crypto_prices().len(),
            "Rates updated"
        );
        RefreshOutcome::Updated(snapshot)
    }

    fn build_snapshot(
        &self,
        fiat: HashMap<String, f64>,
        crypto: HashMap<String, f64>,
    ) -> RateSnapshot {
        let mut fiat: BTreeMap<String, f64> = fiat
            .into_iter()
            .map(|(code, rate)| (code.to_uppercase(), rate))
            .filter(|(code, _)| self.supported.lookup(code).is_ok_and(|c| c.is_fiat()))
            .collect();
        fiat.insert(self.supported.base_code().to_string(), 1.0);

        let crypto: BTreeMap<String, f64> = crypto
            .into_iter()
            .map(|(code, price)| (code.to_uppercase(), price))
            .filter(|(code, _)| self.supported.lookup(code).is_ok_and(|c| c.is_crypto()))
            .collect();
        RateSnapshot::new(fiat, crypto)
    }
}
