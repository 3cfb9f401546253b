//! Upstream data source abstractions.

use super::error::ProviderError;
use super::series::RateSeries;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Spot fiat rates: units of each currency per one unit of `base`.
#[async_trait]
pub trait LiveFiatProvider: Send + Sync {
    async fn fetch_live_fiat(&self, base: &str) -> Result<HashMap<String, f64>, ProviderError>;
}

/// Spot crypto prices in `quote`. Codes the provider does not know are left out
/// of the result.
#[async_trait]
pub trait LiveCryptoProvider: Send + Sync {
    async fn fetch_live_crypto(
        &self,
        codes: &[String],
        quote: &str,
    ) -> Result<HashMap<String, f64>, ProviderError>;
}

/// Daily `base -> target` fiat series. Non-trading days are absent.
#[async_trait]
pub trait HistoricalFiatProvider: Send + Sync {
    async fn fetch_historical_fiat(
        &self,
        base: &str,
        target: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, ProviderError>;
}

/// Daily price of `code` in `quote` for the last `days` days.
#[async_trait]
pub trait HistoricalCryptoProvider: Send + Sync {
    async fn fetch_historical_crypto(
        &self,
        code: &str,
        quote: &str,
        days: u32,
    ) -> Result<RateSeries, ProviderError>;
}
