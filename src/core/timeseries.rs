//! Historical rate series for any supported pair.

use super::currency::{Currency, CurrencyKind};
use super::error::RateError;
use super::provider::{HistoricalCryptoProvider, HistoricalFiatProvider};
use super::series::RateSeries;
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct TimeSeriesResolver {
    fiat: Arc<dyn HistoricalFiatProvider>,
    crypto: Arc<dyn HistoricalCryptoProvider>,
    base: Currency,
}

impl TimeSeriesResolver {
    /// Both legs of a crypto/crypto series are requested in `base`.
    pub fn new(
        fiat: Arc<dyn HistoricalFiatProvider>,
        crypto: Arc<dyn HistoricalCryptoProvider>,
        base: Currency,
    ) -> Self {
        Self { fiat, crypto, base }
    }

    pub async fn resolve(
        &self,
        from: &Currency,
        to: &Currency,
        window_days: u32,
    ) -> Result<RateSeries, RateError> {
        self.resolve_at(from, to, window_days, Utc::now().date_naive())
            .await
    }

    /// Same as [`resolve`](Self::resolve) with the window ending at `today`.
    #[instrument(skip(self, from, to), fields(from = %from, to = %to))]
    pub async fn resolve_at(
        &self,
        from: &Currency,
        to: &Currency,
        window_days: u32,
        today: NaiveDate,
    ) -> Result<RateSeries, RateError> {
        let unavailable = || RateError::HistoryUnavailable {
            from: from.code().to_string(),
            to: to.code().to_string(),
            days: window_days,
        };
        let window = Duration::try_days(i64::from(window_days))
            .and_then(|span| today.checked_sub_signed(span))
            .zip(today.pred_opt());
        let Some((start, yesterday)) = window else {
            warn!(window_days, "Window reaches past the supported date range");
            return Err(unavailable());
        };

        let series = if from == to {
            RateSeries::business_days(start, yesterday, 1.0)
        } else {
            match (from.kind(), to.kind()) {
                (CurrencyKind::Fiat, CurrencyKind::Fiat) => {
                    self.fiat_pair(from, to, start, today).await?
                }
                (CurrencyKind::Crypto, CurrencyKind::Fiat) => {
                    self.crypto
                        .fetch_historical_crypto(from.code(), to.code(), window_days)
                        .await?
                }
                (CurrencyKind::Fiat, CurrencyKind::Crypto) => self
                    .crypto
                    .fetch_historical_crypto(to.code(), from.code(), window_days)
                    .await?
                    .inverted(),
                (CurrencyKind::Crypto, CurrencyKind::Crypto) => {
                    let (leg_from, leg_to) = futures::try_join!(
                        self.crypto.fetch_historical_crypto(
                            from.code(),
                            self.base.code(),
                            window_days
                        ),
                        self.crypto
                            .fetch_historical_crypto(to.code(), self.base.code(), window_days),
                    )?;
                    leg_from.divided_by(&leg_to)
                }
            }
        };

        // providers occasionally publish zero or negative closes
        let series = series.valid_only();
        if series.is_empty() {
            return Err(unavailable());
        }
        debug!(points = series.len(), "Resolved historical series");
        Ok(series)
    }

    async fn fiat_pair(
        &self,
        from: &Currency,
        to: &Currency,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, RateError> {
        match self
            .fiat
            .fetch_historical_fiat(from.code(), to.code(), start, end)
            .await
        {
            Ok(series) if !series.is_empty() => return Ok(series),
            Ok(_) => debug!("Direct series empty, bridging through {}", self.base),
            Err(e) => warn!(error = %e, "Direct series failed, bridging through {}", self.base),
        }

        let (leg_from, leg_to) =
            futures::try_join!(self.base_leg(from, start, end), self.base_leg(to, start, end))?;

        let bridged = match (leg_from, leg_to) {
            (Some(f), Some(t)) => t.divided_by(&f),
            (None, Some(t)) => t,
            (Some(f), None) => f.inverted(),
            (None, None) => RateSeries::new(),
        };
        Ok(bridged)
    }

    /// Base -> `code` series, or `None` when `code` is the base itself.
    async fn base_leg(
        &self,
        code: &Currency,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<RateSeries>, RateError> {
        if *code == self.base {
            return Ok(None);
        }
        let series = self
            .fiat
            .fetch_historical_fiat(self.base.code(), code.code(), start, end)
            .await?;
        Ok(Some(series))
    }
}
