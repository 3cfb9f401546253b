//! Amount conversion on top of the current snapshot.

use super::error::RateError;
use super::history::{ConversionRecord, HistoryStore};
use super::manager::RateSnapshotManager;
use super::resolver::cross_rate;
use chrono::Local;
use std::sync::Arc;
use tracing::debug;

/// Parses user input, accepting `,` as the decimal separator.
pub fn parse_amount(input: &str) -> Result<f64, RateError> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(RateError::InvalidAmount("amount is empty".to_string()));
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RateError::InvalidAmount(input.trim().to_string()))
}

pub struct Converter {
    manager: Arc<RateSnapshotManager>,
    history: Arc<dyn HistoryStore>,
}

impl Converter {
    pub fn new(manager: Arc<RateSnapshotManager>, history: Arc<dyn HistoryStore>) -> Self {
        Self { manager, history }
    }

    /// Resolves `from -> to` against the current snapshot, records the result
    /// in history and returns it.
    pub async fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<ConversionRecord, RateError> {
        if !amount.is_finite() {
            return Err(RateError::InvalidAmount(amount.to_string()));
        }
        let supported = self.manager.supported();
        let from = supported.lookup(from)?;
        let to = supported.lookup(to)?;

        let snapshot = self.manager.snapshot();
        let rate = cross_rate(&from, &to, &snapshot)?;
        let record = ConversionRecord {
            timestamp: Local::now(),
            amount,
            from: from.code().to_string(),
            to: to.code().to_string(),
            rate,
            result: amount * rate,
        };
        debug!(?record, "Converted");

        self.history
            .append(&record)
            .await
            .map_err(|e| RateError::History(e.to_string()))?;
        Ok(record)
    }
}
