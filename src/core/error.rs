//! Error types shared by the rate resolution core.

use thiserror::Error;

/// Failure of a single upstream call: transport, timeout, bad status,
/// undecodable payload, or an explicit rejection by the provider.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{provider}: {cause}")]
pub struct ProviderError {
    pub provider: &'static str,
    pub cause: String,
}

impl ProviderError {
    pub fn new(provider: &'static str, cause: impl Into<String>) -> Self {
        Self {
            provider,
            cause: cause.into(),
        }
    }
}

/// Errors surfaced to callers of the resolvers and the converter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RateError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Not enough data to compute {from}->{to}. Refresh rates and check the connection.")]
    InsufficientData { from: String, to: String },

    #[error("No historical data for {from}->{to} over {days} days. Try another period or pair.")]
    HistoryUnavailable { from: String, to: String, days: u32 },

    #[error("Unsupported currency: {0}")]
    Unsupported(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("History store error: {0}")]
    History(String),
}

/// Persisted rate cache could not be read or written. Never fatal.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum NotifyError {
    #[error("Invalid recipient address: {0}")]
    InvalidAddress(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}
