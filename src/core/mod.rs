//! Rate resolution core: currencies, snapshots, resolvers and refresh.

pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod history;
pub mod log;
pub mod manager;
pub mod notify;
pub mod provider;
pub mod resolver;
pub mod scheduler;
pub mod series;
pub mod snapshot;
pub mod timeseries;

// Re-export main types for cleaner imports
pub use currency::{Currency, CurrencyKind, SupportedSet};
pub use error::{CacheError, NotifyError, ProviderError, RateError};
pub use history::{ConversionRecord, HistoryStore};
pub use manager::{FeedState, FeedStatus, RateSnapshotManager};
pub use notify::Notifier;
pub use resolver::cross_rate;
pub use scheduler::RefreshScheduler;
pub use series::RateSeries;
pub use snapshot::{CachedSnapshot, RateSnapshot, RefreshOutcome};
pub use timeseries::TimeSeriesResolver;
