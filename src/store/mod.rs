//! Persistence: rate cache, conversion history and the message outbox.

pub mod disk;
pub mod memory;
pub mod outbox;
pub mod rate_cache;

pub use disk::DiskHistory;
pub use memory::MemoryHistory;
pub use outbox::OutboxNotifier;
pub use rate_cache::RateCache;
