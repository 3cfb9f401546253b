use crate::core::history::{ConversionRecord, HistoryStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

const PARTITION: &str = "history";

/// Conversion history persisted in a fjall partition. Keys are the record
/// timestamp followed by a sequence number, so iteration order is insertion
/// order.
pub struct DiskHistory {
    keyspace: Keyspace,
    partition: PartitionHandle,
    seq: AtomicU32,
}

impl DiskHistory {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open history store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open history partition")?;
        Ok(Self {
            keyspace,
            partition,
            seq: AtomicU32::new(0),
        })
    }

    fn key(&self, record: &ConversionRecord) -> Vec<u8> {
        let nanos = record
            .timestamp
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .max(0) as u64;
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let mut key = nanos.to_be_bytes().to_vec();
        key.extend_from_slice(&seq.to_be_bytes());
        key
    }
}

#[async_trait]
impl HistoryStore for DiskHistory {
    async fn append(&self, record: &ConversionRecord) -> Result<()> {
        let value = serde_json::to_vec(record)?;
        self.partition.insert(self.key(record), value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("History APPEND");
        Ok(())
    }

    async fn query_all(&self) -> Result<Vec<ConversionRecord>> {
        let mut records = Vec::new();
        for item in self.partition.iter() {
            let (_, value) = item?;
            match serde_json::from_slice::<ConversionRecord>(&value) {
                Ok(record) => records.push(record),
                Err(e) => debug!("Skipping unreadable history entry: {}", e),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};
    use tempfile::tempdir;

    fn record(amount: f64, offset_secs: i64) -> ConversionRecord {
        ConversionRecord {
            timestamp: Local::now() + Duration::seconds(offset_secs),
            amount,
            from: "USD".into(),
            to: "EUR".into(),
            rate: 0.9,
            result: amount * 0.9,
        }
    }

    #[tokio::test]
    async fn test_records_survive_reopen_in_time_order() {
        let dir = tempdir().unwrap();
        {
            let history = DiskHistory::open(dir.path()).unwrap();
            history.append(&record(2.0, 10)).await.unwrap();
            history.append(&record(1.0, 0)).await.unwrap();
        }

        let history = DiskHistory::open(dir.path()).unwrap();
        let all = history.query_all().await.unwrap();
        assert_eq!(all.iter().map(|r| r.amount).collect::<Vec<_>>(), vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_query_filters() {
        let dir = tempdir().unwrap();
        let history = DiskHistory::open(dir.path()).unwrap();
        history.append(&record(100.0, 0)).await.unwrap();
        assert_eq!(history.query("eur").await.unwrap().len(), 1);
        assert!(history.query("jpy").await.unwrap().is_empty());
    }
}
