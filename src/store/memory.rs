use crate::core::history::{ConversionRecord, HistoryStore};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory conversion history, lost on exit.
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<ConversionRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(&self, record: &ConversionRecord) -> Result<()> {
        self.records.lock().await.push(record.clone());
        debug!("History APPEND");
        Ok(())
    }

    async fn query_all(&self) -> Result<Vec<ConversionRecord>> {
        Ok(self.records.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record(from: &str) -> ConversionRecord {
        ConversionRecord {
            timestamp: Local::now(),
            amount: 1.0,
            from: from.into(),
            to: "USD".into(),
            rate: 1.0,
            result: 1.0,
        }
    }

    #[tokio::test]
    async fn test_append_and_query() {
        let history = MemoryHistory::new();
        assert!(history.query_all().await.unwrap().is_empty());

        history.append(&record("EUR")).await.unwrap();
        history.append(&record("GBP")).await.unwrap();

        let all = history.query_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].from, "EUR");
        assert_eq!(history.query("gbp").await.unwrap().len(), 1);
    }
}
