//! Conversion records and the store they are handed to.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One completed conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub timestamp: DateTime<Local>,
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub result: f64,
}

impl ConversionRecord {
    /// Case-insensitive substring match over every displayed field.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        [
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.amount.to_string(),
            self.from.to_lowercase(),
            self.to.to_lowercase(),
            self.rate.to_string(),
            self.result.to_string(),
        ]
        .iter()
        .any(|field| field.contains(&q))
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: &ConversionRecord) -> Result<()>;

    /// All records, oldest first.
    async fn query_all(&self) -> Result<Vec<ConversionRecord>>;

    async fn query(&self, text: &str) -> Result<Vec<ConversionRecord>> {
        Ok(self
            .query_all()
            .await?
            .into_iter()
            .filter(|r| r.matches(text))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_matches_any_field() {
        let record = ConversionRecord {
            timestamp: Local.with_ymd_and_hms(2025, 3, 4, 10, 30, 0).unwrap(),
            amount: 100.0,
            from: "USD".into(),
            to: "EUR".into(),
            rate: 0.9,
            result: 90.0,
        };
        assert!(record.matches("eur"));
        assert!(record.matches("2025-03-04"));
        assert!(record.matches("0.9"));
        assert!(record.matches(""));
        assert!(!record.matches("btc"));
    }
}
