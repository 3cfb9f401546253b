use super::util::get_json;
use crate::core::error::ProviderError;
use crate::core::provider::HistoricalFiatProvider;
use crate::core::series::RateSeries;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const NAME: &str = "Frankfurter";

/// Daily fiat series from Frankfurter (`/{start}..{end}?from=&to=`). Only
/// published for business days, and never for the current day.
pub struct FrankfurterProvider {
    base_url: String,
    client: Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

/// Clamps `end` to the day before `today`. `None` if nothing is left.
fn clamp_window(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let end = end.min(today - Duration::days(1));
    (start <= end).then_some((start, end))
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    // values are decoded leniently so one bad point does not sink the series
    rates: HashMap<String, HashMap<String, serde_json::Value>>,
}

#[async_trait]
impl HistoricalFiatProvider for FrankfurterProvider {
    #[instrument(name = "FiatHistoryFetch", skip(self))]
    async fn fetch_historical_fiat(
        &self,
        base: &str,
        target: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, ProviderError> {
        let Some((start, end)) = clamp_window(start, end, Utc::now().date_naive()) else {
            debug!("Window ends before yesterday's close, nothing to fetch");
            return Ok(RateSeries::new());
        };

        let target = target.to_uppercase();
        let url = format!(
            "{}/{}..{}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        let data: TimeSeriesResponse = get_json(
            &self.client,
            NAME,
            &url,
            &[("from", base.to_uppercase()), ("to", target.clone())],
        )
        .await?;

        let series: RateSeries = data
            .rates
            .into_iter()
            .filter_map(|(date, quotes)| {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
                let rate = quotes.get(&target).and_then(serde_json::Value::as_f64)?;
                Some((date, rate))
            })
            .collect();
        debug!(points = series.len(), "Received fiat history");
        Ok(series)
    }
}
