use super::util::get_json;
use crate::core::error::ProviderError;
use crate::core::provider::{HistoricalCryptoProvider, LiveCryptoProvider};
use crate::core::series::RateSeries;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

const NAME: &str = "CoinGecko";

/// Spot prices (`/simple/price`) and daily history (`/coins/{id}/market_chart`)
/// from CoinGecko. Codes are mapped to CoinGecko coin ids through `ids`.
pub struct CoinGeckoProvider {
    base_url: String,
    ids: BTreeMap<String, String>,
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, ids: BTreeMap<String, String>, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ids,
            client,
        }
    }
}

// coin id -> vs currency -> price
type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<(f64, Option<f64>)>,
}

#[async_trait]
impl LiveCryptoProvider for CoinGeckoProvider {
    #[instrument(name = "LiveCryptoFetch", skip(self))]
    async fn fetch_live_crypto(
        &self,
        codes: &[String],
        quote: &str,
    ) -> Result<HashMap<String, f64>, ProviderError> {
        let wanted: Vec<(&String, &String)> = codes
            .iter()
            .filter_map(|code| self.ids.get_key_value(&code.to_uppercase()))
            .collect();
        if wanted.is_empty() {
            return Ok(HashMap::new());
        }

        let vs = quote.to_lowercase();
        let ids = wanted
            .iter()
            .map(|(_, id)| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/simple/price", self.base_url);
        let data: SimplePriceResponse = get_json(
            &self.client,
            NAME,
            &url,
            &[("ids", ids), ("vs_currencies", vs.clone())],
        )
        .await?;

        let prices: HashMap<String, f64> = wanted
            .into_iter()
            .filter_map(|(code, id)| {
                data.get(id)
                    .and_then(|quotes| quotes.get(&vs).copied().flatten())
                    .map(|price| (code.clone(), price))
            })
            .collect();
        debug!(count = prices.len(), "Received crypto prices");
        Ok(prices)
    }
}

#[async_trait]
impl HistoricalCryptoProvider for CoinGeckoProvider {
    #[instrument(name = "CryptoHistoryFetch", skip(self))]
    async fn fetch_historical_crypto(
        &self,
        code: &str,
        quote: &str,
        days: u32,
    ) -> Result<RateSeries, ProviderError> {
        let id = self
            .ids
            .get(&code.to_uppercase())
            .ok_or_else(|| ProviderError::new(NAME, format!("Unknown crypto code: {code}")))?;
        let url = format!("{}/coins/{}/market_chart", self.base_url, id);
        let data: MarketChartResponse = get_json(
            &self.client,
            NAME,
            &url,
            &[("vs_currency", quote.to_lowercase()), ("days", days.to_string())],
        )
        .await?;

        let mut observations: Vec<(i64, f64)> = data
            .prices
            .into_iter()
            .filter_map(|(ts, price)| price.map(|p| (ts as i64, p)))
            .collect();
        // Last observation of each UTC day wins.
        observations.sort_by_key(|(ts, _)| *ts);
        let series: RateSeries = observations
            .into_iter()
            .filter_map(|(ts, price)| {
                DateTime::from_timestamp_millis(ts).map(|dt| (dt.date_naive(), price))
            })
            .collect();

        debug!(points = series.len(), "Received crypto history");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::util::{DEFAULT_TIMEOUT, build_client};
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> CoinGeckoProvider {
        let ids = BTreeMap::from([
            ("BTC".to_string(), "bitcoin".to_string()),
            ("ETH".to_string(), "ethereum".to_string()),
            ("TON".to_string(), "toncoin".to_string()),
        ]);
        CoinGeckoProvider::new(&server.uri(), ids, build_client(DEFAULT_TIMEOUT).unwrap())
    }

    #[tokio::test]
    async fn test_simple_price_omits_unknown_codes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("vs_currencies", "usd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"bitcoin": {"usd": 50000.5}, "ethereum": {"usd": null}}"#,
            ))
            .mount(&server)
            .await;

        let codes = ["BTC", "ETH", "TON", "FOO"].map(String::from);
        let prices = provider(&server)
            .fetch_live_crypto(&codes, "USD")
            .await
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices.get("BTC"), Some(&50000.5));
    }

    #[tokio::test]
    async fn test_simple_price_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        let err = provider(&server)
            .fetch_live_crypto(&["BTC".to_string()], "usd")
            .await
            .unwrap_err();
        assert_eq!(err.provider, "CoinGecko");
    }

    #[tokio::test]
    async fn test_market_chart_keeps_latest_per_day() {
        // 2025-03-01T00:00Z = 1740787200000
        let day = 86_400_000i64;
        let d0 = 1_740_787_200_000i64;
        let body = format!(
            r#"{{"prices": [[{}, 3.0], [{}, 1.0], [{}, 2.0], [{}, null]]}}"#,
            d0 + day + 3_600_000,
            d0 + 3_600_000,
            d0 + 7_200_000,
            d0 + day + 7_200_000,
        );
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .and(query_param("vs_currency", "eur"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let series = provider(&server)
            .fetch_historical_crypto("BTC", "EUR", 7)
            .await
            .unwrap();
        let points: Vec<_> = series.iter().collect();
        assert_eq!(
            points,
            vec![
                (NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 2.0),
                (NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(), 3.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_market_chart_unknown_code() {
        let server = MockServer::start().await;
        let err = provider(&server)
            .fetch_historical_crypto("XYZ", "usd", 7)
            .await
            .unwrap_err();
        assert_eq!(err.cause, "Unknown crypto code: XYZ");
    }
}
