use super::util::get_json;
use crate::core::error::ProviderError;
use crate::core::provider::LiveFiatProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const NAME: &str = "ExchangeRate-API";

/// Latest fiat rates from ExchangeRate-API (`/{key}/latest/{base}`).
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

#[async_trait]
impl LiveFiatProvider for ExchangeRateApiProvider {
    #[instrument(name = "LiveFiatFetch", skip(self))]
    async fn fetch_live_fiat(&self, base: &str) -> Result<HashMap<String, f64>, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::new(NAME, "No API key configured"))?;
        let url = format!("{}/{}/latest/{}", self.base_url, key, base.to_uppercase());

        let data: LatestResponse = get_json(&self.client, NAME, &url, &[]).await?;
        if data.result != "success" {
            let reason = data.error_type.unwrap_or(data.result);
            return Err(ProviderError::new(NAME, format!("Request rejected: {reason}")));
        }
        if data.conversion_rates.is_empty() {
            return Err(ProviderError::new(NAME, "Response contained no rates"));
        }

        debug!(count = data.conversion_rates.len(), "Received fiat rates");
        Ok(data.conversion_rates)
    }
}
