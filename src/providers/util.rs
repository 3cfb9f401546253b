use crate::core::error::ProviderError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// HTTP client shared by all providers. Every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .user_agent("fxbridge/1.0")
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::new("http", format!("Failed to build HTTP client: {e}")))
}

/// Sends a GET and decodes the JSON body. Transport errors, timeouts, non-2xx
/// statuses and undecodable bodies all become a [`ProviderError`].
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: &'static str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, ProviderError> {
    let parsed = if query.is_empty() {
        reqwest::Url::parse(url)
    } else {
        reqwest::Url::parse_with_params(url, query)
    };
    let url = parsed
        .map_err(|e| ProviderError::new(provider, format!("Invalid URL {url}: {e}")))?;
    debug!(%url, "Requesting {}", provider);
    let response = client.get(url).send().await.map_err(|e| {
        let kind = if e.is_timeout() { "Timed out" } else { "Request error" };
        ProviderError::new(provider, format!("{kind}: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::new(provider, format!("HTTP error: {status}")));
    }

    let text = response
        .text()
        .await
        .map_err(|e| ProviderError::new(provider, format!("Failed to read response: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| ProviderError::new(provider, format!("Failed to parse JSON response: {e}")))
}
