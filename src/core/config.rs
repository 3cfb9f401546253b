use super::currency::SupportedSet;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "FXBRIDGE_EXCHANGERATE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProvidersConfig {
    pub exchangerate_api: ExchangeRateApiConfig,
    pub coingecko: CoinGeckoConfig,
    pub frankfurter: FrankfurterConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchangerate_api: ExchangeRateApiConfig {
                base_url: "https://v6.exchangerate-api.com/v6".to_string(),
                api_key: None,
            },
            coingecko: CoinGeckoConfig {
                base_url: "https://api.coingecko.com/api/v3".to_string(),
            },
            frankfurter: FrankfurterConfig {
                base_url: "https://api.frankfurter.app".to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CryptoConfig {
    pub enabled: bool,
    /// Code -> CoinGecko coin id.
    pub coins: BTreeMap<String, String>,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        let coins = [
            ("BTC", "bitcoin"),
            ("ETH", "ethereum"),
            ("USDT", "tether"),
            ("BNB", "binancecoin"),
            ("XRP", "ripple"),
            ("DOGE", "dogecoin"),
            ("SOL", "solana"),
            ("LTC", "litecoin"),
            ("ADA", "cardano"),
            ("TON", "toncoin"),
            ("DOT", "polkadot"),
            ("TRX", "tron"),
        ];
        CryptoConfig {
            enabled: true,
            coins: coins
                .into_iter()
                .map(|(c, id)| (c.to_string(), id.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RefreshConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            enabled: true,
            interval_secs: 600,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub base_currency: String,
    pub fiat: Vec<String>,
    pub crypto: CryptoConfig,
    pub providers: ProvidersConfig,
    pub http_timeout_secs: u64,
    pub refresh: RefreshConfig,
    pub chart_days: Vec<u32>,
    pub data_path: Option<String>,
    pub outbox_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fiat = [
            "USD", "EUR", "RUB", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "SEK", "NOK", "PLN",
            "CZK", "TRY", "INR", "BRL", "HKD", "SGD", "ZAR", "HUF", "MXN", "ILS", "DKK", "RON",
            "AED",
        ];
        AppConfig {
            base_currency: "USD".to_string(),
            fiat: fiat.into_iter().map(String::from).collect(),
            crypto: CryptoConfig::default(),
            providers: ProvidersConfig::default(),
            http_timeout_secs: 12,
            refresh: RefreshConfig::default(),
            chart_days: vec![7, 30, 90],
            data_path: None,
            outbox_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or the built-in defaults if
    /// no file exists there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxbridge")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "fxbridge")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn outbox_path(&self) -> Result<PathBuf> {
        match &self.outbox_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(self.default_data_path()?.join("outbox")),
        }
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Supported currencies. Crypto codes are left out when crypto is disabled.
    pub fn supported_set(&self) -> Result<SupportedSet> {
        let set = SupportedSet::new(&self.base_currency, &self.fiat, &self.crypto.coins)
            .context("Invalid currency configuration")?;
        Ok(if self.crypto.enabled {
            set
        } else {
            set.without_crypto()
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs.max(1))
    }

    /// API key from the config file, or from the environment.
    pub fn exchangerate_api_key(&self) -> Option<String> {
        self.providers
            .exchangerate_api
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }
}
