pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::convert::Converter;
use crate::core::provider::LiveCryptoProvider;
use crate::core::{HistoryStore, Notifier, RateSnapshotManager, TimeSeriesResolver};
use crate::providers::util::build_client;
use crate::providers::{CoinGeckoProvider, ExchangeRateApiProvider, FrankfurterProvider};
use crate::store::{DiskHistory, OutboxNotifier, RateCache};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Rates,
    Convert {
        amount: String,
        from: String,
        to: String,
        email: Option<String>,
        subject: Option<String>,
    },
    Chart {
        from: String,
        to: String,
        days: u32,
    },
    History {
        search: Option<String>,
    },
    Watch,
}

/// Everything a command needs, wired from one config.
pub struct App {
    pub config: AppConfig,
    pub manager: Arc<RateSnapshotManager>,
    pub timeseries: TimeSeriesResolver,
    pub converter: Converter,
    pub history: Arc<dyn HistoryStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let supported = config.supported_set()?;
        let data_path = config.default_data_path()?;
        let client = build_client(config.http_timeout())?;
        let providers = &config.providers;

        let live_fiat = Arc::new(ExchangeRateApiProvider::new(
            &providers.exchangerate_api.base_url,
            config.exchangerate_api_key(),
            client.clone(),
        ));
        let coingecko = Arc::new(CoinGeckoProvider::new(
            &providers.coingecko.base_url,
            supported.crypto_ids().clone(),
            client.clone(),
        ));
        let frankfurter = Arc::new(FrankfurterProvider::new(
            &providers.frankfurter.base_url,
            client,
        ));

        let live_crypto = config
            .crypto
            .enabled
            .then(|| Arc::clone(&coingecko) as Arc<dyn LiveCryptoProvider>);
        let manager = Arc::new(RateSnapshotManager::new(
            live_fiat,
            live_crypto,
            supported.clone(),
            RateCache::in_dir(&data_path),
        ));
        let timeseries = TimeSeriesResolver::new(frankfurter, coingecko, supported.base());

        let history: Arc<dyn HistoryStore> = Arc::new(
            DiskHistory::open(&data_path.join("history")).context("Failed to open history")?,
        );
        let notifier: Arc<dyn Notifier> = Arc::new(OutboxNotifier::new(config.outbox_path()?));
        let converter = Converter::new(Arc::clone(&manager), Arc::clone(&history));

        Ok(Self {
            config,
            manager,
            timeseries,
            converter,
            history,
            notifier,
        })
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxbridge starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::from_config(config)?;

    match command {
        AppCommand::Rates => cli::rates::run(&app).await,
        AppCommand::Convert {
            amount,
            from,
            to,
            email,
            subject,
        } => {
            cli::convert::run(
                &app,
                &amount,
                &from,
                &to,
                email.as_deref(),
                subject.as_deref(),
            )
            .await
        }
        AppCommand::Chart { from, to, days } => cli::chart::run(&app, &from, &to, days).await,
        AppCommand::History { search } => cli::history::run(&app, search.as_deref()).await,
        AppCommand::Watch => cli::watch::run(&app).await,
    }
}
