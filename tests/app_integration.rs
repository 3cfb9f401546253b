use fxbridge::core::RateError;
use fxbridge::core::config::AppConfig;
use fxbridge::{App, AppCommand};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const LATEST: &str = r#"{
        "result": "success",
        "base_code": "USD",
        "conversion_rates": {"USD": 1, "EUR": 0.5, "GBP": 0.25, "JPY": 150.0}
    }"#;

    pub async fn create_latest_server(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test-key/latest/USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    pub async fn create_coingecko_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("ids", "bitcoin"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"bitcoin": {"usd": 40000.0}}"#),
            )
            .mount(&server)
            .await;
        server
    }

    /// Serves the same body for every `/{start}..{end}` window.
    pub async fn create_frankfurter_server(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/\d{4}-\d{2}-\d{2}\.\.\d{4}-\d{2}-\d{2}$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }
}

struct Fixture {
    dir: TempDir,
    config_path: std::path::PathBuf,
}

impl Fixture {
    fn new(latest_uri: &str, coingecko_uri: &str, frankfurter_uri: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data = dir.path().join("data");
        let outbox = dir.path().join("outbox");
        let config_content = format!(
            r#"
            base_currency: "USD"
            fiat: ["USD", "EUR", "GBP", "JPY"]
            crypto:
              enabled: true
              coins:
                BTC: bitcoin
            providers:
              exchangerate_api:
                base_url: "{latest_uri}"
                api_key: "test-key"
              coingecko:
                base_url: "{coingecko_uri}"
              frankfurter:
                base_url: "{frankfurter_uri}"
            http_timeout_secs: 5
            chart_days: [7, 30]
            data_path: "{}"
            outbox_path: "{}"
        "#,
            data.display(),
            outbox.display()
        );
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, config_content).expect("Failed to write config file");
        Self { dir, config_path }
    }

    fn config_path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }

    fn config(&self) -> AppConfig {
        AppConfig::load_from_path(&self.config_path).unwrap()
    }

    fn data_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("data")
    }

    fn outbox_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("outbox")
    }
}

async fn standard_fixture() -> (Fixture, Vec<wiremock::MockServer>) {
    let latest = test_utils::create_latest_server(200, test_utils::LATEST).await;
    let coingecko = test_utils::create_coingecko_server().await;
    let frankfurter = test_utils::create_frankfurter_server(r#"{"rates": {}}"#).await;
    let fixture = Fixture::new(&latest.uri(), &coingecko.uri(), &frankfurter.uri());
    (fixture, vec![latest, coingecko, frankfurter])
}

fn files_in(dir: &Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default()
}

#[test_log::test(tokio::test)]
async fn test_rates_command_writes_cache() {
    let (fixture, _servers) = standard_fixture().await;

    let result = fxbridge::run_command(AppCommand::Rates, Some(fixture.config_path())).await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());

    let cache = fs::read_to_string(fixture.data_dir().join("rates_cache.json")).unwrap();
    info!(%cache, "Cache written");
    assert!(cache.contains("\"EUR\": 0.5"));
    assert!(cache.contains("\"BTC\": 40000.0"));
}

#[test_log::test(tokio::test)]
async fn test_rates_command_fails_without_any_rates() {
    let latest = test_utils::create_latest_server(500, "oops").await;
    let coingecko = test_utils::create_coingecko_server().await;
    let fixture = Fixture::new(&latest.uri(), &coingecko.uri(), "http://127.0.0.1:9");

    let err = fxbridge::run_command(AppCommand::Rates, Some(fixture.config_path()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No exchange rates available"));
    assert!(!fixture.data_dir().join("rates_cache.json").exists());
}

#[test_log::test(tokio::test)]
async fn test_convert_records_history() {
    let (fixture, _servers) = standard_fixture().await;
    let app = App::from_config(fixture.config()).unwrap();

    fxbridge::cli::convert::run(&app, "100", "eur", "btc", None, None)
        .await
        .unwrap();

    let records = app.history.query_all().await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.from, "EUR");
    assert_eq!(record.to, "BTC");
    // 100 EUR = 200 USD = 0.005 BTC
    assert!((record.result - 0.005).abs() < 1e-12);

    let matches = app.history.query("btc").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert!(app.history.query("JPY").await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_convert_with_email_writes_outbox() {
    let (fixture, _servers) = standard_fixture().await;

    let command = AppCommand::Convert {
        amount: "12,5".to_string(),
        from: "USD".to_string(),
        to: "GBP".to_string(),
        email: Some("someone@example.com".to_string()),
        subject: Some("Rates".to_string()),
    };
    let result = fxbridge::run_command(command, Some(fixture.config_path())).await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let files = files_in(&fixture.outbox_dir());
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.starts_with("To: someone@example.com\nSubject: Rates\n"));
    assert!(content.contains("12.5 USD = 3.1250 GBP"));
}

#[test_log::test(tokio::test)]
async fn test_convert_rejects_invalid_address() {
    let (fixture, _servers) = standard_fixture().await;

    let command = AppCommand::Convert {
        amount: "1".to_string(),
        from: "USD".to_string(),
        to: "EUR".to_string(),
        email: Some("not-an-address".to_string()),
        subject: None,
    };
    let result = fxbridge::run_command(command, Some(fixture.config_path())).await;

    assert!(result.is_err());
    assert!(files_in(&fixture.outbox_dir()).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_convert_unsupported_currency() {
    let (fixture, _servers) = standard_fixture().await;

    let command = AppCommand::Convert {
        amount: "1".to_string(),
        from: "USD".to_string(),
        to: "XYZ".to_string(),
        email: None,
        subject: None,
    };
    let err = fxbridge::run_command(command, Some(fixture.config_path()))
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<RateError>(),
        Some(&RateError::Unsupported("XYZ".to_string()))
    );
}

#[test_log::test(tokio::test)]
async fn test_chart_command_with_direct_series() {
    let latest = test_utils::create_latest_server(200, test_utils::LATEST).await;
    let coingecko = test_utils::create_coingecko_server().await;
    let frankfurter = test_utils::create_frankfurter_server(
        r#"{
            "amount": 1.0,
            "base": "EUR",
            "rates": {
                "2024-03-04": {"USD": 1.08},
                "2024-03-05": {"USD": 1.09}
            }
        }"#,
    )
    .await;
    let fixture = Fixture::new(&latest.uri(), &coingecko.uri(), &frankfurter.uri());

    let command = AppCommand::Chart {
        from: "EUR".to_string(),
        to: "USD".to_string(),
        days: 7,
    };
    let result = fxbridge::run_command(command, Some(fixture.config_path())).await;
    assert!(result.is_ok(), "Chart failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_chart_reports_unavailable_history() {
    let (fixture, _servers) = standard_fixture().await;

    let command = AppCommand::Chart {
        from: "EUR".to_string(),
        to: "GBP".to_string(),
        days: 30,
    };
    let err = fxbridge::run_command(command, Some(fixture.config_path()))
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<RateError>(),
        Some(&RateError::HistoryUnavailable {
            from: "EUR".to_string(),
            to: "GBP".to_string(),
            days: 30,
        })
    );
}

#[test_log::test(tokio::test)]
async fn test_chart_rejects_unconfigured_window() {
    let (fixture, _servers) = standard_fixture().await;

    let command = AppCommand::Chart {
        from: "EUR".to_string(),
        to: "USD".to_string(),
        days: 90,
    };
    let err = fxbridge::run_command(command, Some(fixture.config_path()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Unsupported window of 90 days"));
}

#[test_log::test(tokio::test)]
async fn test_history_command_on_fresh_data_dir() {
    let (fixture, _servers) = standard_fixture().await;

    let command = AppCommand::History { search: None };
    let result = fxbridge::run_command(command, Some(fixture.config_path())).await;
    assert!(result.is_ok(), "History failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_crypto_priced_in_non_usd_base() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let latest = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test-key/latest/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"result": "success", "conversion_rates": {"EUR": 1, "USD": 1.1}}"#,
        ))
        .mount(&latest)
        .await;
    let coingecko = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("vs_currencies", "eur"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"bitcoin": {"eur": 50000.0}}"#),
        )
        .mount(&coingecko)
        .await;

    let dir = TempDir::new().unwrap();
    let config_content = format!(
        r#"
        base_currency: "EUR"
        fiat: ["USD", "EUR"]
        crypto:
          enabled: true
          coins:
            BTC: bitcoin
        providers:
          exchangerate_api:
            base_url: "{}"
            api_key: "test-key"
          coingecko:
            base_url: "{}"
        data_path: "{}"
    "#,
        latest.uri(),
        coingecko.uri(),
        dir.path().join("data").display()
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).unwrap();
    let app = App::from_config(config).unwrap();

    assert!(app.manager.refresh().await.is_updated());
    let to_eur = app.converter.convert(1.0, "BTC", "EUR").await.unwrap();
    let to_usd = app.converter.convert(1.0, "BTC", "USD").await.unwrap();

    assert!((to_eur.rate - 50000.0).abs() < 1e-9);
    assert!((to_usd.rate - 55000.0).abs() < 1e-6);
}
