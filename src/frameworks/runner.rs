// Framework bootstrap: tracing, configuration and client wiring for a load-test run.

use crate::frameworks::config::{ConfigError, LoadTestConfig};
use crate::interface_adapters::clients::{AuthClient, GameClient, TlsMode};
use crate::use_cases::{DriverError, run_load_test};

use std::{fmt, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    HttpClient(String),
    GameClient(String),
    Driver(DriverError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(err) => write!(f, "invalid configuration: {err}"),
            RunError::HttpClient(err) => write!(f, "failed to initialize http client: {err}"),
            RunError::GameClient(err) => write!(f, "failed to initialize game client: {err}"),
            RunError::Driver(err) => write!(f, "load test aborted: {err}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        RunError::Config(err)
    }
}

impl From<DriverError> for RunError {
    fn from(err: DriverError) -> Self {
        RunError::Driver(err)
    }
}

// Our own events at info; reqwest, hyper and tungstenite only from warn.
const DEFAULT_LOG_FILTER: &str = "warn,game_load_tester=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_runtime() {
    // A missing .env is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());
    let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());

    // Worker spans carry user_id, so targets add nothing.
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "load tester panicked");
    }));
}

pub async fn run() -> Result<(), RunError> {
    init_runtime();

    let config = LoadTestConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "failed to load configuration");
    })?;

    run_with_config(config).await
}

pub async fn run_with_config(config: LoadTestConfig) -> Result<(), RunError> {
    tracing::debug!(
        api_url = %config.api_url,
        ws_url = %config.ws_url,
        num_clients = config.num_clients,
        auth_mode = ?config.auth_mode,
        "load test configured"
    );

    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled");
    }

    let auth = AuthClient::new(config.api_url.clone(), config.accept_invalid_certs)
        .map_err(|e| RunError::HttpClient(e.to_string()))
        .inspect_err(|e| tracing::error!(error = %e, "startup failed"))?;

    let tls_mode = if config.accept_invalid_certs {
        TlsMode::AcceptInvalidCerts
    } else {
        TlsMode::Verify
    };
    let game = GameClient::new(config.ws_url.clone(), tls_mode)
        .map_err(|e| RunError::GameClient(e.to_string()))
        .inspect_err(|e| tracing::error!(error = %e, "startup failed"))?;

    let workers = run_load_test(&config.driver_settings(), &auth, Arc::new(game)).await?;
    tracing::info!(workers, "load test finished");
    Ok(())
}
