use crate::use_cases::{AuthMode, DriverSettings};
use std::{env, fmt, str::FromStr};
use url::Url;

// Runtime configuration for a load-test run, read once from the environment.

pub const DEFAULT_API_URL: &str = "https://localhost:8080/api/user";
pub const DEFAULT_WS_URL: &str = "wss://localhost:8080/api/game/ws";
pub const DEFAULT_NUM_CLIENTS: usize = 51;
pub const DEFAULT_PASSWORD: &str = "Testpass123";
pub const DEFAULT_USER_PREFIX: &str = "user";
pub const DEFAULT_EMAIL_DOMAIN: &str = "test.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestConfig {
    // Base of the user API; `/login` and `/register` are appended.
    pub api_url: String,
    pub ws_url: String,
    pub num_clients: usize,
    pub password: String,
    pub user_prefix: String,
    pub email_domain: String,
    pub auth_mode: AuthMode,
    // Off unless explicitly enabled for self-signed deployments.
    pub accept_invalid_certs: bool,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            num_clients: DEFAULT_NUM_CLIENTS,
            password: DEFAULT_PASSWORD.to_string(),
            user_prefix: DEFAULT_USER_PREFIX.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            auth_mode: AuthMode::Login,
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl { key, value, reason } => {
                write!(f, "{key}={value} is not a usable url: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "login" => Ok(AuthMode::Login),
            "register" => Ok(AuthMode::Register),
            other => Err(format!("unknown auth mode {other:?}")),
        }
    }
}

impl LoadTestConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset or unparsable values use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("LOAD_TEST_API_URL").unwrap_or(defaults.api_url);
        validate_url("LOAD_TEST_API_URL", &api_url, &["http", "https"])?;
        let ws_url = lookup("LOAD_TEST_WS_URL").unwrap_or(defaults.ws_url);
        validate_url("LOAD_TEST_WS_URL", &ws_url, &["ws", "wss"])?;

        Ok(Self {
            api_url,
            ws_url,
            num_clients: parsed(&lookup, "LOAD_TEST_CLIENTS", defaults.num_clients),
            password: lookup("LOAD_TEST_PASSWORD").unwrap_or(defaults.password),
            user_prefix: lookup("LOAD_TEST_USER_PREFIX").unwrap_or(defaults.user_prefix),
            email_domain: lookup("LOAD_TEST_EMAIL_DOMAIN").unwrap_or(defaults.email_domain),
            auth_mode: parsed(&lookup, "LOAD_TEST_AUTH_MODE", defaults.auth_mode),
            accept_invalid_certs: flag(
                &lookup,
                "LOAD_TEST_ACCEPT_INVALID_CERTS",
                defaults.accept_invalid_certs,
            ),
        })
    }

    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            num_clients: self.num_clients,
            auth_mode: self.auth_mode,
            password: self.password.clone(),
            user_prefix: self.user_prefix.clone(),
            email_domain: self.email_domain.clone(),
        }
    }
}

fn validate_url(key: &'static str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
            reason: format!("scheme must be one of {schemes:?}"),
        });
    }
    Ok(())
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "unparsable setting; using default");
            default
        }),
        None => default,
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(key, value = %raw, default, "unparsable flag; using default");
            default
        }
    }
}
