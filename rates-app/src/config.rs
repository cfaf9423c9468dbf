//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use rates_hex::DEFAULT_PROVIDER_TIMEOUT;
use rates_hex::inbound::DEFAULT_REQUESTS_PER_MINUTE;
use rates_providers::beacon::CURRENCY_BEACON_API_URL;
use rates_types::CurrencyCode;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/rates.db?mode=rwc";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Overrides the catalog's default currency when set.
    pub default_base_currency: Option<CurrencyCode>,
    /// CurrencyBeacon is only registered when a key is present.
    pub currency_beacon_api_key: Option<String>,
    pub currency_beacon_base_url: String,
    pub provider_timeout: Duration,
    pub rate_limit_per_minute: u32,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a port number, got {:?}", raw))?,
            None => 3000,
        };

        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let default_base_currency = var("DEFAULT_BASE_CURRENCY")
            .map(|raw| CurrencyCode::parse(&raw))
            .transpose()?;

        let provider_timeout = match var("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: f64 = raw.parse().map_err(|_| {
                    anyhow::anyhow!("PROVIDER_TIMEOUT_SECS must be a number, got {:?}", raw)
                })?;
                Duration::try_from_secs_f64(secs)
                    .ok()
                    .filter(|d| !d.is_zero())
                    .ok_or_else(|| anyhow::anyhow!("PROVIDER_TIMEOUT_SECS must be positive"))?
            }
            None => DEFAULT_PROVIDER_TIMEOUT,
        };

        let rate_limit_per_minute = match var("RATE_LIMIT_PER_MINUTE") {
            Some(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("RATE_LIMIT_PER_MINUTE must be a whole number, got {:?}", raw)
            })?,
            None => DEFAULT_REQUESTS_PER_MINUTE,
        };

        let log_format = match var("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            port,
            database_url,
            default_base_currency,
            currency_beacon_api_key: var("CURRENCYBEACON_API_KEY"),
            currency_beacon_base_url: var("CURRENCYBEACON_BASE_URL")
                .unwrap_or_else(|| CURRENCY_BEACON_API_URL.to_string()),
            provider_timeout,
            rate_limit_per_minute,
            log_format,
        })
    }
}
