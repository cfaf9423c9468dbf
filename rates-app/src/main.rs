//! # Exchange Rate Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the descriptor store
//! - Register provider implementations
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use rates_hex::{ProviderRegistry, RateService, inbound::HttpServer};
use rates_providers::{CurrencyBeaconProvider, SyntheticProvider};
use rates_repo::build_repo;
use rates_types::{CurrencyCode, RatesRepository};

use config::{Config, LogFormat};

/// Base currency when neither the environment nor the catalog names one.
const FALLBACK_BASE_CURRENCY: &str = "EUR";

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,rates_app=debug,rates_hex=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

fn build_registry(config: &Config) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new().register(Arc::new(SyntheticProvider::new()));

    match &config.currency_beacon_api_key {
        Some(key) => {
            let beacon =
                CurrencyBeaconProvider::with_base_url(key.clone(), &config.currency_beacon_base_url);
            registry = registry.register(Arc::new(beacon));
        }
        None => tracing::warn!("CURRENCYBEACON_API_KEY not set; CurrencyBeacon is disabled"),
    }

    registry
}

/// Picks the base currency once: environment, then catalog default, then EUR.
async fn resolve_default_base<R: RatesRepository>(
    config: &Config,
    repo: &R,
) -> anyhow::Result<CurrencyCode> {
    if let Some(code) = &config.default_base_currency {
        return Ok(code.clone());
    }

    match repo.default_currency().await? {
        Some(currency) => Ok(currency.code),
        None => {
            tracing::warn!(
                "No default currency in catalog; using {}",
                FALLBACK_BASE_CURRENCY
            );
            Ok(CurrencyCode::parse(FALLBACK_BASE_CURRENCY)?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!("Starting exchange rate server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    let default_base = resolve_default_base(&config, &repo).await?;
    tracing::info!(base = %default_base, "Default base currency");

    let registry = build_registry(&config);
    tracing::info!(providers = registry.len(), "Provider registry ready");

    let service = RateService::new(repo, registry).with_timeout(config.provider_timeout);

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(service, default_base, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
