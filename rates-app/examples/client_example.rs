//! Client example demonstrating rate lookups against a running server.
//!
//! Run with: cargo run -p rates-app --example client_example

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rates_client::RatesClient;
use rates_hex::{ProviderRegistry, RateService, inbound::HttpServer};
use rates_providers::SyntheticProvider;
use rates_repo::{MEMORY_URL, build_repo};
use rates_types::{CurrencyCode, UpdateProviderRequest};
use rust_decimal::Decimal;
use tokio::net::TcpListener;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn days_ago(n: i64) -> NaiveDate {
    today() - Duration::days(n)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    println!("🚀 Starting server on port {port}...");

    // In-memory store: CurrencyBeacon (1) and Mock (2). Only Mock is registered,
    // so every lookup falls through to synthetic rates.
    let repo = build_repo(MEMORY_URL).await?;
    let registry = ProviderRegistry::new().register(Arc::new(SyntheticProvider::new()));
    let service = RateService::new(repo, registry);
    let server = HttpServer::new(service, CurrencyCode::parse("EUR")?);
    let router = server.router();

    let server_addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&server_addr).await?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server error: {e}");
        }
    });

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = RatesClient::new(&base_url);

    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let currencies = client.currencies().await?;
    let codes: Vec<_> = currencies.iter().map(|c| c.code.as_str()).collect();
    println!("✅ Known currencies: {}", codes.join(", "));

    let latest = client.latest(None, &[]).await?;
    println!("✅ Latest rates against {}:", latest.base);
    for (code, rate) in &latest.rates {
        println!("   {code}: {rate}");
    }

    let historical = client
        .historical(Some("USD"), &["EUR", "GBP"], days_ago(30))
        .await?;
    println!("✅ USD rates on {}: {:?}", historical.date, historical.rates);

    let series = client
        .series(Some("EUR"), &["USD"], days_ago(3), today())
        .await?;
    println!("✅ EUR/USD over {} days", series.list.len());

    let conversion = client.convert("USD", "EUR", Decimal::from(100)).await?;
    println!(
        "✅ 100 USD = {} EUR (rate {:?})",
        conversion.converted_amount, conversion.rate
    );

    let providers = client.providers().await?;
    println!("\n📋 Providers:");
    for p in &providers {
        println!(
            "   - {} priority={} active={} resolvable={}",
            p.name, p.priority, p.is_active, p.resolvable
        );
    }

    // Switching Mock off leaves nothing to resolve
    client
        .update_provider(
            "Mock",
            &UpdateProviderRequest {
                priority: None,
                is_active: Some(false),
            },
        )
        .await?;
    match client.latest(None, &[]).await {
        Err(e) => println!("✅ With Mock inactive: {e}"),
        Ok(r) => println!("⚠️  Unexpected rates: {:?}", r.rates),
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
