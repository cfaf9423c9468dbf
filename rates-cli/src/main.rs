//! Rates CLI
//!
//! Command-line interface for the exchange-rate API.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use rates_client::RatesClient;
use rates_types::UpdateProviderRequest;

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "Exchange rate API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the exchange-rate API
    #[arg(long, env = "RATES_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest rates
    Latest {
        #[command(flatten)]
        pair: RateArgs,
    },
    /// Rates on a given day
    Historical {
        #[command(flatten)]
        pair: RateArgs,
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Daily rates over a date range
    Series {
        #[command(flatten)]
        pair: RateArgs,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
    /// Convert an amount
    Convert {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: Decimal,
    },
    /// List the currency catalog
    Currencies,
    /// Provider descriptor management
    Providers {
        #[command(subcommand)]
        action: ProviderCommands,
    },
    /// Check API health
    Health,
}

#[derive(clap::Args)]
struct RateArgs {
    /// Base currency (server default when omitted)
    #[arg(long)]
    base: Option<String>,
    /// Target currencies, comma-separated (every known code when omitted)
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,
}

impl RateArgs {
    fn symbols(&self) -> Vec<&str> {
        self.symbols
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Subcommand)]
enum ProviderCommands {
    /// List provider descriptors
    List,
    /// Change a provider's priority or active flag
    Set {
        /// Descriptor name, e.g. CurrencyBeacon
        name: String,
        #[arg(long)]
        priority: Option<i32>,
        #[arg(long)]
        active: Option<bool>,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = RatesClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Latest { pair } => {
            let rates = client.latest(pair.base.as_deref(), &pair.symbols()).await?;
            print_json(&rates)?;
        }

        Commands::Historical { pair, date } => {
            let rates = client
                .historical(pair.base.as_deref(), &pair.symbols(), date)
                .await?;
            print_json(&rates)?;
        }

        Commands::Series { pair, start, end } => {
            let series = client
                .series(pair.base.as_deref(), &pair.symbols(), start, end)
                .await?;
            print_json(&series)?;
        }

        Commands::Convert { from, to, amount } => {
            let conversion = client.convert(&from, &to, amount).await?;
            print_json(&conversion)?;
        }

        Commands::Currencies => {
            let currencies = client.currencies().await?;
            print_json(&currencies)?;
        }

        Commands::Providers { action } => match action {
            ProviderCommands::List => {
                let providers = client.providers().await?;
                print_json(&providers)?;
            }
            ProviderCommands::Set {
                name,
                priority,
                active,
            } => {
                if priority.is_none() && active.is_none() {
                    anyhow::bail!("Nothing to change: pass --priority and/or --active");
                }
                let req = UpdateProviderRequest {
                    priority,
                    is_active: active,
                };
                let status = client.update_provider(&name, &req).await?;
                print_json(&status)?;
            }
        },
    }

    Ok(())
}
