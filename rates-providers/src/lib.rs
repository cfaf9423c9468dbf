//! Exchange Rate Provider Adapters
//!
//! Concrete implementations of the [`RateProvider`] port:
//!
//! - [`CurrencyBeaconProvider`] - CurrencyBeacon v1 HTTP API, one request per call
//! - [`SyntheticProvider`] - random rates in `[0.5, 1.5]`, no IO
//!
//! # Example
//! ```no_run
//! use rates_providers::{CurrencyBeaconProvider, SyntheticProvider};
//! use rates_types::{CurrencyCode, RateProvider};
//!
//! # async fn demo() {
//! let beacon = CurrencyBeaconProvider::new("my-api-key");
//! let fallback = SyntheticProvider::new();
//!
//! let eur = CurrencyCode::parse("EUR").unwrap();
//! let usd = CurrencyCode::parse("USD").unwrap();
//! let rates = match beacon.spot_rate(&eur, &[usd.clone()], None).await {
//!     Ok(rates) => rates,
//!     Err(_) => fallback.spot_rate(&eur, &[usd], None).await.unwrap(),
//! };
//! # let _ = rates;
//! # }
//! ```
//!
//! [`RateProvider`]: rates_types::RateProvider

pub mod beacon;
pub mod synthetic;

pub use beacon::CurrencyBeaconProvider;
pub use synthetic::SyntheticProvider;
