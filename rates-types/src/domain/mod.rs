//! Domain models for the exchange-rate service.

pub mod currency;
pub mod provider;
pub mod quote;

pub use currency::{Currency, CurrencyCode};
pub use provider::{ProviderDescriptor, ProviderKind};
pub use quote::{
    AMOUNT_DECIMALS, Conversion, MAX_SERIES_DAYS, RATE_DECIMALS, RateMap, RateSeries,
};
