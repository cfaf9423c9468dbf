//! Synthetic provider with random rates.
//!
//! Used in development, in tests, and as the last entry of a fallback chain.
//! Shapes are stable; values are not.

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use rates_types::domain::RATE_DECIMALS;
use rates_types::normalize::format_date;
use rates_types::{
    ConversionPayload, CurrencyCode, ProviderKind, ProviderResult, RateMap, RatePayload,
    RateProvider, SeriesPayload,
};

/// Days generated between two yields back to the runtime.
const DAYS_PER_YIELD: usize = 64;

/// Lower and upper bound of generated rates, in millionths.
const MIN_RATE_MICROS: i64 = 500_000;
const MAX_RATE_MICROS: i64 = 1_500_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }

    fn random_rate() -> Decimal {
        let micros = rand::rng().random_range(MIN_RATE_MICROS..=MAX_RATE_MICROS);
        Decimal::new(micros, RATE_DECIMALS)
    }

    fn rates_for(base: &CurrencyCode, targets: &[CurrencyCode]) -> RateMap {
        targets
            .iter()
            .map(|target| {
                let rate = if target == base {
                    Decimal::ONE
                } else {
                    Self::random_rate()
                };
                (target.clone(), rate)
            })
            .collect()
    }
}

#[async_trait]
impl RateProvider for SyntheticProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Synthetic
    }

    async fn spot_rate(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        _as_of: Option<NaiveDate>,
    ) -> ProviderResult<RatePayload> {
        Ok(Self::rates_for(base, targets).into())
    }

    async fn historical_rate(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        _on_date: NaiveDate,
    ) -> ProviderResult<RatePayload> {
        Ok(Self::rates_for(base, targets).into())
    }

    /// Batches every day of the range into one in-memory payload.
    ///
    /// Yields to the runtime every few days so a long range stays
    /// cancellable by the caller's timeout.
    async fn ranged_series(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<SeriesPayload> {
        let mut days: BTreeMap<String, RatePayload> = BTreeMap::new();
        for (i, day) in start.iter_days().take_while(|day| *day <= end).enumerate() {
            if i > 0 && i % DAYS_PER_YIELD == 0 {
                tokio::task::yield_now().await;
            }
            days.insert(format_date(day), Self::rates_for(base, targets).into());
        }
        Ok(SeriesPayload::Mapping(days))
    }

    async fn convert(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        amount: Decimal,
    ) -> ProviderResult<ConversionPayload> {
        let rate = if base == target {
            Decimal::ONE
        } else {
            Self::random_rate()
        };
        Ok(ConversionPayload::Detailed {
            rate: Some(rate),
            converted_amount: amount.checked_mul(rate),
        })
    }
}
