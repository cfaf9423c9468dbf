//! Exchange rate provider port.
//!
//! Implementations can be HTTP clients, synthetic generators, etc.
//! Every operation reports failure through [`ProviderError`] instead of
//! panicking so the resolver can move on to the next provider.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{CurrencyCode, ProviderKind};
use crate::error::ProviderError;
use crate::normalize::{ConversionPayload, RatePayload, SeriesPayload};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> ProviderKind;

    /// Rates of `targets` against `base`; `as_of = None` means most recent.
    async fn spot_rate(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        as_of: Option<NaiveDate>,
    ) -> ProviderResult<RatePayload>;

    /// Rates of `targets` against `base` on a given day.
    async fn historical_rate(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        on_date: NaiveDate,
    ) -> ProviderResult<RatePayload>;

    /// Daily rates between `start` and `end` inclusive, as one operation.
    ///
    /// Range ordering is the caller's concern; a backward range yields an
    /// empty or provider-defined payload.
    async fn ranged_series(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<SeriesPayload>;

    /// Converts `amount` of `base` into `target`.
    async fn convert(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        amount: Decimal,
    ) -> ProviderResult<ConversionPayload>;
}
