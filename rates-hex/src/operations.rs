//! Resolver operations.
//!
//! Each rate lookup is a value implementing [`Operation`]: it knows how to
//! call one provider and normalize what comes back. The resolver loop in
//! [`RateService`](crate::RateService) is written once against this trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use rates_types::normalize::{normalize_conversion, normalize_rates, normalize_series};
use rates_types::{
    Conversion, CurrencyCode, ProviderError, ProviderResult, RateMap, RateProvider, RateSeries,
};

/// One provider call plus its normalization.
///
/// `invoke` returns [`ProviderError::Empty`] when the provider answered but
/// nothing usable survived normalization, so the resolver moves on.
#[async_trait]
pub trait Operation: Send + Sync {
    type Output: Send;

    /// Short label used in logs.
    fn label(&self) -> &'static str;

    async fn invoke(&self, provider: &dyn RateProvider) -> ProviderResult<Self::Output>;
}

fn non_empty_rates(rates: RateMap) -> ProviderResult<RateMap> {
    if rates.is_empty() {
        Err(ProviderError::Empty)
    } else {
        Ok(rates)
    }
}

/// Spot rates for a base against a set of targets.
#[derive(Debug, Clone)]
pub struct LatestRates {
    pub base: CurrencyCode,
    pub targets: Vec<CurrencyCode>,
}

#[async_trait]
impl Operation for LatestRates {
    type Output = RateMap;

    fn label(&self) -> &'static str {
        "latest"
    }

    async fn invoke(&self, provider: &dyn RateProvider) -> ProviderResult<RateMap> {
        let payload = provider.spot_rate(&self.base, &self.targets, None).await?;
        non_empty_rates(normalize_rates(payload))
    }
}

/// Rates for a single past day.
#[derive(Debug, Clone)]
pub struct HistoricalRates {
    pub base: CurrencyCode,
    pub targets: Vec<CurrencyCode>,
    pub date: NaiveDate,
}

#[async_trait]
impl Operation for HistoricalRates {
    type Output = RateMap;

    fn label(&self) -> &'static str {
        "historical"
    }

    async fn invoke(&self, provider: &dyn RateProvider) -> ProviderResult<RateMap> {
        let payload = provider
            .historical_rate(&self.base, &self.targets, self.date)
            .await?;
        non_empty_rates(normalize_rates(payload))
    }
}

/// Daily rates over an inclusive date range, fetched as one provider call.
#[derive(Debug, Clone)]
pub struct RangedSeries {
    pub base: CurrencyCode,
    pub targets: Vec<CurrencyCode>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[async_trait]
impl Operation for RangedSeries {
    type Output = RateSeries;

    fn label(&self) -> &'static str {
        "series"
    }

    async fn invoke(&self, provider: &dyn RateProvider) -> ProviderResult<RateSeries> {
        let payload = provider
            .ranged_series(&self.base, &self.targets, self.start, self.end)
            .await?;
        let series = normalize_series(payload);
        if series.is_empty() {
            Err(ProviderError::Empty)
        } else {
            Ok(series)
        }
    }
}

/// Conversion of an amount from one currency into another.
#[derive(Debug, Clone)]
pub struct ConvertAmount {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: Decimal,
}

#[async_trait]
impl Operation for ConvertAmount {
    type Output = Conversion;

    fn label(&self) -> &'static str {
        "convert"
    }

    async fn invoke(&self, provider: &dyn RateProvider) -> ProviderResult<Conversion> {
        let payload = provider
            .convert(&self.base, &self.target, self.amount)
            .await?;
        normalize_conversion(self.base.clone(), self.target.clone(), self.amount, payload)
            .ok_or(ProviderError::Empty)
    }
}
