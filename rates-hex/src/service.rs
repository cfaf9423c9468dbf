//! Exchange Rate Application Service
//!
//! Orchestrates the provider fallback chain and the descriptor store.
//! Contains NO HTTP logic; callers map the returned errors onto responses.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use rates_types::{
    AppError, Conversion, Currency, CurrencyCode, ProviderDescriptor, ProviderError,
    ProviderStatus, RateMap, RateSeries, RatesRepository, RepoError, ResolveError,
    UpdateProviderRequest,
};

use crate::operations::{ConvertAmount, HistoricalRates, LatestRates, Operation, RangedSeries};
use crate::registry::{ProviderRegistry, resolve_active_providers};

/// How long a single provider may take before the resolver moves on.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Application service for exchange-rate lookups.
///
/// Generic over `R: RatesRepository`; the descriptor store is injected at
/// compile time, provider instances at startup through the registry.
pub struct RateService<R: RatesRepository> {
    repo: R,
    registry: ProviderRegistry,
    provider_timeout: Duration,
}

impl<R: RatesRepository> RateService<R> {
    pub fn new(repo: R, registry: ProviderRegistry) -> Self {
        Self {
            repo,
            registry,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, provider_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Fallback resolution
    // ─────────────────────────────────────────────────────────────────────────────

    /// Runs `op` against each resolved provider in priority order and returns
    /// the first usable result. Providers after the winner are never called.
    async fn fetch_from_providers<O: Operation>(&self, op: &O) -> Result<O::Output, ResolveError> {
        let chain = resolve_active_providers(&self.repo, &self.registry).await;
        if chain.is_empty() {
            tracing::warn!(operation = op.label(), "No exchange rate providers available");
            return Err(ResolveError::NoProviders);
        }

        for candidate in &chain {
            tracing::debug!(
                operation = op.label(),
                provider = %candidate.name,
                priority = candidate.priority,
                "Trying exchange rate provider"
            );

            let outcome = tokio::time::timeout(
                self.provider_timeout,
                op.invoke(candidate.provider.as_ref()),
            )
            .await
            .unwrap_or(Err(ProviderError::Timeout(self.provider_timeout)));

            match outcome {
                Ok(output) => {
                    tracing::info!(
                        operation = op.label(),
                        provider = %candidate.name,
                        "Exchange rate provider succeeded"
                    );
                    return Ok(output);
                }
                Err(e) => {
                    tracing::warn!(
                        operation = op.label(),
                        provider = %candidate.name,
                        error = %e,
                        "Exchange rate provider failed, trying next"
                    );
                }
            }
        }

        Err(ResolveError::Exhausted {
            attempts: chain.len(),
        })
    }

    /// Latest rates for `base` against `targets`.
    pub async fn get_exchange_rate(
        &self,
        base: CurrencyCode,
        targets: Vec<CurrencyCode>,
    ) -> Result<RateMap, ResolveError> {
        self.fetch_from_providers(&LatestRates { base, targets })
            .await
    }

    /// Rates on `date` for `base` against `targets`.
    pub async fn get_historical_exchange_rates(
        &self,
        base: CurrencyCode,
        targets: Vec<CurrencyCode>,
        date: NaiveDate,
    ) -> Result<RateMap, ResolveError> {
        self.fetch_from_providers(&HistoricalRates {
            base,
            targets,
            date,
        })
        .await
    }

    /// Daily rates from `start` to `end` inclusive, keyed by `YYYY-MM-DD`.
    pub async fn get_exchange_rates_list(
        &self,
        base: CurrencyCode,
        targets: Vec<CurrencyCode>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, ResolveError> {
        self.fetch_from_providers(&RangedSeries {
            base,
            targets,
            start,
            end,
        })
        .await
    }

    /// Converts `amount` of `base` into `target`.
    pub async fn convert_currency(
        &self,
        base: CurrencyCode,
        target: CurrencyCode,
        amount: Decimal,
    ) -> Result<Conversion, ResolveError> {
        self.fetch_from_providers(&ConvertAmount {
            base,
            target,
            amount,
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Catalog and descriptors
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists the currency catalog.
    pub async fn list_currencies(&self) -> Result<Vec<Currency>, AppError> {
        self.repo.list_currencies().await.map_err(Into::into)
    }

    /// Codes of every currency in the catalog.
    pub async fn known_codes(&self) -> Result<Vec<CurrencyCode>, AppError> {
        Ok(self
            .list_currencies()
            .await?
            .into_iter()
            .map(|c| c.code)
            .collect())
    }

    /// The catalog's default currency, if one is flagged.
    pub async fn default_currency(&self) -> Result<Option<CurrencyCode>, AppError> {
        Ok(self.repo.default_currency().await?.map(|c| c.code))
    }

    /// Lists descriptors in store order with what the registry makes of them.
    pub async fn list_providers(&self) -> Result<Vec<ProviderStatus>, AppError> {
        let descriptors = self.repo.list_providers().await?;
        Ok(descriptors
            .into_iter()
            .map(|descriptor| self.status_of(descriptor))
            .collect())
    }

    /// Changes a descriptor's priority and/or active flag.
    pub async fn update_provider(
        &self,
        name: &str,
        req: UpdateProviderRequest,
    ) -> Result<ProviderStatus, AppError> {
        if req.priority.is_none() && req.is_active.is_none() {
            return Err(AppError::BadRequest(
                "Provide at least one of 'priority' or 'is_active'".into(),
            ));
        }

        let descriptor = self
            .repo
            .update_provider(name, req.priority, req.is_active)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => {
                    AppError::NotFound(format!("Provider {}", name))
                }
                other => other.into(),
            })?;

        Ok(self.status_of(descriptor))
    }

    fn status_of(&self, descriptor: ProviderDescriptor) -> ProviderStatus {
        let kind = descriptor.kind().ok();
        let resolvable = kind.is_some_and(|k| self.registry.contains(k));
        ProviderStatus::new(descriptor, kind, resolvable)
    }
}
