//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CurrencyCode, ProviderDescriptor, ProviderKind, RateMap, RateSeries};

// ─────────────────────────────────────────────────────────────────────────────
// Rate queries
// ─────────────────────────────────────────────────────────────────────────────
//
// Query fields stay as raw strings so the HTTP layer can report exactly which
// parameter is missing or malformed.

/// Query for the latest rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LatestRatesQuery {
    /// Base currency; defaults to the configured base
    #[param(example = "EUR")]
    pub base: Option<String>,
    /// Comma separated target codes; defaults to every known code
    #[param(example = "USD,GBP,CHF")]
    pub symbols: Option<String>,
}

/// Query for rates on a given day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoricalRatesQuery {
    #[param(example = "EUR")]
    pub base: Option<String>,
    #[param(example = "USD,GBP,CHF")]
    pub symbols: Option<String>,
    /// Day in `YYYY-MM-DD`
    #[param(example = "2025-02-15")]
    pub date: Option<String>,
}

/// Query for a daily series between two dates (inclusive).
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RateSeriesQuery {
    #[param(example = "EUR")]
    pub base: Option<String>,
    #[param(example = "USD,GBP,CHF")]
    pub symbols: Option<String>,
    #[param(example = "2025-02-15")]
    pub start_date: Option<String>,
    #[param(example = "2025-02-20")]
    pub end_date: Option<String>,
}

/// Query for an amount conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertQuery {
    #[param(example = "USD")]
    pub from: Option<String>,
    #[param(example = "EUR")]
    pub to: Option<String>,
    /// Non-negative decimal amount
    #[param(example = "100")]
    pub amount: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate responses
// ─────────────────────────────────────────────────────────────────────────────

/// Latest rates against a base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatestRatesResponse {
    pub base: CurrencyCode,
    #[schema(value_type = BTreeMap<String, f64>, example = json!({"USD": 1.08, "GBP": 0.83}))]
    pub rates: RateMap,
}

/// Rates against a base currency on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoricalRatesResponse {
    pub base: CurrencyCode,
    #[schema(example = "2025-02-15")]
    pub date: String,
    #[schema(value_type = BTreeMap<String, f64>, example = json!({"USD": 1.04}))]
    pub rates: RateMap,
}

/// Daily rates keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateSeriesResponse {
    pub base: CurrencyCode,
    #[schema(
        value_type = BTreeMap<String, BTreeMap<String, f64>>,
        example = json!({"2025-02-15": {"USD": 1.04}, "2025-02-16": {"USD": 1.05}})
    )]
    pub list: RateSeries,
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A provider descriptor together with what the registry makes of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderStatus {
    #[schema(example = "CurrencyBeacon")]
    pub name: String,
    pub priority: i32,
    pub is_active: bool,
    /// Implementation the name maps to, if any
    pub kind: Option<ProviderKind>,
    /// Whether an instance of that implementation is registered
    pub resolvable: bool,
}

impl ProviderStatus {
    pub fn new(descriptor: ProviderDescriptor, kind: Option<ProviderKind>, resolvable: bool) -> Self {
        Self {
            name: descriptor.name,
            priority: descriptor.priority,
            is_active: descriptor.is_active,
            kind,
            resolvable,
        }
    }
}

/// Request to edit a provider descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProviderRequest {
    #[schema(example = 2)]
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}
