//! OpenAPI document for the HTTP API.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use rates_types::domain::{Conversion, Currency, CurrencyCode, ProviderKind};
use rates_types::dto::{
    ConvertQuery, HistoricalRatesQuery, HistoricalRatesResponse, LatestRatesQuery,
    LatestRatesResponse, ProviderStatus, RateSeriesQuery, RateSeriesResponse,
    UpdateProviderRequest,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Parameter 'date' is required.")]
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
}

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Latest exchange rates
#[utoipa::path(
    get,
    path = "/api/currency-rates/latest",
    tag = "rates",
    params(LatestRatesQuery),
    responses(
        (status = 200, description = "Rates from the first provider that answered", body = LatestRatesResponse),
        (status = 400, description = "Unknown currency", body = ErrorBody),
        (status = 502, description = "Every provider failed", body = ErrorBody),
        (status = 503, description = "No provider is active", body = ErrorBody)
    )
)]
async fn latest_rates() {}

/// Exchange rates on a given day
#[utoipa::path(
    get,
    path = "/api/currency-rates/historical",
    tag = "rates",
    params(HistoricalRatesQuery),
    responses(
        (status = 200, description = "Rates for the requested day", body = HistoricalRatesResponse),
        (status = 400, description = "Missing or malformed date, or unknown currency", body = ErrorBody),
        (status = 502, description = "Every provider failed", body = ErrorBody),
        (status = 503, description = "No provider is active", body = ErrorBody)
    )
)]
async fn historical_rates() {}

/// Daily exchange rates over a date range
#[utoipa::path(
    get,
    path = "/api/currency-rates/list",
    tag = "rates",
    params(RateSeriesQuery),
    responses(
        (status = 200, description = "Rates keyed by YYYY-MM-DD", body = RateSeriesResponse),
        (status = 400, description = "Missing or malformed dates, or start after end", body = ErrorBody),
        (status = 502, description = "Every provider failed", body = ErrorBody),
        (status = 503, description = "No provider is active", body = ErrorBody)
    )
)]
async fn rate_series() {}

/// Convert an amount
#[utoipa::path(
    get,
    path = "/api/convert",
    tag = "rates",
    params(ConvertQuery),
    responses(
        (status = 200, description = "Converted amount", body = Conversion),
        (status = 400, description = "Missing parameter, unknown currency or bad amount", body = ErrorBody),
        (status = 502, description = "Every provider failed", body = ErrorBody),
        (status = 503, description = "No provider is active", body = ErrorBody)
    )
)]
async fn convert() {}

/// List the currency catalog
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "catalog",
    responses(
        (status = 200, description = "Known currencies", body = Vec<Currency>)
    )
)]
async fn list_currencies() {}

/// List provider descriptors
#[utoipa::path(
    get,
    path = "/api/providers",
    tag = "providers",
    responses(
        (status = 200, description = "Descriptors in insertion order", body = Vec<ProviderStatus>)
    )
)]
async fn list_providers() {}

/// Change a provider's priority or active flag
#[utoipa::path(
    put,
    path = "/api/providers/{name}",
    tag = "providers",
    params(
        ("name" = String, Path, description = "Descriptor name, e.g. CurrencyBeacon")
    ),
    request_body = UpdateProviderRequest,
    responses(
        (status = 200, description = "Updated descriptor", body = ProviderStatus),
        (status = 400, description = "Nothing to update", body = ErrorBody),
        (status = 404, description = "No descriptor with that name", body = ErrorBody)
    )
)]
async fn update_provider() {}

/// OpenAPI documentation for the exchange-rate API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Exchange Rate Service API",
        version = "1.0.0",
        description = "Latest, historical and ranged exchange rates plus amount conversion.\n\nEvery lookup walks the active providers in priority order and returns the first non-empty answer.",
        license(name = "MIT"),
    ),
    paths(
        health,
        latest_rates,
        historical_rates,
        rate_series,
        convert,
        list_currencies,
        list_providers,
        update_provider,
    ),
    components(
        schemas(
            CurrencyCode,
            Currency,
            Conversion,
            LatestRatesResponse,
            HistoricalRatesResponse,
            RateSeriesResponse,
            ProviderKind,
            ProviderStatus,
            UpdateProviderRequest,
            ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Exchange rate lookups and conversion"),
        (name = "catalog", description = "Currency catalog"),
        (name = "providers", description = "Provider descriptor management"),
    )
)]
pub struct ApiDoc;
