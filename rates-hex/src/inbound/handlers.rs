//! HTTP request handlers.
//!
//! Query parameters are validated here, before anything reaches the
//! resolver: unknown codes, malformed dates and bad amounts are 400s.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use rates_types::domain::MAX_SERIES_DAYS;
use rates_types::normalize::format_date;
use rates_types::{
    AppError, ConvertQuery, CurrencyCode, HistoricalRatesQuery, HistoricalRatesResponse,
    LatestRatesQuery, LatestRatesResponse, RateSeriesQuery, RateSeriesResponse, RatesRepository,
    UpdateProviderRequest,
};

use crate::RateService;

/// Application state shared across handlers.
pub struct AppState<R: RatesRepository> {
    pub service: RateService<R>,
    /// Base used when a request names none; resolved once at startup.
    pub default_base: CurrencyCode,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl<E: Into<AppError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameter validation
// ─────────────────────────────────────────────────────────────────────────────

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Parameter '{}' is required.", name)))
}

fn known_code(raw: &str, known: &[CurrencyCode]) -> Result<CurrencyCode, AppError> {
    let code = CurrencyCode::parse(raw)?;
    if known.contains(&code) {
        Ok(code)
    } else {
        Err(AppError::BadRequest(format!("Unknown currency: {}", code)))
    }
}

fn parse_date(raw: &str, name: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid date format for '{}'. Use YYYY-MM-DD.",
            name
        ))
    })
}

fn parse_amount(raw: &str) -> Result<Decimal, AppError> {
    let amount = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| AppError::BadRequest(format!("Invalid amount: {}", raw)))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::BadRequest("Amount must not be negative".into()));
    }
    Ok(amount)
}

/// Resolves the base currency and target list of a rate query.
///
/// A missing base falls back to the configured default; missing or blank
/// symbols fall back to every known code except the base.
async fn base_and_targets<R: RatesRepository>(
    state: &AppState<R>,
    base: &Option<String>,
    symbols: &Option<String>,
) -> Result<(CurrencyCode, Vec<CurrencyCode>), AppError> {
    let known = state.service.known_codes().await?;

    let base = match base.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        Some(raw) => known_code(raw, &known)?,
        None => state.default_base.clone(),
    };

    let requested = CurrencyCode::parse_list(symbols.as_deref().unwrap_or_default())?;
    let targets = if requested.is_empty() {
        known.into_iter().filter(|c| *c != base).collect()
    } else {
        requested
            .iter()
            .map(|c| known_code(c.as_str(), &known))
            .collect::<Result<Vec<_>, _>>()?
    };

    if targets.is_empty() {
        return Err(AppError::BadRequest("No target currencies to quote".into()));
    }
    Ok((base, targets))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Latest rates.
#[tracing::instrument(skip(state))]
pub async fn latest_rates<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<LatestRatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (base, targets) = base_and_targets(&state, &query.base, &query.symbols).await?;

    let rates = state
        .service
        .get_exchange_rate(base.clone(), targets)
        .await?;
    Ok(Json(LatestRatesResponse { base, rates }))
}

/// Rates on a given day.
#[tracing::instrument(skip(state))]
pub async fn historical_rates<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<HistoricalRatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date(required(&query.date, "date")?, "date")?;
    let (base, targets) = base_and_targets(&state, &query.base, &query.symbols).await?;

    let rates = state
        .service
        .get_historical_exchange_rates(base.clone(), targets, date)
        .await?;
    Ok(Json(HistoricalRatesResponse {
        base,
        date: format_date(date),
        rates,
    }))
}

/// Rejects backward ranges and ranges longer than [`MAX_SERIES_DAYS`].
fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::BadRequest(
            "'start_date' must not be after 'end_date'".into(),
        ));
    }
    if (end - start).num_days() > MAX_SERIES_DAYS {
        return Err(AppError::BadRequest(format!(
            "A series may span at most {} days",
            MAX_SERIES_DAYS
        )));
    }
    Ok(())
}

/// Daily rates over a date range.
#[tracing::instrument(skip(state))]
pub async fn rate_series<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<RateSeriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let start = parse_date(required(&query.start_date, "start_date")?, "start_date")?;
    let end = parse_date(required(&query.end_date, "end_date")?, "end_date")?;
    check_range(start, end)?;
    let (base, targets) = base_and_targets(&state, &query.base, &query.symbols).await?;

    let list = state
        .service
        .get_exchange_rates_list(base.clone(), targets, start, end)
        .await?;
    Ok(Json(RateSeriesResponse { base, list }))
}

/// Convert an amount between two currencies.
#[tracing::instrument(skip(state))]
pub async fn convert<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let from = required(&query.from, "from")?;
    let to = required(&query.to, "to")?;
    let amount = parse_amount(required(&query.amount, "amount")?)?;

    let known = state.service.known_codes().await?;
    let base = known_code(from, &known)?;
    let target = known_code(to, &known)?;

    let conversion = state
        .service
        .convert_currency(base, target, amount)
        .await?;
    Ok(Json(conversion))
}

/// List the currency catalog.
#[tracing::instrument(skip(state))]
pub async fn list_currencies<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let currencies = state.service.list_currencies().await?;
    Ok(Json(currencies))
}

/// List provider descriptors.
#[tracing::instrument(skip(state))]
pub async fn list_providers<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let providers = state.service.list_providers().await?;
    Ok(Json(providers))
}

/// Edit a provider descriptor.
#[tracing::instrument(skip(state), fields(provider = %name))]
pub async fn update_provider<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(name): Path<String>,
    Json(req): Json<UpdateProviderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.service.update_provider(&name, req).await?;
    Ok(Json(status))
}
