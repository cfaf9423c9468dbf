//! CurrencyBeacon v1 API adapter.
//!
//! Every operation is exactly one GET request. Ranged series use the
//! `/timeseries` endpoint rather than one request per day.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use rates_types::normalize::format_date;
use rates_types::{
    ConversionPayload, CurrencyCode, ProviderError, ProviderKind, ProviderResult, RatePayload,
    RateProvider, SeriesPayload,
};

pub const CURRENCY_BEACON_API_URL: &str = "https://api.currencybeacon.com/v1";

/// Remote provider backed by the CurrencyBeacon API.
pub struct CurrencyBeaconProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CurrencyBeaconProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, CURRENCY_BEACON_API_URL)
    }

    /// Points the provider at another deployment of the API (or a stand-in).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> ProviderResult<Value> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(ProviderKind::CurrencyBeacon));
        }
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Requesting CurrencyBeacon {} with {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("CurrencyBeacon {} answered {}: {}", endpoint, status, body);
            return Err(ProviderError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", endpoint, e)))
    }

    async fn fetch_rates(
        &self,
        endpoint: &str,
        mut params: Vec<(&str, String)>,
        targets: &[CurrencyCode],
    ) -> ProviderResult<RatePayload> {
        if !targets.is_empty() {
            params.push(("symbols", CurrencyCode::join(targets)));
        }
        let body = self.get_json(endpoint, &params).await?;
        let rates = envelope_field(&body, "rates")
            .ok_or_else(|| ProviderError::Malformed(format!("{}: missing rates", endpoint)))?;
        serde_json::from_value(rates.clone())
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", endpoint, e)))
    }
}

/// Reads a field from the `response` envelope, falling back to the top level.
fn envelope_field<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    body.get("response")
        .and_then(|inner| inner.get(name))
        .or_else(|| body.get(name))
        .filter(|value| !value.is_null())
}

#[async_trait]
impl RateProvider for CurrencyBeaconProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::CurrencyBeacon
    }

    async fn spot_rate(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        as_of: Option<NaiveDate>,
    ) -> ProviderResult<RatePayload> {
        match as_of {
            Some(date) => self.historical_rate(base, targets, date).await,
            None => {
                self.fetch_rates("latest", vec![("base", base.to_string())], targets)
                    .await
            }
        }
    }

    async fn historical_rate(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        on_date: NaiveDate,
    ) -> ProviderResult<RatePayload> {
        let params = vec![("base", base.to_string()), ("date", format_date(on_date))];
        self.fetch_rates("historical", params, targets).await
    }

    async fn ranged_series(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<SeriesPayload> {
        let mut params = vec![
            ("base", base.to_string()),
            ("start_date", format_date(start)),
            ("end_date", format_date(end)),
        ];
        if !targets.is_empty() {
            params.push(("symbols", CurrencyCode::join(targets)));
        }

        let body = self.get_json("timeseries", &params).await?;
        // The series is the whole `response` object, keyed by day.
        let mut series = body.get("response").cloned().unwrap_or(body);
        if let Some(object) = series.as_object_mut() {
            object.remove("meta");
        }
        serde_json::from_value(series)
            .map_err(|e| ProviderError::Malformed(format!("timeseries: {}", e)))
    }

    async fn convert(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        amount: Decimal,
    ) -> ProviderResult<ConversionPayload> {
        let params = [
            ("from", base.to_string()),
            ("to", target.to_string()),
            ("amount", amount.to_string()),
        ];
        let body = self.get_json("convert", &params).await?;
        let value = envelope_field(&body, "value")
            .ok_or_else(|| ProviderError::Malformed("convert: missing value".into()))?;
        serde_json::from_value::<Decimal>(value.clone())
            .map(ConversionPayload::Amount)
            .map_err(|e| ProviderError::Malformed(format!("convert: {}", e)))
    }
}
