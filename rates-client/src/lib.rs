//! # Rates Client SDK
//!
//! A typed Rust client for the exchange-rate API.

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use rates_types::normalize::format_date;
use rates_types::{
    Conversion, Currency, HistoricalRatesResponse, LatestRatesResponse, ProviderStatus,
    RateSeriesResponse, UpdateProviderRequest,
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exchange-rate API client.
pub struct RatesClient {
    base_url: String,
    http: Client,
}

type Params = Vec<(&'static str, String)>;

/// Base and symbols shared by every rate query; absent values are omitted.
fn rate_params(base: Option<&str>, symbols: &[&str]) -> Params {
    let mut params = Params::new();
    if let Some(base) = base {
        params.push(("base", base.to_string()));
    }
    if !symbols.is_empty() {
        params.push(("symbols", symbols.join(",")));
    }
    params
}

impl RatesClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Uses a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Latest rates. `None` base and empty symbols use the server defaults.
    pub async fn latest(
        &self,
        base: Option<&str>,
        symbols: &[&str],
    ) -> Result<LatestRatesResponse, ClientError> {
        self.get("/api/currency-rates/latest", &rate_params(base, symbols))
            .await
    }

    /// Rates on a given day.
    pub async fn historical(
        &self,
        base: Option<&str>,
        symbols: &[&str],
        date: NaiveDate,
    ) -> Result<HistoricalRatesResponse, ClientError> {
        let mut params = rate_params(base, symbols);
        params.push(("date", format_date(date)));
        self.get("/api/currency-rates/historical", &params).await
    }

    /// Daily rates from `start` to `end` inclusive.
    pub async fn series(
        &self,
        base: Option<&str>,
        symbols: &[&str],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeriesResponse, ClientError> {
        let mut params = rate_params(base, symbols);
        params.push(("start_date", format_date(start)));
        params.push(("end_date", format_date(end)));
        self.get("/api/currency-rates/list", &params).await
    }

    /// Converts an amount between two currencies.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Conversion, ClientError> {
        let params: Params = vec![
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("amount", amount.to_string()),
        ];
        self.get("/api/convert", &params).await
    }

    /// Lists the currency catalog.
    pub async fn currencies(&self) -> Result<Vec<Currency>, ClientError> {
        self.get("/api/currencies", &Params::new()).await
    }

    /// Lists provider descriptors.
    pub async fn providers(&self) -> Result<Vec<ProviderStatus>, ClientError> {
        self.get("/api/providers", &Params::new()).await
    }

    /// Changes a provider's priority and/or active flag.
    pub async fn update_provider(
        &self,
        name: &str,
        req: &UpdateProviderRequest,
    ) -> Result<ProviderStatus, ClientError> {
        let resp = self
            .http
            .put(format!("{}/api/providers/{}", self.base_url, name))
            .json(req)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RatesClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = RatesClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_rate_params_omit_defaults() {
        assert!(rate_params(None, &[]).is_empty());

        let params = rate_params(Some("EUR"), &["USD", "GBP"]);
        assert_eq!(
            params,
            vec![("base", "EUR".to_string()), ("symbols", "USD,GBP".to_string())]
        );
    }
}
