//! Response normalizer.
//!
//! Providers answer in whatever shape their upstream uses. The payload enums
//! below accept the shapes seen in practice and the `normalize_*` functions
//! fold them into the canonical [`RateMap`], [`RateSeries`] and [`Conversion`]
//! so callers of the resolver always see one schema, whichever provider won.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Conversion, CurrencyCode, RateMap, RateSeries};

/// Raw rates for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatePayload {
    /// `{"USD": 1.08, "GBP": 0.83}`; `null` values mean "no rate".
    Mapping(BTreeMap<String, Option<Decimal>>),
    /// `[{"code": "USD", "rate": 1.08}]`
    Records(Vec<RateRecord>),
}

/// One `{code, rate}` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(alias = "currency", alias = "symbol")]
    pub code: String,
    #[serde(alias = "value")]
    pub rate: Option<Decimal>,
}

impl RateRecord {
    pub fn new(code: impl Into<String>, rate: Decimal) -> Self {
        Self {
            code: code.into(),
            rate: Some(rate),
        }
    }
}

impl From<RateMap> for RatePayload {
    fn from(map: RateMap) -> Self {
        RatePayload::Mapping(
            map.into_iter()
                .map(|(code, rate)| (code.into(), Some(rate)))
                .collect(),
        )
    }
}

/// Raw rates over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesPayload {
    /// `{"2025-02-15": {...}, "2025-02-16": [...]}`
    Mapping(BTreeMap<String, RatePayload>),
    /// `[{"date": "2025-02-15", "rates": {...}}]`, `date` may be unix seconds.
    Records(Vec<SeriesRecord>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(alias = "day", alias = "timestamp")]
    pub date: serde_json::Value,
    pub rates: RatePayload,
}

/// Raw conversion answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversionPayload {
    /// Just the converted amount.
    Amount(Decimal),
    /// A record carrying the rate, the converted amount, or both.
    Detailed {
        #[serde(default)]
        rate: Option<Decimal>,
        #[serde(default, alias = "value")]
        converted_amount: Option<Decimal>,
    },
}

/// Folds a rate payload into a canonical map.
///
/// Codes are upper-cased. Entries with an invalid code or a missing,
/// zero or negative rate are dropped. Later duplicates win.
pub fn normalize_rates(payload: RatePayload) -> RateMap {
    let entries: Vec<(String, Option<Decimal>)> = match payload {
        RatePayload::Mapping(map) => map.into_iter().collect(),
        RatePayload::Records(records) => records.into_iter().map(|r| (r.code, r.rate)).collect(),
    };

    let mut rates = RateMap::new();
    for (code, rate) in entries {
        let (Ok(code), Some(rate)) = (CurrencyCode::parse(&code), rate) else {
            continue;
        };
        if rate > Decimal::ZERO {
            rates.insert(code, rate);
        }
    }
    rates
}

/// Folds a series payload into a canonical series keyed by `YYYY-MM-DD`.
///
/// Keys that are not recognizable dates and days without rates are dropped.
pub fn normalize_series(payload: SeriesPayload) -> RateSeries {
    let days: Vec<(Option<NaiveDate>, RatePayload)> = match payload {
        SeriesPayload::Mapping(map) => map
            .into_iter()
            .map(|(key, rates)| (parse_date_key(&key), rates))
            .collect(),
        SeriesPayload::Records(records) => records
            .into_iter()
            .map(|r| (date_from_value(&r.date), r.rates))
            .collect(),
    };

    let mut series = RateSeries::new();
    for (date, rates) in days {
        let Some(date) = date else { continue };
        let rates = normalize_rates(rates);
        if !rates.is_empty() {
            series.insert(format_date(date), rates);
        }
    }
    series
}

/// Turns a conversion payload into a [`Conversion`].
///
/// An explicit rate takes precedence; otherwise the rate is derived from the
/// converted amount.
pub fn normalize_conversion(
    base: CurrencyCode,
    target: CurrencyCode,
    amount: Decimal,
    payload: ConversionPayload,
) -> Option<Conversion> {
    match payload {
        ConversionPayload::Amount(converted) => {
            Conversion::from_converted(base, target, amount, converted)
        }
        ConversionPayload::Detailed {
            rate: Some(rate), ..
        } => Conversion::from_rate(base, target, amount, rate),
        ConversionPayload::Detailed {
            rate: None,
            converted_amount: Some(converted),
        } => Conversion::from_converted(base, target, amount, converted),
        ConversionPayload::Detailed { .. } => None,
    }
}

/// Formats a date the way every series key is exposed.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses the date representations providers use for series keys.
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.date_naive())
}

fn date_from_value(value: &serde_json::Value) -> Option<NaiveDate> {
    match value {
        serde_json::Value::String(s) => parse_date_key(s),
        serde_json::Value::Number(n) => parse_date_key(&n.to_string()),
        _ => None,
    }
}
