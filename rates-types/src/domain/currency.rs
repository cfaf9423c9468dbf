//! Currency codes and currency reference data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::DomainError;

/// A three-letter uppercase currency identifier.
///
/// The set of recognized codes lives in the currency catalog; this type only
/// enforces the shape (three ASCII letters). Lowercase input is upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "EUR")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let code = raw.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrencyCode(raw.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Parses a comma separated list of codes (`"USD, gbp,CHF"`).
    ///
    /// Blank segments are ignored and duplicates keep their first position.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, DomainError> {
        let mut codes: Vec<Self> = Vec::new();
        for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let code = Self::parse(segment)?;
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Ok(codes)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins codes into the comma separated form upstream APIs expect.
    pub fn join(codes: &[CurrencyCode]) -> String {
        codes
            .iter()
            .map(CurrencyCode::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A currency known to the service (reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Currency {
    pub code: CurrencyCode,
    /// Display name
    #[schema(example = "Euro")]
    pub name: String,
    #[schema(example = "€")]
    pub symbol: String,
    /// Whether this currency is the catalog's default base currency
    pub is_default: bool,
}

impl Currency {
    pub fn new(code: CurrencyCode, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            symbol: symbol.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}
