//! Provider identities and the persisted descriptors that order them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Closed set of provider implementations the service can build.
///
/// Descriptor names are mapped onto this enum; there is no runtime lookup of
/// implementations by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProviderKind {
    /// CurrencyBeacon remote API.
    CurrencyBeacon,
    /// Random rates with no IO, used for testing and as a last resort.
    Synthetic,
}

impl ProviderKind {
    pub fn all() -> &'static [ProviderKind] {
        &[ProviderKind::CurrencyBeacon, ProviderKind::Synthetic]
    }

    /// Canonical descriptor name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::CurrencyBeacon => "CurrencyBeacon",
            ProviderKind::Synthetic => "Mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    /// Matches descriptor names case-insensitively, ignoring whitespace and a
    /// trailing `Provider` suffix (`"Currency Beacon"`, `"MockProvider"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let key = squashed.strip_suffix("provider").unwrap_or(&squashed);

        match key {
            "currencybeacon" => Ok(ProviderKind::CurrencyBeacon),
            "mock" | "mockexchangerate" | "synthetic" => Ok(ProviderKind::Synthetic),
            _ => Err(DomainError::UnknownProvider(s.to_string())),
        }
    }
}

/// A provider entry as stored in the descriptor store.
///
/// Lower `priority` is tried first. `position` is the store insertion order and
/// breaks priority ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProviderDescriptor {
    #[schema(example = "CurrencyBeacon")]
    pub name: String,
    #[schema(example = 1)]
    pub priority: i32,
    pub is_active: bool,
    #[serde(skip)]
    pub position: i64,
}

impl ProviderDescriptor {
    pub fn new(name: impl Into<String>, priority: i32, is_active: bool) -> Self {
        Self {
            name: name.into(),
            priority,
            is_active,
            position: 0,
        }
    }

    pub fn at_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    /// The implementation this descriptor names, if any.
    pub fn kind(&self) -> Result<ProviderKind, DomainError> {
        self.name.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_descriptor_names() {
        assert_eq!(
            "CurrencyBeacon".parse::<ProviderKind>().unwrap(),
            ProviderKind::CurrencyBeacon
        );
        assert_eq!(
            "Currency Beacon".parse::<ProviderKind>().unwrap(),
            ProviderKind::CurrencyBeacon
        );
        assert_eq!("Mock".parse::<ProviderKind>().unwrap(), ProviderKind::Synthetic);
        assert_eq!(
            "MockExchangeRateProvider".parse::<ProviderKind>().unwrap(),
            ProviderKind::Synthetic
        );
    }

    #[test]
    fn test_unknown_kind() {
        let result = "OpenExchange".parse::<ProviderKind>();
        assert!(matches!(result, Err(DomainError::UnknownProvider(_))));
    }

    #[test]
    fn test_canonical_names_roundtrip() {
        for kind in ProviderKind::all() {
            assert_eq!(kind.name().parse::<ProviderKind>().unwrap(), *kind);
        }
    }
}
