//! Canonical rate shapes returned to callers.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::currency::CurrencyCode;

/// Decimal places carried by a rate.
pub const RATE_DECIMALS: u32 = 6;

/// Decimal places carried by a converted amount.
pub const AMOUNT_DECIMALS: u32 = 2;

/// Longest span, in days between first and last day, a series may cover.
pub const MAX_SERIES_DAYS: i64 = 366;

/// Canonical rate mapping: target code to rate against the base.
pub type RateMap = BTreeMap<CurrencyCode, Decimal>;

/// Canonical time series: `YYYY-MM-DD` to the rates of that day.
pub type RateSeries = BTreeMap<String, RateMap>;

pub(crate) fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Result of converting an amount from `base` into `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Conversion {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    /// Amount expressed in the base currency
    #[schema(value_type = f64, example = 100.0)]
    pub amount: Decimal,
    /// Rate used, 6 decimals. Absent when it cannot be derived.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>, example = 1.08)]
    pub rate: Option<Decimal>,
    /// Amount expressed in the target currency, 2 decimals
    #[schema(value_type = f64, example = 108.0)]
    pub converted_amount: Decimal,
}

impl Conversion {
    /// Builds a conversion from a known rate.
    ///
    /// Returns `None` for rates that are not positive once rounded, or when
    /// the product overflows.
    pub fn from_rate(
        base: CurrencyCode,
        target: CurrencyCode,
        amount: Decimal,
        rate: Decimal,
    ) -> Option<Self> {
        let rate = round_rate(rate);
        if rate <= Decimal::ZERO {
            return None;
        }
        let converted = amount.checked_mul(rate)?;
        Some(Self {
            base,
            target,
            amount,
            rate: Some(rate),
            converted_amount: round_amount(converted),
        })
    }

    /// Builds a conversion when only the converted amount is known.
    ///
    /// The rate is derived as `converted / amount` unless `amount` is zero.
    /// Returns `None` when a non-zero amount yields a rate that rounds to
    /// zero or below.
    pub fn from_converted(
        base: CurrencyCode,
        target: CurrencyCode,
        amount: Decimal,
        converted: Decimal,
    ) -> Option<Self> {
        if converted < Decimal::ZERO {
            return None;
        }
        let rate = if amount.is_zero() {
            None
        } else {
            let rate = round_rate(converted.checked_div(amount)?);
            if rate <= Decimal::ZERO {
                return None;
            }
            Some(rate)
        };
        Some(Self {
            base,
            target,
            amount,
            rate,
            converted_amount: round_amount(converted),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn eur() -> CurrencyCode {
        CurrencyCode::parse("EUR").unwrap()
    }

    #[test]
    fn test_conversion_arithmetic() {
        let conversion = Conversion::from_rate(eur(), usd(), dec!(100), dec!(1.08)).unwrap();
        assert_eq!(conversion.converted_amount, dec!(108.00));
        assert_eq!(conversion.rate, Some(dec!(1.08)));
    }

    #[test]
    fn test_rate_rounded_to_six_places() {
        let conversion =
            Conversion::from_rate(eur(), usd(), dec!(10), dec!(1.0812345678)).unwrap();
        assert_eq!(conversion.rate, Some(dec!(1.081235)));
        assert_eq!(conversion.converted_amount, dec!(10.81));
    }

    #[test]
    fn test_converted_amount_midpoint_rounds_away_from_zero() {
        let conversion = Conversion::from_rate(eur(), usd(), dec!(1), dec!(0.125)).unwrap();
        assert_eq!(conversion.converted_amount, dec!(0.13));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        assert!(Conversion::from_rate(eur(), usd(), dec!(100), dec!(0)).is_none());
        assert!(Conversion::from_rate(eur(), usd(), dec!(100), dec!(-1.2)).is_none());
        assert!(Conversion::from_rate(eur(), usd(), dec!(100), dec!(0.0000004)).is_none());
    }

    #[test]
    fn test_zero_converted_amount_has_no_usable_rate() {
        assert!(Conversion::from_converted(eur(), usd(), dec!(100), dec!(0)).is_none());
        assert!(Conversion::from_converted(eur(), usd(), dec!(100), dec!(0.00001)).is_none());
    }

    #[test]
    fn test_rate_derived_from_converted_amount() {
        let conversion = Conversion::from_converted(eur(), usd(), dec!(50), dec!(54.3)).unwrap();
        assert_eq!(conversion.rate, Some(dec!(1.086)));
        assert_eq!(conversion.converted_amount, dec!(54.30));
    }

    #[test]
    fn test_zero_amount_has_no_derived_rate() {
        let conversion = Conversion::from_converted(eur(), usd(), dec!(0), dec!(0)).unwrap();
        assert_eq!(conversion.rate, None);
        assert_eq!(conversion.converted_amount, dec!(0));
    }
}
