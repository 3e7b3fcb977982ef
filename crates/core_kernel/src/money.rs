//! Money types with precise decimal arithmetic
//!
//! Compensation and payment amounts are carried as `Money` so that no
//! floating-point value ever enters a calculation. Amounts are stored with
//! 4 decimal places internally and rounded to the currency's minor unit
//! for display.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    SGD,
    USD,
    EUR,
    JPY,
    CNY,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::SGD => "S$",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::JPY => "¥",
            Currency::CNY => "CN¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::SGD => "SGD",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::JPY => "JPY",
            Currency::CNY => "CNY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates Money from a whole number of major units (e.g. dollars)
    pub fn from_major(units: i64, currency: Currency) -> Self {
        Self::new(Decimal::from(units), currency)
    }

    /// Creates Money from a float received at a system boundary.
    ///
    /// Returns an error for NaN, infinities and values outside the decimal range.
    pub fn try_from_f64(amount: f64, currency: Currency) -> Result<Self, MoneyError> {
        Decimal::from_f64_retain(amount)
            .map(|d| Self::new(d, currency))
            .ok_or_else(|| MoneyError::InvalidAmount(amount.to_string()))
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the amount as a float for wire payloads that require one
    pub fn to_f64(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.amount.to_f64().unwrap_or_default()
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency))
            .ok_or(MoneyError::Overflow)
    }

    /// Multiplies by a whole number of units (e.g. completed coverage blocks)
    pub fn checked_times(&self, units: u64) -> Result<Money, MoneyError> {
        self.amount
            .checked_mul(Decimal::from(units))
            .map(|amount| Self::new(amount, self.currency))
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{}{:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::SGD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::SGD);
    }

    #[test]
    fn test_money_from_major() {
        let m = Money::from_major(100, Currency::SGD);
        assert_eq!(m.amount(), dec!(100));
    }

    #[test]
    fn test_currency_mismatch() {
        let sgd = Money::from_major(100, Currency::SGD);
        let usd = Money::from_major(100, Currency::USD);

        let result = sgd.checked_add(&usd);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_display_uses_symbol_and_minor_units() {
        let m = Money::from_major(200, Currency::SGD);
        assert_eq!(m.to_string(), "S$200.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn checked_times_matches_repeated_addition(
            base in 0i64..10_000i64,
            units in 0u64..50u64
        ) {
            let money = Money::from_major(base, Currency::SGD);
            let product = money.checked_times(units).unwrap();

            let mut sum = Money::zero(Currency::SGD);
            for _ in 0..units {
                sum = sum + money;
            }
            prop_assert_eq!(product, sum);
        }
    }
}
