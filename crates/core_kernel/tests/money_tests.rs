//! Unit tests for the Money module
//!
//! Tests cover creation, the compensation multiplication helper, boundary
//! conversions, and display formatting.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::SGD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::SGD);
        assert!(m.is_zero());
        assert!(!m.is_negative());
    }

    #[test]
    fn test_try_from_f64_accepts_finite_values() {
        let m = Money::try_from_f64(100.0, Currency::SGD).unwrap();
        assert_eq!(m.amount(), dec!(100));
    }

    #[test]
    fn test_try_from_f64_rejects_nan() {
        let result = Money::try_from_f64(f64::NAN, Currency::SGD);
        assert!(matches!(result, Err(MoneyError::InvalidAmount(_))));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_times_zero_units_is_zero() {
        let per_block = Money::from_major(100, Currency::SGD);
        assert!(per_block.checked_times(0).unwrap().is_zero());
    }

    #[test]
    fn test_checked_times_multiplies_amount() {
        let per_block = Money::from_major(100, Currency::SGD);
        assert_eq!(per_block.checked_times(3).unwrap().amount(), dec!(300));
    }

    #[test]
    fn test_checked_times_reports_overflow() {
        let huge = Money::new(Decimal::MAX, Currency::SGD);
        assert_eq!(huge.checked_times(2), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::from_major(100, Currency::SGD);
        let b = Money::from_major(50, Currency::SGD);
        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(150));
    }

    #[test]
    #[should_panic(expected = "Currency mismatch")]
    fn test_add_operator_panics_on_mismatch() {
        let _ = Money::from_major(1, Currency::SGD) + Money::from_major(1, Currency::USD);
    }
}

mod formatting {
    use super::*;

    #[test]
    fn test_display_sgd() {
        assert_eq!(Money::from_major(100, Currency::SGD).to_string(), "S$100.00");
    }

    #[test]
    fn test_display_jpy_has_no_minor_units() {
        assert_eq!(Money::from_major(1500, Currency::JPY).to_string(), "¥1500");
    }

    #[test]
    fn test_round_to_currency() {
        let m = Money::new(dec!(10.005), Currency::SGD).round_to_currency();
        assert_eq!(m.amount(), dec!(10.00));
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Money::from_major(200, Currency::SGD).to_f64(), 200.0);
    }

    #[test]
    fn test_serde_uses_uppercase_currency_code() {
        let json = serde_json::to_value(Money::from_major(100, Currency::SGD)).unwrap();
        assert_eq!(json["currency"], "SGD");
    }
}
