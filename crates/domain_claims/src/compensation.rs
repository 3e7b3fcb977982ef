//! Flight delay compensation
//!
//! Compensation is paid per completed block of delay. Partial blocks are
//! truncated, so the result is always a non-negative multiple of the block
//! payout.

use core_kernel::{Currency, Money, MoneyError};

/// Length of one coverage block in hours
pub const COVERAGE_BLOCK_HOURS: u32 = 6;

/// Payout per completed block, in major units
pub const COMPENSATION_PER_BLOCK: i64 = 100;

/// Currency compensation is paid in
pub const COMPENSATION_CURRENCY: Currency = Currency::SGD;

/// Minimum delay that qualifies for any compensation
pub const MINIMUM_DELAY_HOURS: u32 = COVERAGE_BLOCK_HOURS;

/// Number of whole coverage blocks in a delay
pub fn completed_blocks(delay_hours: u32) -> u32 {
    delay_hours / COVERAGE_BLOCK_HOURS
}

/// The payout for a single block
pub fn payout_per_block() -> Money {
    Money::from_major(COMPENSATION_PER_BLOCK, COMPENSATION_CURRENCY)
}

/// `floor(delay_hours / 6) * 100`
pub fn compensation_for_delay(delay_hours: u32) -> Result<Money, MoneyError> {
    payout_per_block().checked_times(u64::from(completed_blocks(delay_hours)))
}

/// Human-readable derivation, e.g. `(13h ÷ 6h) × S$100.00 = S$200.00`
pub fn describe_formula(delay_hours: u32, compensation: &Money) -> String {
    format!(
        "({}h ÷ {}h) × {} = {}",
        delay_hours,
        COVERAGE_BLOCK_HOURS,
        payout_per_block(),
        compensation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_reference_values() {
        assert_eq!(compensation_for_delay(0).unwrap().amount(), Decimal::ZERO);
        assert_eq!(compensation_for_delay(5).unwrap().amount(), Decimal::ZERO);
        assert_eq!(compensation_for_delay(6).unwrap().amount(), Decimal::from(100));
        assert_eq!(compensation_for_delay(11).unwrap().amount(), Decimal::from(100));
        assert_eq!(compensation_for_delay(12).unwrap().amount(), Decimal::from(200));
    }

    #[test]
    fn test_formula_description() {
        let comp = compensation_for_delay(13).unwrap();
        assert_eq!(describe_formula(13, &comp), "(13h ÷ 6h) × S$100.00 = S$200.00");
    }

    proptest! {
        #[test]
        fn compensation_is_whole_blocks_times_payout(delay in 0u32..100_000u32) {
            let comp = compensation_for_delay(delay).unwrap();
            prop_assert_eq!(comp.amount(), Decimal::from(100 * (delay / 6)));
            prop_assert!(!comp.is_negative());
            prop_assert_eq!(comp.amount() % Decimal::from(100), Decimal::ZERO);
            prop_assert_eq!(comp.currency(), COMPENSATION_CURRENCY);
        }
    }
}
