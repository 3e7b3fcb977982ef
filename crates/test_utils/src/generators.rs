//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claim data that respects
//! domain invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::{Currency, Money};
use domain_claims::{AgentLog, LogType};

/// Delays from on-time up to three days
pub fn delay_hours_strategy() -> impl Strategy<Value = u32> {
    0u32..=72u32
}

/// Valid step numbers
pub fn step_number_strategy() -> impl Strategy<Value = u8> {
    1u8..=6u8
}

/// Step numbers outside 1..=6
pub fn out_of_range_step_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![Just(0u8), 7u8..=u8::MAX]
}

/// All six step numbers in a random order
pub fn step_order_strategy() -> impl Strategy<Value = Vec<u8>> {
    Just(vec![1u8, 2, 3, 4, 5, 6]).prop_shuffle()
}

/// Instants across 2025-2027
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0i64..(3 * 365 * 24 * 60)).prop_map(move |minutes| base + Duration::minutes(minutes))
}

/// Non-negative SGD amounts with cents
pub fn sgd_money_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000i64).prop_map(|cents| {
        Money::new(rust_decimal::Decimal::new(cents, 2), Currency::SGD)
    })
}

pub fn log_type_strategy() -> impl Strategy<Value = LogType> {
    prop_oneof![
        Just(LogType::Info),
        Just(LogType::Success),
        Just(LogType::Warning),
        Just(LogType::Error),
        Just(LogType::ApiCall),
    ]
}

pub fn agent_log_strategy() -> impl Strategy<Value = AgentLog> {
    (instant_strategy(), "[A-Za-z ]{1,24}", "[ -~]{0,80}", log_type_strategy())
        .prop_map(|(at, agent, message, log_type)| AgentLog::new(at, &agent, message, log_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn step_order_is_a_permutation(order in step_order_strategy()) {
            let mut sorted = order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);
        }

        #[test]
        fn out_of_range_steps_are_outside_table(step in out_of_range_step_strategy()) {
            prop_assert!(step == 0 || step > 6);
        }
    }
}
