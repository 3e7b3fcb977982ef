//! Custom Test Assertions
//!
//! Assertion helpers for claim workflows that give more meaningful failure
//! messages than bare `assert_eq!`.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_claims::{AgentLog, ClaimWorkflow, StepStatus};

/// Asserts that `after` extends `before` without editing or removing entries
pub fn assert_logs_append_only(before: &[AgentLog], after: &[AgentLog]) {
    assert!(
        after.len() >= before.len(),
        "Log shrank from {} to {} entries",
        before.len(),
        after.len()
    );
    for (idx, (old, new)) in before.iter().zip(after.iter()).enumerate() {
        assert_eq!(old, new, "Log entry {} changed", idx);
    }
}

/// Asserts the status of one validation step
pub fn assert_step_status(claim: &ClaimWorkflow, step_number: u8, expected: StepStatus) {
    let step = claim
        .step(step_number)
        .unwrap_or_else(|| panic!("Claim has no step {}", step_number));
    assert_eq!(
        step.status, expected,
        "Step {} ({}) is {:?}, expected {:?}",
        step_number, step.name, step.status, expected
    );
}

/// Asserts that a step completed with details and a timestamp
pub fn assert_step_completed(claim: &ClaimWorkflow, step_number: u8) {
    assert_step_status(claim, step_number, StepStatus::Completed);
    let step = claim.step(step_number).unwrap();
    assert!(step.details.is_some(), "Step {} has no details", step_number);
    assert!(step.timestamp.is_some(), "Step {} has no timestamp", step_number);
}

/// Asserts that the claim's computed compensation is `units` major units
pub fn assert_compensation(claim: &ClaimWorkflow, units: i64) {
    let details = claim
        .claim_details
        .as_ref()
        .expect("Claim details have not been written");
    assert_money_units(&details.compensation_amount, units);
}

/// Asserts a money amount in whole major units
pub fn assert_money_units(money: &Money, units: i64) {
    assert_eq!(
        money.amount(),
        Decimal::from(units),
        "Expected {} units, got {}",
        units,
        money
    );
}

/// Asserts that a claim's steps carry numbers 1..=6 exactly once each
pub fn assert_step_table_intact(claim: &ClaimWorkflow) {
    let numbers: Vec<u8> = claim.validation_steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6], "Step table is not contiguous");
}
