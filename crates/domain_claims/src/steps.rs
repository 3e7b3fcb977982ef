//! The fixed, ordered table of validation steps

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClaimError;

/// The six validation checks, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    PolicyVerification,
    FlightDelayConfirmation,
    DelayDurationValidation,
    EligibilityAssessment,
    ClaimPaymentCalculation,
    SecurityScreening,
}

impl StepKind {
    /// Every step, indexed by `number() - 1`
    pub const ALL: [StepKind; 6] = [
        StepKind::PolicyVerification,
        StepKind::FlightDelayConfirmation,
        StepKind::DelayDurationValidation,
        StepKind::EligibilityAssessment,
        StepKind::ClaimPaymentCalculation,
        StepKind::SecurityScreening,
    ];

    /// Looks up a step by its 1-based number
    pub fn from_number(step_number: u8) -> Result<Self, ClaimError> {
        step_number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize))
            .copied()
            .ok_or(ClaimError::StepOutOfRange(step_number))
    }

    pub fn number(self) -> u8 {
        match self {
            StepKind::PolicyVerification => 1,
            StepKind::FlightDelayConfirmation => 2,
            StepKind::DelayDurationValidation => 3,
            StepKind::EligibilityAssessment => 4,
            StepKind::ClaimPaymentCalculation => 5,
            StepKind::SecurityScreening => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StepKind::PolicyVerification => "Policy Verification",
            StepKind::FlightDelayConfirmation => "Flight Delay Confirmation",
            StepKind::DelayDurationValidation => "Delay Duration Validation",
            StepKind::EligibilityAssessment => "Eligibility Assessment",
            StepKind::ClaimPaymentCalculation => "Claim Payment Calculation",
            StepKind::SecurityScreening => "Security Screening",
        }
    }

    /// Endpoint of the external service the step consults; the payment
    /// calculation is pure and calls nothing
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            StepKind::PolicyVerification => Some("/api/external/policy-verify"),
            StepKind::FlightDelayConfirmation => Some("/api/external/flight-status"),
            StepKind::DelayDurationValidation => Some("/api/external/weather"),
            StepKind::EligibilityAssessment => Some("/api/external/eligibility-check"),
            StepKind::ClaimPaymentCalculation => None,
            StepKind::SecurityScreening => Some("/api/external/security-screening"),
        }
    }

    /// True for steps whose rule reads the first flight segment
    pub fn needs_flight_segment(self) -> bool {
        !matches!(self, StepKind::PolicyVerification)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
