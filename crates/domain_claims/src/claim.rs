//! Claim workflow aggregate
//!
//! `ClaimWorkflow` is the aggregate root. It embeds the policyholder, the
//! policy, the flight itinerary, the six validation steps, the optional
//! claim details written by the payment calculation step, and the
//! append-only agent log.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClaimId, DateRange, Money};
use crate::error::ClaimError;
use crate::ports::AdapterResponse;
use crate::steps::StepKind;

/// The person the policy covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyHolder {
    pub name: String,
    pub membership_tier: String,
    pub contact: ContactInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

/// Policy status as reported by the insurer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyStatus {
    Active,
    Suspended,
    Lapsed,
    Cancelled,
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::Suspended => "Suspended",
            PolicyStatus::Lapsed => "Lapsed",
            PolicyStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Per-peril coverage limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageLimits {
    /// Payout for each completed block of delay
    pub flight_delay_per_block: Money,
    /// Advertised ceiling for delay payouts
    pub flight_delay_max: Money,
    pub trip_cancellation: Money,
    pub medical: Money,
    pub baggage_loss: Money,
}

/// The travel policy a claim is filed against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDetails {
    pub policy_number: String,
    pub policy_type: String,
    pub coverage_window: DateRange,
    /// Summary of the delay benefit, e.g. "$100 per 6 hours"
    pub flight_delay_coverage: String,
    pub coverage_limits: CoverageLimits,
    pub status: PolicyStatus,
}

/// Operational status of a flight leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    OnTime,
    Scheduled,
    Delayed,
    Rescheduled,
    Cancelled,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlightStatus::OnTime => "On Time",
            FlightStatus::Scheduled => "Scheduled",
            FlightStatus::Delayed => "Delayed",
            FlightStatus::Rescheduled => "Rescheduled",
            FlightStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// One leg of the itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub flight_number: String,
    pub airline: String,
    pub departure_airport: String,
    pub departure_code: String,
    pub arrival_airport: String,
    pub arrival_code: String,
    pub scheduled_departure: DateTime<FixedOffset>,
    pub scheduled_arrival: DateTime<FixedOffset>,
    pub actual_departure: Option<DateTime<FixedOffset>>,
    pub actual_arrival: Option<DateTime<FixedOffset>>,
    pub status: FlightStatus,
    pub delay_hours: u32,
    pub delay_reason: Option<String>,
}

/// Status of a single validation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// One of the six ordered validation checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStep {
    pub step_number: u8,
    pub name: String,
    pub status: StepStatus,
    pub details: Option<String>,
    /// Endpoint of the external service invoked, if any
    pub api_called: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ValidationStep {
    /// Creates a pending step for the given kind
    pub fn pending(kind: StepKind) -> Self {
        Self {
            step_number: kind.number(),
            name: kind.name().to_string(),
            status: StepStatus::Pending,
            details: None,
            api_called: None,
            timestamp: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

/// Status of the payable claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimDetailsStatus {
    Processing,
    Approved,
    Paid,
}

/// Payable claim, written when the payment calculation step runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDetails {
    /// Human-facing claim reference (e.g. `CLM-TRV-2026-004213`)
    pub claim_id: String,
    pub claim_type: String,
    /// Delay in hours the compensation was computed from
    pub delay_duration: u32,
    pub compensation_amount: Money,
    pub filing_date: NaiveDate,
    pub status: ClaimDetailsStatus,
}

/// Category of an agent log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Info,
    Success,
    Warning,
    Error,
    ApiCall,
}

/// Immutable audit entry narrating an agent action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLog {
    pub timestamp: DateTime<Utc>,
    pub agent: String,
    pub message: String,
    pub log_type: LogType,
}

impl AgentLog {
    pub fn new(
        timestamp: DateTime<Utc>,
        agent: &str,
        message: impl Into<String>,
        log_type: LogType,
    ) -> Self {
        Self {
            timestamp,
            agent: agent.to_string(),
            message: message.into(),
            log_type,
        }
    }
}

/// Overall status of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Initialized,
    Processing,
    Approved,
    Paid,
    Rejected,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStatus::Initialized => "initialized",
            WorkflowStatus::Processing => "processing",
            WorkflowStatus::Approved => "approved",
            WorkflowStatus::Paid => "paid",
            WorkflowStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// A flight-delay claim and its validation workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimWorkflow {
    pub id: ClaimId,
    pub policy_holder: PolicyHolder,
    pub policy_details: PolicyDetails,
    pub flight_segments: Vec<FlightSegment>,
    pub validation_steps: Vec<ValidationStep>,
    pub claim_details: Option<ClaimDetails>,
    pub agent_logs: Vec<AgentLog>,
    /// Highest completed step number; informational, not a gate
    pub current_step: u8,
    pub status: WorkflowStatus,
    pub payment_response: Option<AdapterResponse>,
    pub created_at: DateTime<Utc>,
}

impl ClaimWorkflow {
    /// Creates an initialized claim with all six steps pending
    pub fn new(
        policy_holder: PolicyHolder,
        policy_details: PolicyDetails,
        flight_segments: Vec<FlightSegment>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ClaimId::new_v7(),
            policy_holder,
            policy_details,
            flight_segments,
            validation_steps: StepKind::ALL.iter().copied().map(ValidationStep::pending).collect(),
            claim_details: None,
            agent_logs: Vec::new(),
            current_step: 0,
            status: WorkflowStatus::Initialized,
            payment_response: None,
            created_at,
        }
    }

    /// The segment that drives delay-based business rules
    pub fn primary_segment(&self) -> Option<&FlightSegment> {
        self.flight_segments.first()
    }

    pub fn step(&self, step_number: u8) -> Option<&ValidationStep> {
        self.validation_steps
            .iter()
            .find(|s| s.step_number == step_number)
    }

    /// Step numbers that are not yet completed, in order
    pub fn pending_steps(&self) -> Vec<u8> {
        self.validation_steps
            .iter()
            .filter(|s| !s.is_completed())
            .map(|s| s.step_number)
            .collect()
    }

    pub fn all_steps_completed(&self) -> bool {
        self.validation_steps.len() == StepKind::ALL.len()
            && self.validation_steps.iter().all(ValidationStep::is_completed)
    }

    /// Updates the status
    pub fn transition_to(&mut self, status: WorkflowStatus) -> Result<(), ClaimError> {
        self.ensure_transition(status)?;
        self.status = status;
        Ok(())
    }

    /// Fails unless the claim may move to `target`
    pub fn ensure_transition(&self, target: WorkflowStatus) -> Result<(), ClaimError> {
        if !self.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: WorkflowStatus) -> bool {
        use WorkflowStatus::*;
        matches!(
            (self.status, target),
            (Initialized, Processing) |
            (Processing, Approved) |
            (Processing, Rejected) |
            (Approved, Paid)
        )
    }

    /// Applies a targeted update to one step, leaving siblings untouched.
    ///
    /// Returns false when no step carries `step_number`.
    pub fn apply_step_update(&mut self, step_number: u8, update: &StepUpdate) -> bool {
        match self
            .validation_steps
            .iter_mut()
            .find(|s| s.step_number == step_number)
        {
            Some(step) => {
                step.status = update.status;
                step.details = update.details.clone();
                step.api_called = update.api_called.clone();
                step.timestamp = update.timestamp;
                true
            }
            None => false,
        }
    }

    /// Merges a partial update into the document
    pub fn apply_fields(&mut self, fields: &ClaimFieldUpdate) {
        if let Some(status) = fields.status {
            self.status = status;
        }
        if let Some(current_step) = fields.current_step {
            self.current_step = current_step;
        }
        if let Some(details) = &fields.claim_details {
            self.claim_details = Some(details.clone());
        }
        if let (Some(status), Some(details)) = (fields.claim_details_status, self.claim_details.as_mut()) {
            details.status = status;
        }
        if let Some(response) = &fields.payment_response {
            self.payment_response = Some(response.clone());
        }
    }

    /// Appends entries to the audit log
    pub fn append_logs(&mut self, logs: &[AgentLog]) {
        self.agent_logs.extend_from_slice(logs);
    }
}

/// Typed partial update of one validation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepUpdate {
    pub status: StepStatus,
    pub details: Option<String>,
    pub api_called: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl StepUpdate {
    /// Marks a step as started
    pub fn in_progress(at: DateTime<Utc>) -> Self {
        Self {
            status: StepStatus::InProgress,
            details: None,
            api_called: None,
            timestamp: Some(at),
        }
    }

    /// Marks a step as failed without reaching its adapter
    pub fn failed(details: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: StepStatus::Failed,
            details: Some(details.into()),
            api_called: None,
            timestamp: Some(at),
        }
    }
}

/// Typed partial update of top-level claim fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimFieldUpdate {
    pub status: Option<WorkflowStatus>,
    pub current_step: Option<u8>,
    pub claim_details: Option<ClaimDetails>,
    /// Applied after `claim_details`; ignored when the claim has none
    pub claim_details_status: Option<ClaimDetailsStatus>,
    pub payment_response: Option<AdapterResponse>,
}

impl ClaimFieldUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::Currency;

    fn create_test_claim() -> ClaimWorkflow {
        let sgd = |n| Money::from_major(n, Currency::SGD);
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        ClaimWorkflow::new(
            PolicyHolder {
                name: "Test Holder".to_string(),
                membership_tier: "Standard".to_string(),
                contact: ContactInfo {
                    email: "holder@example.com".to_string(),
                    phone: "+65 0000 0000".to_string(),
                },
            },
            PolicyDetails {
                policy_number: "TRV-TEST-0001".to_string(),
                policy_type: "Travel".to_string(),
                coverage_window: DateRange::new(day, day).unwrap(),
                flight_delay_coverage: "$100 per 6 hours".to_string(),
                coverage_limits: CoverageLimits {
                    flight_delay_per_block: sgd(100),
                    flight_delay_max: sgd(500),
                    trip_cancellation: sgd(5000),
                    medical: sgd(100000),
                    baggage_loss: sgd(2500),
                },
                status: PolicyStatus::Active,
            },
            Vec::new(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_claim_has_six_pending_steps() {
        let claim = create_test_claim();
        assert_eq!(claim.status, WorkflowStatus::Initialized);
        let numbers: Vec<u8> = claim.validation_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        assert!(claim.validation_steps.iter().all(|s| s.status == StepStatus::Pending));
        assert!(claim.claim_details.is_none());
        assert_eq!(claim.pending_steps().len(), 6);
    }

    #[test]
    fn test_transition_table() {
        let mut claim = create_test_claim();
        assert!(claim.transition_to(WorkflowStatus::Approved).is_err());
        claim.transition_to(WorkflowStatus::Processing).unwrap();
        assert!(claim.transition_to(WorkflowStatus::Paid).is_err());
        claim.transition_to(WorkflowStatus::Approved).unwrap();
        claim.transition_to(WorkflowStatus::Paid).unwrap();
        assert!(claim.transition_to(WorkflowStatus::Processing).is_err());
    }

    #[test]
    fn test_rejected_reachable_only_from_processing() {
        let mut claim = create_test_claim();
        assert!(!claim.can_transition_to(WorkflowStatus::Rejected));
        claim.transition_to(WorkflowStatus::Processing).unwrap();
        claim.transition_to(WorkflowStatus::Rejected).unwrap();
        assert!(!claim.can_transition_to(WorkflowStatus::Approved));
    }

    #[test]
    fn test_step_update_touches_only_target_step() {
        let mut claim = create_test_claim();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 1, 0, 0).unwrap();
        assert!(claim.apply_step_update(3, &StepUpdate::in_progress(at)));
        assert_eq!(claim.step(3).unwrap().status, StepStatus::InProgress);
        assert_eq!(claim.step(2).unwrap().status, StepStatus::Pending);
        assert_eq!(claim.step(4).unwrap().status, StepStatus::Pending);
        assert!(!claim.apply_step_update(9, &StepUpdate::in_progress(at)));
    }

    #[test]
    fn test_claim_details_status_ignored_without_details() {
        let mut claim = create_test_claim();
        claim.apply_fields(&ClaimFieldUpdate {
            claim_details_status: Some(ClaimDetailsStatus::Approved),
            ..Default::default()
        });
        assert!(claim.claim_details.is_none());
        assert!(ClaimFieldUpdate::default().is_empty());
    }
}
