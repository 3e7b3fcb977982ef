//! Travel Claims Domain
//!
//! This crate implements the flight-delay claim workflow: six ordered
//! validation steps, each consulting an external service, followed by
//! approval and payment.
//!
//! # Claim Lifecycle
//!
//! ```text
//! initialized -> processing -> approved -> paid
//!                    \
//!                     -> rejected
//! ```
//!
//! # Validation Steps
//!
//! 1. Policy Verification
//! 2. Flight Delay Confirmation
//! 3. Delay Duration Validation
//! 4. Eligibility Assessment
//! 5. Claim Payment Calculation (pure: `floor(delay_hours / 6) * 100`)
//! 6. Security Screening
//!
//! Every agent action is recorded in an append-only log on the claim.

pub mod adapters;
pub mod claim;
pub mod compensation;
pub mod error;
pub mod ports;
pub mod scenario;
pub mod service;
pub mod steps;
pub mod workflow;

pub use adapters::{InMemoryClaimStore, SimulatedClaimServices, SimulatedServicesConfig};
pub use claim::{
    AgentLog, ClaimDetails, ClaimDetailsStatus, ClaimFieldUpdate, ClaimWorkflow, FlightSegment,
    FlightStatus, LogType, PolicyDetails, PolicyHolder, StepStatus, StepUpdate, ValidationStep,
    WorkflowStatus,
};
pub use compensation::compensation_for_delay;
pub use error::ClaimError;
pub use ports::{AdapterResponse, ClaimServicesPort, ClaimStore, ExternalService};
pub use scenario::{ClaimTemplate, FlightDelayScenario};
pub use service::{ApprovalReceipt, ClaimLockGuard, ClaimLocks, ClaimService, PaymentReceipt, StartedClaim, StepReport};
pub use steps::StepKind;
pub use workflow::{StepResult, WorkflowConfig, WorkflowEngine};
