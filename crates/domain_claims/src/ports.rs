//! Claims domain ports
//!
//! The workflow engine depends on two ports:
//! - [`ClaimServicesPort`]: the third-party verification and payment services
//! - [`ClaimStore`]: durable storage for claim documents, keyed by claim id

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, Money, PortError};

use crate::claim::{AgentLog, ClaimFieldUpdate, ClaimWorkflow, PolicyHolder, StepUpdate};

/// The external services a claim consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalService {
    PolicyVerification,
    FlightStatus,
    Weather,
    Eligibility,
    SecurityScreening,
    Payment,
}

impl ExternalService {
    pub const ALL: [ExternalService; 6] = [
        ExternalService::PolicyVerification,
        ExternalService::FlightStatus,
        ExternalService::Weather,
        ExternalService::Eligibility,
        ExternalService::SecurityScreening,
        ExternalService::Payment,
    ];

    /// Name the service reports in its `api` field
    pub fn api_name(self) -> &'static str {
        match self {
            ExternalService::PolicyVerification => "Income Insurance Policy API",
            ExternalService::FlightStatus => "FlightAware Real-Time API",
            ExternalService::Weather => "OpenWeatherMap Pro API",
            ExternalService::Eligibility => "Income Claims Eligibility Engine",
            ExternalService::SecurityScreening => "Income Fraud Detection System",
            ExternalService::Payment => "Income Payment Gateway",
        }
    }

    /// Prefix of the request ids the service issues
    pub fn request_prefix(self) -> &'static str {
        match self {
            ExternalService::PolicyVerification => "INC",
            ExternalService::FlightStatus => "FA",
            ExternalService::Weather => "OWM",
            ExternalService::Eligibility => "ELG",
            ExternalService::SecurityScreening => "FDS",
            ExternalService::Payment => "PAY",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            ExternalService::PolicyVerification => "/api/external/policy-verify",
            ExternalService::FlightStatus => "/api/external/flight-status",
            ExternalService::Weather => "/api/external/weather",
            ExternalService::Eligibility => "/api/external/eligibility-check",
            ExternalService::SecurityScreening => "/api/external/security-screening",
            ExternalService::Payment => "/api/external/payment-process",
        }
    }
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExternalService::PolicyVerification => "policy verification",
            ExternalService::FlightStatus => "flight status",
            ExternalService::Weather => "weather",
            ExternalService::Eligibility => "eligibility",
            ExternalService::SecurityScreening => "security screening",
            ExternalService::Payment => "payment",
        };
        f.write_str(label)
    }
}

/// Structured reply from an external service
///
/// The payload is opaque to the workflow; only a handful of fields are
/// read back out of it for log messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterResponse {
    pub api: String,
    pub request_id: String,
    pub payload: Value,
}

impl AdapterResponse {
    pub fn new(api: impl Into<String>, request_id: impl Into<String>, payload: Value) -> Self {
        Self {
            api: api.into(),
            request_id: request_id.into(),
            payload,
        }
    }

    /// An explicit not-found/error reply. The call itself succeeded.
    pub fn error(api: impl Into<String>, request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(api, request_id, serde_json::json!({ "error": message.into() }))
    }

    pub fn is_error(&self) -> bool {
        self.payload.get("error").is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.payload.get("error").and_then(Value::as_str)
    }

    /// Reads a field by JSON pointer, e.g. `/payment/transaction_id`
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.payload.pointer(pointer)
    }

    pub fn str_field(&self, pointer: &str) -> Option<&str> {
        self.field(pointer).and_then(Value::as_str)
    }
}

/// Port for the third-party services consulted during claim validation
/// and payment
#[async_trait]
pub trait ClaimServicesPort: DomainPort + HealthCheckable {
    /// Verifies a policy with the insurer
    async fn verify_policy(&self, policy_number: &str) -> Result<AdapterResponse, PortError>;

    /// Looks up the live status of a flight
    async fn flight_status(&self, flight_number: &str) -> Result<AdapterResponse, PortError>;

    /// Fetches weather conditions at an airport
    async fn weather(&self, location_code: &str) -> Result<AdapterResponse, PortError>;

    /// Asks the eligibility engine whether a claim meets policy criteria
    async fn check_eligibility(
        &self,
        policy_number: &str,
        claim_type: &str,
        delay_hours: u32,
    ) -> Result<AdapterResponse, PortError>;

    /// Screens a claim amount for fraud risk
    async fn security_screening(
        &self,
        policy_number: &str,
        claim_amount: Money,
    ) -> Result<AdapterResponse, PortError>;

    /// Transfers the claim amount to the beneficiary
    async fn process_payment(
        &self,
        policy_number: &str,
        amount: Money,
        holder: &PolicyHolder,
    ) -> Result<AdapterResponse, PortError>;
}

/// Port for claim document storage
///
/// Every update is keyed by claim id and is atomic for a single document.
/// No multi-document guarantees are required.
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Persists a new claim; fails with `Conflict` if the id exists
    async fn create(&self, claim: &ClaimWorkflow) -> Result<(), PortError>;

    /// Loads a claim; fails with `NotFound` for an unknown id
    async fn get(&self, id: ClaimId) -> Result<ClaimWorkflow, PortError>;

    /// Updates the single step matching `step_number`, leaving siblings untouched
    async fn update_step(&self, id: ClaimId, step_number: u8, update: &StepUpdate) -> Result<(), PortError>;

    /// Appends entries to the end of the claim's log
    async fn append_logs(&self, id: ClaimId, logs: &[AgentLog]) -> Result<(), PortError>;

    /// Merges top-level fields into the claim
    async fn set_fields(&self, id: ClaimId, fields: &ClaimFieldUpdate) -> Result<(), PortError>;

    /// Removes every claim, returning how many were removed
    async fn delete_all(&self) -> Result<u64, PortError>;
}
