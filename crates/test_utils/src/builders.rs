//! Test Data Builders
//!
//! Builders for claims in arbitrary workflow states and for a fully wired
//! `ClaimService` over an in-memory store and zero-latency services.

use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use std::sync::Arc;
use std::time::Duration;

use core_kernel::FixedClock;
use domain_claims::claim::ContactInfo;
use domain_claims::{
    compensation_for_delay, AgentLog, ClaimDetails, ClaimDetailsStatus, ClaimService, ClaimStore,
    ClaimTemplate, ClaimWorkflow, FlightDelayScenario, InMemoryClaimStore, LogType,
    PolicyHolder, SimulatedClaimServices, SimulatedServicesConfig, StepKind, StepStatus,
    WorkflowConfig, WorkflowStatus,
};

use crate::fixtures::TemporalFixtures;

/// A policyholder with generated name and contact details
pub fn random_policy_holder() -> PolicyHolder {
    PolicyHolder {
        name: Name().fake(),
        membership_tier: "Standard Member".to_string(),
        contact: ContactInfo {
            email: SafeEmail().fake(),
            phone: PhoneNumber().fake(),
        },
    }
}

/// Builder for claims in a chosen workflow state
pub struct ClaimWorkflowBuilder {
    scenario: FlightDelayScenario,
    now: DateTime<Utc>,
    status: WorkflowStatus,
    completed_steps: Vec<u8>,
    with_details: bool,
    without_segments: bool,
}

impl Default for ClaimWorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimWorkflowBuilder {
    pub fn new() -> Self {
        Self {
            scenario: FlightDelayScenario::default(),
            now: TemporalFixtures::now(),
            status: WorkflowStatus::Initialized,
            completed_steps: Vec::new(),
            with_details: false,
            without_segments: false,
        }
    }

    pub fn with_delay(mut self, delay_hours: u32) -> Self {
        self.scenario.delay_hours = delay_hours;
        self
    }

    pub fn with_holder(mut self, holder: PolicyHolder) -> Self {
        self.scenario.policy_holder = holder;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_status(mut self, status: WorkflowStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the given steps completed
    pub fn with_completed_steps(mut self, steps: &[u8]) -> Self {
        self.completed_steps = steps.to_vec();
        self
    }

    /// Marks all six steps completed and writes claim details
    pub fn fully_validated(self) -> Self {
        let all: Vec<u8> = StepKind::ALL.iter().map(|k| k.number()).collect();
        self.with_completed_steps(&all).with_claim_details()
    }

    /// Writes claim details as the payment calculation step would
    pub fn with_claim_details(mut self) -> Self {
        self.with_details = true;
        self
    }

    pub fn without_segments(mut self) -> Self {
        self.without_segments = true;
        self
    }

    pub fn build(self) -> ClaimWorkflow {
        let mut claim = self.scenario.instantiate(self.now);
        claim.status = self.status;

        for step in claim.validation_steps.iter_mut() {
            if self.completed_steps.contains(&step.step_number) {
                step.status = StepStatus::Completed;
                step.details = Some(format!("{} completed", step.name));
                step.timestamp = Some(self.now);
            }
        }
        claim.current_step = self.completed_steps.iter().copied().max().unwrap_or(0);

        if self.with_details {
            let delay = self.scenario.delay_hours;
            claim.claim_details = Some(ClaimDetails {
                claim_id: "CLM-TRV-2026-000001".to_string(),
                claim_type: "Flight Delay Claim Payment".to_string(),
                delay_duration: delay,
                compensation_amount: compensation_for_delay(delay).unwrap(),
                filing_date: self.now.date_naive(),
                status: match self.status {
                    WorkflowStatus::Approved => ClaimDetailsStatus::Approved,
                    WorkflowStatus::Paid => ClaimDetailsStatus::Paid,
                    _ => ClaimDetailsStatus::Processing,
                },
            });
        }

        if self.without_segments {
            claim.flight_segments.clear();
        }
        claim
    }
}

/// A `ClaimService` with handles on its collaborators
pub struct TestClaimService {
    pub service: Arc<ClaimService>,
    pub store: Arc<dyn ClaimStore>,
    pub services: Arc<SimulatedClaimServices>,
    pub clock: Arc<FixedClock>,
}

/// Builder for a wired `ClaimService`
pub struct ClaimServiceBuilder {
    delay_hours: u32,
    store: Option<Arc<dyn ClaimStore>>,
    services_config: SimulatedServicesConfig,
    adapter_timeout: Duration,
}

impl Default for ClaimServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimServiceBuilder {
    pub fn new() -> Self {
        Self {
            delay_hours: 6,
            store: None,
            services_config: SimulatedServicesConfig::instant(),
            adapter_timeout: WorkflowConfig::default().adapter_timeout,
        }
    }

    /// First-leg delay of the claims the service starts
    pub fn with_delay(mut self, delay_hours: u32) -> Self {
        self.delay_hours = delay_hours;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ClaimStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.services_config = SimulatedServicesConfig {
            latency_min_ms: min_ms,
            latency_max_ms: max_ms,
        };
        self
    }

    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    pub fn build(self) -> TestClaimService {
        let clock = TemporalFixtures::clock();
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryClaimStore::new()));
        let services = Arc::new(SimulatedClaimServices::new(self.services_config));
        let config = WorkflowConfig {
            adapter_timeout: self.adapter_timeout,
            ..WorkflowConfig::default()
        };
        let service = ClaimService::new(store.clone(), services.clone(), clock.clone(), config)
            .with_template(Arc::new(FlightDelayScenario::with_delay(self.delay_hours)));

        TestClaimService {
            service: Arc::new(service),
            store,
            services,
            clock,
        }
    }
}

/// An agent log entry at the fixture instant
pub fn agent_log(message: &str, log_type: LogType) -> AgentLog {
    AgentLog::new(TemporalFixtures::now(), "Test Agent", message, log_type)
}
