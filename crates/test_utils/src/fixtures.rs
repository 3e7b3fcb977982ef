//! Pre-built Test Fixtures
//!
//! Fixed instants and claims built from them. Everything here is
//! deterministic apart from claim ids.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{Currency, FixedClock, Money};
use domain_claims::{ClaimTemplate, ClaimWorkflow, FlightDelayScenario, WorkflowStatus};
use std::sync::Arc;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// 2026-03-01 02:00 UTC, which is 10:00 in Singapore
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap()
    }

    /// An instant whose journey time falls on the next local day
    pub fn late_evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    /// A clock pinned to [`TemporalFixtures::now`]
    pub fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Self::now()))
    }
}

/// Fixture for money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn sgd(units: i64) -> Money {
        Money::from_major(units, Currency::SGD)
    }

    pub fn sgd_zero() -> Money {
        Money::zero(Currency::SGD)
    }
}

/// Fixture for claims built from the reference scenario
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// The reference policy number
    pub const POLICY_NUMBER: &'static str = "TRV-2026-0014879";

    /// The reference policyholder
    pub const HOLDER_NAME: &'static str = "Jolene Chua";

    /// Scenario with the given first-leg delay
    pub fn scenario(delay_hours: u32) -> FlightDelayScenario {
        FlightDelayScenario::with_delay(delay_hours)
    }

    /// Freshly built, initialized claim
    pub fn initialized(delay_hours: u32) -> ClaimWorkflow {
        Self::scenario(delay_hours).instantiate(TemporalFixtures::now())
    }

    /// Claim already moved into `processing`
    pub fn processing(delay_hours: u32) -> ClaimWorkflow {
        let mut claim = Self::initialized(delay_hours);
        claim.status = WorkflowStatus::Processing;
        claim
    }
}
