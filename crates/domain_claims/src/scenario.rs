//! Scenario builder
//!
//! Builds a fully-populated claim from a fixed template. The only input is
//! "now"; given the same instant the builder always produces the same
//! itinerary, coverage window and policy, so fixtures are reproducible.
//!
//! Times are derived in the reference timezone (Asia/Singapore):
//! - journey time = now + 6h
//! - leg 1 departs at the journey time and flies 4h30m
//! - leg 2 departs 2h after leg 1's scheduled arrival and flies 4h
//! - both legs' actual times are pushed back by the delay
//! - coverage window = [journey - 1 day, journey + 14 days]

use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;

use core_kernel::{Currency, DateRange, Money, Timezone};

use crate::claim::{
    ClaimWorkflow, ContactInfo, CoverageLimits, FlightSegment, FlightStatus, PolicyDetails,
    PolicyHolder, PolicyStatus,
};

/// Something that can stamp out a new claim at a given instant
pub trait ClaimTemplate: Send + Sync + Debug {
    /// Builds an initialized claim; pure, with no failure modes
    fn instantiate(&self, now: DateTime<Utc>) -> ClaimWorkflow;
}

const LEG_ONE_FLIGHT_TIME_MINUTES: i64 = 4 * 60 + 30;
const LAYOVER_HOURS: i64 = 2;
const LEG_TWO_FLIGHT_TIME_HOURS: i64 = 4;
const COVERAGE_DAYS_BEFORE: i64 = 1;
const COVERAGE_DAYS_AFTER: i64 = 14;

/// The SIN → HAK → NRT flight delay scenario
#[derive(Debug, Clone)]
pub struct FlightDelayScenario {
    pub timezone: Timezone,
    /// Gap between "now" and the first departure
    pub lead_time: Duration,
    /// Delay of the first leg, in hours
    pub delay_hours: u32,
    pub delay_reason: String,
    pub policy_holder: PolicyHolder,
    pub policy_number: String,
}

impl Default for FlightDelayScenario {
    fn default() -> Self {
        Self {
            timezone: Timezone::reference(),
            lead_time: Duration::hours(6),
            delay_hours: 6,
            delay_reason: "Adverse Weather Conditions - Tropical Storm".to_string(),
            policy_holder: PolicyHolder {
                name: "Jolene Chua".to_string(),
                membership_tier: "Premium Member".to_string(),
                contact: ContactInfo {
                    email: "jolene.chua@email.com".to_string(),
                    phone: "+65 9123 4567".to_string(),
                },
            },
            policy_number: "TRV-2026-0014879".to_string(),
        }
    }
}

impl FlightDelayScenario {
    /// The default scenario with a different first-leg delay
    pub fn with_delay(delay_hours: u32) -> Self {
        Self {
            delay_hours,
            ..Self::default()
        }
    }

    fn policy_details(&self, journey: DateTime<Utc>) -> PolicyDetails {
        let journey_date = self.timezone.to_local(journey).date_naive();
        let sgd = |units| Money::from_major(units, Currency::SGD);
        PolicyDetails {
            policy_number: self.policy_number.clone(),
            policy_type: "Comprehensive Travel Insurance".to_string(),
            coverage_window: DateRange {
                start: journey_date - Duration::days(COVERAGE_DAYS_BEFORE),
                end: journey_date + Duration::days(COVERAGE_DAYS_AFTER),
            },
            flight_delay_coverage: "$100 per 6 hours".to_string(),
            coverage_limits: CoverageLimits {
                flight_delay_per_block: sgd(100),
                flight_delay_max: sgd(500),
                trip_cancellation: sgd(5_000),
                medical: sgd(100_000),
                baggage_loss: sgd(2_500),
            },
            status: PolicyStatus::Active,
        }
    }

    fn flight_segments(&self, journey: DateTime<Utc>) -> Vec<FlightSegment> {
        let tz = self.timezone;
        let delay = Duration::hours(i64::from(self.delay_hours));
        let delayed = self.delay_hours > 0;

        let leg_one_departure = journey;
        let leg_one_arrival = leg_one_departure + Duration::minutes(LEG_ONE_FLIGHT_TIME_MINUTES);
        let leg_two_departure = leg_one_arrival + Duration::hours(LAYOVER_HOURS);
        let leg_two_arrival = leg_two_departure + Duration::hours(LEG_TWO_FLIGHT_TIME_HOURS);

        vec![
            FlightSegment {
                flight_number: "SQ656".to_string(),
                airline: "Singapore Airlines".to_string(),
                departure_airport: "Singapore Changi Airport".to_string(),
                departure_code: "SIN".to_string(),
                arrival_airport: "Haikou Meilan International Airport".to_string(),
                arrival_code: "HAK".to_string(),
                scheduled_departure: tz.to_fixed(leg_one_departure),
                scheduled_arrival: tz.to_fixed(leg_one_arrival),
                actual_departure: Some(tz.to_fixed(leg_one_departure + delay)),
                actual_arrival: Some(tz.to_fixed(leg_one_arrival + delay)),
                status: if delayed { FlightStatus::Delayed } else { FlightStatus::OnTime },
                delay_hours: self.delay_hours,
                delay_reason: delayed.then(|| self.delay_reason.clone()),
            },
            // Knock-on from leg 1; the leg itself carries no delay of its own
            FlightSegment {
                flight_number: "CA168".to_string(),
                airline: "Air China".to_string(),
                departure_airport: "Haikou Meilan International Airport".to_string(),
                departure_code: "HAK".to_string(),
                arrival_airport: "Narita International Airport".to_string(),
                arrival_code: "NRT".to_string(),
                scheduled_departure: tz.to_fixed(leg_two_departure),
                scheduled_arrival: tz.to_fixed(leg_two_arrival),
                actual_departure: Some(tz.to_fixed(leg_two_departure + delay)),
                actual_arrival: Some(tz.to_fixed(leg_two_arrival + delay)),
                status: if delayed { FlightStatus::Rescheduled } else { FlightStatus::Scheduled },
                delay_hours: 0,
                delay_reason: None,
            },
        ]
    }
}

impl ClaimTemplate for FlightDelayScenario {
    fn instantiate(&self, now: DateTime<Utc>) -> ClaimWorkflow {
        let journey = now + self.lead_time;
        ClaimWorkflow::new(
            self.policy_holder.clone(),
            self.policy_details(journey),
            self.flight_segments(journey),
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{StepStatus, WorkflowStatus};
    use chrono::{NaiveDate, TimeZone, Timelike};

    fn now() -> DateTime<Utc> {
        // 10:00 in Singapore
        Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap()
    }

    #[test]
    fn test_itinerary_times() {
        let claim = FlightDelayScenario::default().instantiate(now());
        let leg1 = &claim.flight_segments[0];
        let leg2 = &claim.flight_segments[1];

        assert_eq!(leg1.scheduled_departure.hour(), 16);
        assert_eq!(leg1.scheduled_arrival.hour(), 20);
        assert_eq!(leg1.scheduled_arrival.minute(), 30);
        assert_eq!(leg1.actual_departure.unwrap().hour(), 22);
        assert_eq!(leg2.scheduled_departure.hour(), 22);
        assert_eq!(leg2.scheduled_departure.minute(), 30);
        assert_eq!(leg2.scheduled_arrival - leg2.scheduled_departure, Duration::hours(4));
        assert_eq!(leg2.actual_arrival.unwrap() - leg2.scheduled_arrival, Duration::hours(6));
        assert_eq!(leg1.scheduled_departure.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_coverage_window() {
        let claim = FlightDelayScenario::default().instantiate(now());
        let window = claim.policy_details.coverage_window;
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(window.days(), 15);
    }

    #[test]
    fn test_journey_crossing_midnight_uses_local_date() {
        // 20:00 SGT, so the journey leaves at 02:00 the next local day
        let late = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let claim = FlightDelayScenario::default().instantiate(late);
        assert_eq!(
            claim.policy_details.coverage_window.start,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_is_deterministic_apart_from_id() {
        let scenario = FlightDelayScenario::default();
        let a = scenario.instantiate(now());
        let b = scenario.instantiate(now());
        assert_ne!(a.id, b.id);
        assert_eq!(a.flight_segments, b.flight_segments);
        assert_eq!(a.policy_details, b.policy_details);
        assert_eq!(a.validation_steps, b.validation_steps);
    }

    #[test]
    fn test_starts_initialized_with_pending_steps() {
        let claim = FlightDelayScenario::default().instantiate(now());
        assert_eq!(claim.status, WorkflowStatus::Initialized);
        assert_eq!(claim.created_at, now());
        assert!(claim.validation_steps.iter().all(|s| s.status == StepStatus::Pending));
        assert!(claim.agent_logs.is_empty());
    }

    #[test]
    fn test_zero_delay_is_on_time() {
        let claim = FlightDelayScenario::with_delay(0).instantiate(now());
        let leg1 = claim.primary_segment().unwrap();
        assert_eq!(leg1.status, FlightStatus::OnTime);
        assert!(leg1.delay_reason.is_none());
        assert_eq!(leg1.actual_departure, Some(leg1.scheduled_departure));
        assert_eq!(claim.flight_segments[1].status, FlightStatus::Scheduled);
    }
}
