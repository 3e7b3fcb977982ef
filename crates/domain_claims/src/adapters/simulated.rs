//! Simulated third-party services
//!
//! Stands in for the insurer's policy API, FlightAware, OpenWeatherMap, the
//! eligibility engine, the fraud detection system and the payment gateway.
//! Every call sleeps for a random latency, then returns a reference payload
//! with a freshly generated request id. Unknown keys produce an explicit
//! error payload rather than a failed call.
//!
//! Outages can be injected per service; a service in outage fails with
//! `PortError::ServiceUnavailable`, which is how the workflow's step
//! failure path is exercised.

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, Money, PortError,
};

use crate::claim::PolicyHolder;
use crate::compensation::MINIMUM_DELAY_HOURS;
use crate::ports::{AdapterResponse, ClaimServicesPort, ExternalService};

/// Configuration for the simulated services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedServicesConfig {
    /// Lower bound of the simulated latency
    pub latency_min_ms: u64,
    /// Upper bound of the simulated latency; zero disables sleeping
    pub latency_max_ms: u64,
}

impl Default for SimulatedServicesConfig {
    fn default() -> Self {
        Self {
            latency_min_ms: 300,
            latency_max_ms: 800,
        }
    }
}

impl SimulatedServicesConfig {
    /// No latency at all, for tests
    pub fn instant() -> Self {
        Self {
            latency_min_ms: 0,
            latency_max_ms: 0,
        }
    }
}

/// In-process stand-in for the six external services
#[derive(Debug, Clone, Default)]
pub struct SimulatedClaimServices {
    config: SimulatedServicesConfig,
    outages: Arc<RwLock<HashSet<ExternalService>>>,
}

impl SimulatedClaimServices {
    pub fn new(config: SimulatedServicesConfig) -> Self {
        Self {
            config,
            outages: Arc::default(),
        }
    }

    /// Takes a service down or brings it back up
    pub async fn set_outage(&self, service: ExternalService, down: bool) {
        let mut outages = self.outages.write().await;
        if down {
            outages.insert(service);
        } else {
            outages.remove(&service);
        }
    }

    pub async fn is_down(&self, service: ExternalService) -> bool {
        self.outages.read().await.contains(&service)
    }

    fn latency(&self) -> Option<Duration> {
        let SimulatedServicesConfig { latency_min_ms, latency_max_ms } = self.config;
        if latency_max_ms == 0 {
            return None;
        }
        let low = latency_min_ms.min(latency_max_ms);
        let millis = rand::rng().random_range(low..=latency_max_ms);
        Some(Duration::from_millis(millis))
    }

    /// Simulates the round trip and returns a request id for the reply
    async fn call(&self, service: ExternalService) -> Result<String, PortError> {
        if let Some(latency) = self.latency() {
            tokio::time::sleep(latency).await;
        }
        if self.is_down(service).await {
            tracing::warn!(service = %service, "Simulated service outage");
            return Err(PortError::ServiceUnavailable {
                service: service.api_name().to_string(),
            });
        }
        Ok(request_id(service.request_prefix()))
    }
}

fn hex_code(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_uppercase()
}

fn request_id(prefix: &str) -> String {
    format!("{}-{}", prefix, hex_code(8))
}

impl DomainPort for SimulatedClaimServices {}

#[async_trait]
impl HealthCheckable for SimulatedClaimServices {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let outages = self.outages.read().await;
        let latency_ms = started.elapsed().as_millis() as u64;
        if outages.is_empty() {
            return HealthCheckResult::healthy("simulated-claim-services", latency_ms);
        }
        let mut down: Vec<String> = outages.iter().map(ToString::to_string).collect();
        down.sort();
        let status = if outages.len() == ExternalService::ALL.len() {
            AdapterHealth::Unhealthy
        } else {
            AdapterHealth::Degraded
        };
        HealthCheckResult {
            status,
            ..HealthCheckResult::unhealthy(
                "simulated-claim-services",
                latency_ms,
                format!("services down: {}", down.join(", ")),
            )
        }
    }
}

#[async_trait]
impl ClaimServicesPort for SimulatedClaimServices {
    async fn verify_policy(&self, policy_number: &str) -> Result<AdapterResponse, PortError> {
        let service = ExternalService::PolicyVerification;
        let request_id = self.call(service).await?;
        if policy_number != "TRV-2026-0014879" {
            return Ok(AdapterResponse::new(
                service.api_name(),
                request_id,
                json!({ "error": "Policy not found", "verification": "FAILED" }),
            ));
        }
        Ok(AdapterResponse::new(
            service.api_name(),
            request_id,
            json!({
                "policy": {
                    "number": policy_number,
                    "holder": "Jolene Chua",
                    "type": "Comprehensive Travel Insurance",
                    "status": "Active",
                    "premium_status": "Paid",
                    "coverage": {
                        "flight_delay": "$100 per 6 hours (max $500)",
                        "trip_cancellation": "$5,000",
                        "medical": "$100,000",
                        "baggage": "$2,500"
                    },
                    "verification": "PASSED"
                }
            }),
        ))
    }

    async fn flight_status(&self, flight_number: &str) -> Result<AdapterResponse, PortError> {
        let service = ExternalService::FlightStatus;
        let request_id = self.call(service).await?;
        let flight = match flight_number {
            "SQ656" => json!({
                "ident": "SQ656",
                "airline": "Singapore Airlines",
                "status": "Delayed",
                "delay_minutes": 360,
                "delay_reason": "Weather - Tropical Storm Warning",
                "origin": { "code": "SIN", "name": "Singapore Changi Airport" },
                "destination": { "code": "HAK", "name": "Haikou Meilan Intl" },
                "gate_origin": "C24",
                "gate_destination": "A12"
            }),
            "CA168" => json!({
                "ident": "CA168",
                "airline": "Air China",
                "status": "Scheduled",
                "delay_minutes": 0,
                "origin": { "code": "HAK", "name": "Haikou Meilan Intl" },
                "destination": { "code": "NRT", "name": "Narita International" }
            }),
            _ => return Ok(AdapterResponse::error(service.api_name(), request_id, "Flight not found")),
        };
        Ok(AdapterResponse::new(service.api_name(), request_id, json!({ "flight": flight })))
    }

    async fn weather(&self, location_code: &str) -> Result<AdapterResponse, PortError> {
        let service = ExternalService::Weather;
        let request_id = self.call(service).await?;
        let payload = match location_code {
            "SIN" => json!({
                "location": "Singapore",
                "condition": "Partly Cloudy",
                "temperature": "31°C",
                "wind_speed": "12 km/h",
                "visibility": "Good",
                "alerts": []
            }),
            "HAK" => json!({
                "location": "Haikou, China",
                "condition": "Tropical Storm",
                "temperature": "26°C",
                "wind_speed": "85 km/h",
                "visibility": "Poor",
                "alerts": ["Tropical Storm Warning", "Flight Operations Suspended"]
            }),
            _ => return Ok(AdapterResponse::error(service.api_name(), request_id, "Location not found")),
        };
        Ok(AdapterResponse::new(service.api_name(), request_id, payload))
    }

    async fn check_eligibility(
        &self,
        policy_number: &str,
        claim_type: &str,
        delay_hours: u32,
    ) -> Result<AdapterResponse, PortError> {
        let service = ExternalService::Eligibility;
        let request_id = self.call(service).await?;
        let meets_criteria = delay_hours >= MINIMUM_DELAY_HOURS;
        let reason = if meets_criteria {
            format!("Delay duration meets minimum threshold of {} hours", MINIMUM_DELAY_HOURS)
        } else {
            format!("Delay duration below minimum threshold of {} hours", MINIMUM_DELAY_HOURS)
        };
        Ok(AdapterResponse::new(
            service.api_name(),
            request_id,
            json!({
                "eligibility": {
                    "policy_number": policy_number,
                    "claim_type": claim_type,
                    "delay_hours": delay_hours,
                    "minimum_delay_required": MINIMUM_DELAY_HOURS,
                    "meets_criteria": meets_criteria,
                    "eligible": true,
                    "reason": reason
                }
            }),
        ))
    }

    async fn security_screening(
        &self,
        policy_number: &str,
        claim_amount: Money,
    ) -> Result<AdapterResponse, PortError> {
        let service = ExternalService::SecurityScreening;
        let request_id = self.call(service).await?;
        Ok(AdapterResponse::new(
            service.api_name(),
            request_id,
            json!({
                "screening": {
                    "policy_number": policy_number,
                    "claim_amount": claim_amount.to_f64(),
                    "risk_score": 12,
                    "risk_level": "Low",
                    "flags": [],
                    "recommendation": "APPROVE",
                    "auto_approval": true
                }
            }),
        ))
    }

    async fn process_payment(
        &self,
        policy_number: &str,
        amount: Money,
        holder: &PolicyHolder,
    ) -> Result<AdapterResponse, PortError> {
        let service = ExternalService::Payment;
        let request_id = self.call(service).await?;
        Ok(AdapterResponse::new(
            service.api_name(),
            request_id,
            json!({
                "payment": {
                    "transaction_id": format!("TXN-{}", hex_code(12)),
                    "policy_number": policy_number,
                    "beneficiary": holder.name,
                    "amount": amount.to_f64(),
                    "currency": amount.currency().code(),
                    "method": "Bank Transfer",
                    "bank": "DBS Bank",
                    "account_ending": "****7890",
                    "status": "COMPLETED",
                    "estimated_arrival": "1-2 business days"
                }
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ContactInfo;
    use core_kernel::Currency;

    fn services() -> SimulatedClaimServices {
        SimulatedClaimServices::new(SimulatedServicesConfig::instant())
    }

    #[tokio::test]
    async fn test_known_flight_returns_reference_payload() {
        let response = services().flight_status("SQ656").await.unwrap();
        assert_eq!(response.api, "FlightAware Real-Time API");
        assert!(response.request_id.starts_with("FA-"));
        assert_eq!(response.request_id.len(), 11);
        assert_eq!(response.field("/flight/delay_minutes"), Some(&json!(360)));
    }

    #[tokio::test]
    async fn test_unknown_keys_return_error_payloads() {
        let services = services();
        assert!(services.flight_status("XX000").await.unwrap().is_error());
        assert!(services.weather("ZZZ").await.unwrap().is_error());
        let policy = services.verify_policy("TRV-0000").await.unwrap();
        assert_eq!(policy.str_field("/verification"), Some("FAILED"));
    }

    #[tokio::test]
    async fn test_eligibility_threshold() {
        let services = services();
        let short = services.check_eligibility("TRV-2026-0014879", "Flight Delay", 5).await.unwrap();
        assert_eq!(short.field("/eligibility/meets_criteria"), Some(&json!(false)));
        let long = services.check_eligibility("TRV-2026-0014879", "Flight Delay", 6).await.unwrap();
        assert_eq!(long.field("/eligibility/meets_criteria"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_payment_echoes_amount_and_beneficiary() {
        let holder = PolicyHolder {
            name: "Jolene Chua".to_string(),
            membership_tier: "Premium Member".to_string(),
            contact: ContactInfo {
                email: "jolene.chua@email.com".to_string(),
                phone: "+65 9123 4567".to_string(),
            },
        };
        let response = services()
            .process_payment("TRV-2026-0014879", Money::from_major(200, Currency::SGD), &holder)
            .await
            .unwrap();
        assert_eq!(response.field("/payment/amount"), Some(&json!(200.0)));
        assert_eq!(response.str_field("/payment/currency"), Some("SGD"));
        assert_eq!(response.str_field("/payment/beneficiary"), Some("Jolene Chua"));
        let txn = response.str_field("/payment/transaction_id").unwrap();
        assert!(txn.starts_with("TXN-"));
        assert_eq!(txn.len(), 16);
    }

    #[tokio::test]
    async fn test_outage_fails_calls_and_degrades_health() {
        let services = services();
        services.set_outage(ExternalService::Weather, true).await;
        let err = services.weather("HAK").await.unwrap_err();
        assert!(matches!(err, PortError::ServiceUnavailable { .. }));
        assert_eq!(services.health_check().await.status, AdapterHealth::Degraded);

        services.set_outage(ExternalService::Weather, false).await;
        assert!(services.weather("HAK").await.is_ok());
        assert_eq!(services.health_check().await.status, AdapterHealth::Healthy);
    }
}
