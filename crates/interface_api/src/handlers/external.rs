//! Mock external-service handlers
//!
//! Each endpoint answers with the payload of the simulated adapter the
//! workflow engine itself calls.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use validator::Validate;

use core_kernel::{Currency, Money};
use domain_claims::claim::ContactInfo;
use domain_claims::{AdapterResponse, ClaimServicesPort, PolicyHolder};

use crate::dto::external::*;
use crate::{error::ApiError, AppState};

fn sgd(amount: rust_decimal::Decimal, field: &str) -> Result<Money, ApiError> {
    let money = Money::new(amount, Currency::SGD);
    if money.is_negative() {
        return Err(ApiError::Validation(format!("{} must not be negative", field)));
    }
    Ok(money)
}

fn payload(response: AdapterResponse) -> Json<Value> {
    Json(response.payload)
}

pub async fn flight_status(
    State(state): State<AppState>,
    Path(flight_number): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(payload(state.services.flight_status(&flight_number).await?))
}

pub async fn weather(
    State(state): State<AppState>,
    Path(location_code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(payload(state.services.weather(&location_code).await?))
}

pub async fn policy_verify(
    State(state): State<AppState>,
    Path(policy_number): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(payload(state.services.verify_policy(&policy_number).await?))
}

pub async fn eligibility_check(
    State(state): State<AppState>,
    Query(query): Query<EligibilityQuery>,
) -> Result<Json<Value>, ApiError> {
    query.validate()?;
    let response = state
        .services
        .check_eligibility(&query.policy_number, &query.claim_type, query.delay_hours)
        .await?;
    Ok(payload(response))
}

pub async fn security_screening(
    State(state): State<AppState>,
    Query(query): Query<ScreeningQuery>,
) -> Result<Json<Value>, ApiError> {
    query.validate()?;
    let amount = sgd(query.claim_amount, "claim_amount")?;
    let response = state
        .services
        .security_screening(&query.policy_number, amount)
        .await?;
    Ok(payload(response))
}

pub async fn payment_process(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> Result<Json<Value>, ApiError> {
    query.validate()?;
    let amount = sgd(query.amount, "amount")?;
    let beneficiary = PolicyHolder {
        name: query.holder_name,
        membership_tier: String::new(),
        contact: ContactInfo {
            email: String::new(),
            phone: String::new(),
        },
    };
    let response = state
        .services
        .process_payment(&query.policy_number, amount, &beneficiary)
        .await?;
    Ok(payload(response))
}
