//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{ApprovalReceipt, ClaimWorkflow, PaymentReceipt, StartedClaim, StepReport};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

fn parse_claim_id(raw: &str) -> Result<ClaimId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("Claim not found: {}", raw)))
}

/// API banner
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Smart Travel Claims API".to_string(),
    })
}

/// Previews the claim a new workflow would start from
pub async fn scenario(State(state): State<AppState>) -> Json<ClaimWorkflow> {
    Json(state.service.scenario())
}

/// Creates a claim and moves it into processing
pub async fn start_claim(State(state): State<AppState>) -> Result<Json<StartedClaim>, ApiError> {
    Ok(Json(state.service.start().await?))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimWorkflow>, ApiError> {
    let id = parse_claim_id(&id)?;
    Ok(Json(state.service.get(id).await?))
}

/// Runs one validation step
pub async fn process_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ProcessStepQuery>,
) -> Result<Json<StepReport>, ApiError> {
    query.validate()?;
    let id = parse_claim_id(&id)?;
    let step = u8::try_from(query.step_number)
        .map_err(|_| ApiError::Validation("step_number must be between 1 and 6".to_string()))?;

    Ok(Json(state.service.process_step(id, step).await?))
}

/// Approves a fully validated claim
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApprovalReceipt>, ApiError> {
    let id = parse_claim_id(&id)?;
    Ok(Json(state.service.approve(id).await?))
}

/// Pays an approved claim
pub async fn pay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentReceipt>, ApiError> {
    let id = parse_claim_id(&id)?;
    Ok(Json(state.service.pay(id).await?))
}

/// Removes every claim
pub async fn clear_claims(State(state): State<AppState>) -> Result<Json<ClearedResponse>, ApiError> {
    let removed = state.service.clear_all().await?;
    Ok(Json(ClearedResponse {
        message: "All claims cleared".to_string(),
        removed,
    }))
}
