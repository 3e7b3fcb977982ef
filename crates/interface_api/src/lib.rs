//! HTTP API Layer
//!
//! This crate provides the REST API for the travel claims workflow using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claim workflow endpoints, mock external services, health
//! - **Middleware**: request ids, tracing, audit logging
//! - **DTOs**: query and response bodies
//! - **Error Handling**: consistent `{ error, message }` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, services, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use domain_claims::{ClaimService, ClaimServicesPort};

use crate::config::ApiConfig;
use crate::handlers::{claims, external, health};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClaimService>,
    /// Adapters backing the mock external-service endpoints
    pub services: Arc<dyn ClaimServicesPort>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(service: Arc<ClaimService>, services: Arc<dyn ClaimServicesPort>, config: ApiConfig) -> Self {
        Self {
            service,
            services,
            config,
        }
    }
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match config.allowed_origins() {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claim_routes = Router::new()
        .route("/", get(claims::root))
        .route("/scenario", get(claims::scenario))
        .route("/claim/start", post(claims::start_claim))
        .route("/claim/:id", get(claims::get_claim))
        .route("/claim/:id/process-step", post(claims::process_step))
        .route("/claim/:id/approve", post(claims::approve))
        .route("/claim/:id/pay", post(claims::pay))
        .route("/claims", delete(claims::clear_claims));

    let external_routes = Router::new()
        .route("/flight-status/:flight_number", get(external::flight_status))
        .route("/weather/:location_code", get(external::weather))
        .route("/policy-verify/:policy_number", get(external::policy_verify))
        .route("/eligibility-check", get(external::eligibility_check))
        .route("/security-screening", get(external::security_screening))
        .route("/payment-process", post(external::payment_process));

    let api_routes = claim_routes
        .nest("/external", external_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}
