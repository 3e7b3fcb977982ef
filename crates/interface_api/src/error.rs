//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::PortError;
use domain_claims::ClaimError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream service error: {0}")]
    BadGateway(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Validation(_) => "validation_error",
            ApiError::BadGateway(_) => "upstream_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let message = match self {
            ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Validation(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        };
        let body = ErrorResponse {
            error: kind.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        let message = err.to_string();
        match err {
            ClaimError::ClaimNotFound(_) => ApiError::NotFound(message),
            ClaimError::StepOutOfRange(_) => ApiError::Validation(message),
            ClaimError::InvalidStatusTransition { .. }
            | ClaimError::StepAlreadyCompleted(_)
            | ClaimError::ValidationIncomplete { .. }
            | ClaimError::MissingClaimDetails
            | ClaimError::MissingFlightSegment => ApiError::Conflict(message),
            ClaimError::AdapterFailure { .. } => ApiError::BadGateway(message),
            ClaimError::Money(_) => ApiError::Internal(message),
            ClaimError::Storage(port) => port.into(),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        let message = err.to_string();
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(message),
            PortError::Conflict { .. } => ApiError::Conflict(message),
            PortError::Validation { .. } => ApiError::Validation(message),
            PortError::ServiceUnavailable { .. } | PortError::Timeout { .. } => {
                ApiError::BadGateway(message)
            }
            PortError::Connection { .. } | PortError::Internal { .. } => {
                warn!(error = %message, "Storage failure");
                ApiError::Internal(message)
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
