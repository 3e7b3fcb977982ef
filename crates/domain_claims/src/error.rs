//! Claims domain errors

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

use crate::ports::ExternalService;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Validation step {0} is out of range (expected 1-6)")]
    StepOutOfRange(u8),

    #[error("Validation step {0} has already been completed")]
    StepAlreadyCompleted(u8),

    #[error("Validation incomplete, pending steps: {pending:?}")]
    ValidationIncomplete { pending: Vec<u8> },

    #[error("Claim details are missing; the payment calculation step has not run")]
    MissingClaimDetails,

    #[error("Claim has no flight segments")]
    MissingFlightSegment,

    #[error("{service} call failed: {message}")]
    AdapterFailure { service: ExternalService, message: String },

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Storage error: {0}")]
    Storage(PortError),
}

impl ClaimError {
    /// Returns true for errors caused by the claim being in the wrong state
    /// for the requested operation
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            ClaimError::InvalidStatusTransition { .. }
                | ClaimError::StepAlreadyCompleted(_)
                | ClaimError::ValidationIncomplete { .. }
                | ClaimError::MissingClaimDetails
        )
    }
}

impl From<PortError> for ClaimError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => ClaimError::ClaimNotFound(id),
            other => ClaimError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_claim_not_found() {
        let err: ClaimError = PortError::not_found("ClaimWorkflow", "CLM-1").into();
        assert!(matches!(err, ClaimError::ClaimNotFound(ref id) if id == "CLM-1"));
    }

    #[test]
    fn test_other_port_errors_map_to_storage() {
        let err: ClaimError = PortError::connection("refused").into();
        assert!(matches!(err, ClaimError::Storage(_)));
        assert!(!err.is_invalid_state());
    }
}
