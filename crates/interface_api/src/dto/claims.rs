//! Claims DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ProcessStepQuery {
    #[validate(range(min = 1, max = 6, message = "step_number must be between 1 and 6"))]
    pub step_number: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedResponse {
    pub message: String,
    pub removed: u64,
}
