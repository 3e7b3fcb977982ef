//! Mock external-service DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct EligibilityQuery {
    #[validate(length(min = 1))]
    pub policy_number: String,
    #[validate(length(min = 1))]
    pub claim_type: String,
    pub delay_hours: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScreeningQuery {
    #[validate(length(min = 1))]
    pub policy_number: String,
    pub claim_amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PaymentQuery {
    #[validate(length(min = 1))]
    pub policy_number: String,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 200))]
    pub holder_name: String,
}
