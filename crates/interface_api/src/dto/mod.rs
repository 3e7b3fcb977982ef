//! Request and response DTOs

pub mod claims;
pub mod external;
