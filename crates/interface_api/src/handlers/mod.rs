//! Request handlers

pub mod claims;
pub mod external;
pub mod health;
