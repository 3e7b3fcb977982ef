//! Repository implementations
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. Queries are built at runtime with `sqlx::query`, so the crate
//! compiles without a live database.

pub mod claims;

pub use claims::{ClaimDocumentRow, ClaimsRepository};
