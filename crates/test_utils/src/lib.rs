//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! travel claims test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed instants and ready-made claims
//! - `builders`: Builders for claims and fully wired claim services
//! - `database`: PostgreSQL test container management
//! - `assertions`: Assertion helpers for claim workflows
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
