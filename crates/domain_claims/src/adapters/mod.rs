//! Adapters for the claims domain ports
//!
//! # Available Adapters
//!
//! - **InMemoryClaimStore**: `ClaimStore` backed by a process-local map. Used
//!   when no database is configured, and in tests.
//! - **SimulatedClaimServices**: `ClaimServicesPort` returning reference
//!   payloads after a simulated network latency, with per-service outage
//!   injection for exercising failure paths.
//!
//! A Postgres-backed `ClaimStore` lives in `infra_db`.
//!
//! ```rust,ignore
//! use domain_claims::adapters::{InMemoryClaimStore, SimulatedClaimServices};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStore> = Arc::new(InMemoryClaimStore::new());
//! let services: Arc<dyn ClaimServicesPort> = Arc::new(SimulatedClaimServices::default());
//! ```

pub mod memory;
pub mod simulated;

pub use memory::InMemoryClaimStore;
pub use simulated::{SimulatedClaimServices, SimulatedServicesConfig};
