//! Core Kernel - Foundational types shared by the travel claims crates
//!
//! This crate provides the building blocks used across the workspace:
//! - Money types with precise decimal arithmetic
//! - Clock and timezone handling for deterministic scenario construction
//! - Strongly-typed identifiers
//! - Port infrastructure for stores and external service adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{Clock, SystemClock, FixedClock, Timezone, DateRange, TemporalError};
pub use identifiers::{ClaimId, TransactionId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
