//! Infrastructure Database Layer
//!
//! Durable storage for claim workflows on PostgreSQL using SQLx.
//!
//! # Storage Model
//!
//! Each claim is one JSONB document in `claim_documents`, keyed by claim id,
//! with its status mirrored into a plain column. Targeted updates (one
//! validation step, appended log entries, top-level fields) are applied to
//! the decoded document under a row lock and written back in the same
//! transaction.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! let store = PostgresClaimStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresClaimStore;
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{ClaimDocumentRow, ClaimsRepository};
