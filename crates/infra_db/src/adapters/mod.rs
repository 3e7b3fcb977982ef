//! Domain Adapters
//!
//! Implementations of domain ports backed by PostgreSQL.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimStore;
//! use domain_claims::ClaimStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStore> = Arc::new(PostgresClaimStore::new(pool));
//! let claim = store.get(claim_id).await?;
//! ```

pub mod claims;

pub use claims::PostgresClaimStore;
