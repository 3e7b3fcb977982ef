//! PostgreSQL Claim Store
//!
//! Implements the `ClaimStore` port over `ClaimsRepository`. Step and field
//! updates go through the same typed `apply_*` methods the in-memory store
//! uses, so both stores share one definition of a partial update.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{AgentLog, ClaimFieldUpdate, ClaimStore, ClaimWorkflow, StepUpdate};

use crate::error::DatabaseError;
use crate::repositories::ClaimsRepository;

const ADAPTER_ID: &str = "postgres-claim-store";

/// PostgreSQL-backed implementation of the `ClaimStore` port
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ClaimsRepository,
}

impl PostgresClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool),
        }
    }

    /// The underlying repository, for queries the port does not expose
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.repository.pool())
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn create(&self, claim: &ClaimWorkflow) -> Result<(), PortError> {
        debug!("Inserting claim document");
        self.repository.insert(claim).await.map_err(PortError::from)
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get(&self, id: ClaimId) -> Result<ClaimWorkflow, PortError> {
        let row = self.repository.get_by_id(*id.as_uuid()).await?;
        Ok(row.into_claim())
    }

    #[instrument(skip(self, update), fields(claim_id = %id))]
    async fn update_step(&self, id: ClaimId, step_number: u8, update: &StepUpdate) -> Result<(), PortError> {
        self.repository
            .modify(*id.as_uuid(), |claim| {
                if claim.apply_step_update(step_number, update) {
                    Ok(())
                } else {
                    Err(DatabaseError::InvalidUpdate(format!(
                        "claim {} has no validation step {}",
                        id, step_number
                    )))
                }
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, logs), fields(claim_id = %id, count = logs.len()))]
    async fn append_logs(&self, id: ClaimId, logs: &[AgentLog]) -> Result<(), PortError> {
        self.repository
            .modify(*id.as_uuid(), |claim| {
                claim.append_logs(logs);
                Ok(())
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, changes), fields(claim_id = %id))]
    async fn set_fields(&self, id: ClaimId, changes: &ClaimFieldUpdate) -> Result<(), PortError> {
        self.repository
            .modify(*id.as_uuid(), |claim| {
                claim.apply_fields(changes);
                Ok(())
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, PortError> {
        Ok(self.repository.delete_all().await?)
    }
}
