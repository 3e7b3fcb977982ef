//! In-memory claim store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::claim::{AgentLog, ClaimFieldUpdate, ClaimWorkflow, StepUpdate};
use crate::ports::ClaimStore;

const ENTITY: &str = "ClaimWorkflow";

/// `ClaimStore` over a shared map. Each call holds the write lock for the
/// whole read-modify-write, so single-document updates are atomic.
#[derive(Debug, Default, Clone)]
pub struct InMemoryClaimStore {
    claims: Arc<RwLock<HashMap<ClaimId, ClaimWorkflow>>>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with claims for testing
    pub async fn with_claims(claims: Vec<ClaimWorkflow>) -> Self {
        let store = Self::new();
        {
            let mut map = store.claims.write().await;
            for claim in claims {
                map.insert(claim.id, claim);
            }
        }
        store
    }

    /// Number of stored claims
    pub async fn len(&self) -> usize {
        self.claims.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claims.read().await.is_empty()
    }
}

impl DomainPort for InMemoryClaimStore {}

#[async_trait]
impl HealthCheckable for InMemoryClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-claim-store", 0)
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn create(&self, claim: &ClaimWorkflow) -> Result<(), PortError> {
        let mut claims = self.claims.write().await;
        if claims.contains_key(&claim.id) {
            return Err(PortError::Conflict {
                message: format!("claim {} already exists", claim.id),
            });
        }
        claims.insert(claim.id, claim.clone());
        Ok(())
    }

    async fn get(&self, id: ClaimId) -> Result<ClaimWorkflow, PortError> {
        self.claims
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found(ENTITY, id))
    }

    async fn update_step(&self, id: ClaimId, step_number: u8, update: &StepUpdate) -> Result<(), PortError> {
        let mut claims = self.claims.write().await;
        let claim = claims
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found(ENTITY, id))?;
        if !claim.apply_step_update(step_number, update) {
            return Err(PortError::validation(format!(
                "claim {} has no validation step {}",
                id, step_number
            )));
        }
        Ok(())
    }

    async fn append_logs(&self, id: ClaimId, logs: &[AgentLog]) -> Result<(), PortError> {
        let mut claims = self.claims.write().await;
        let claim = claims
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found(ENTITY, id))?;
        claim.append_logs(logs);
        Ok(())
    }

    async fn set_fields(&self, id: ClaimId, fields: &ClaimFieldUpdate) -> Result<(), PortError> {
        let mut claims = self.claims.write().await;
        let claim = claims
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found(ENTITY, id))?;
        claim.apply_fields(fields);
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, PortError> {
        let mut claims = self.claims.write().await;
        let removed = claims.len() as u64;
        claims.clear();
        Ok(removed)
    }
}
