//! Claim service facade
//!
//! The boundary the HTTP layer calls into. Every operation loads the claim
//! from the store (except `start`), delegates the business decision to the
//! [`WorkflowEngine`], and persists what the engine produced through typed
//! partial updates. Mutating operations on one claim are serialized with a
//! per-claim lock; different claims proceed in parallel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};

use core_kernel::{ClaimId, Clock, HealthCheckResult};

use crate::claim::{
    AgentLog, ClaimDetailsStatus, ClaimFieldUpdate, ClaimWorkflow, StepUpdate, WorkflowStatus,
};
use crate::error::ClaimError;
use crate::ports::{AdapterResponse, ClaimServicesPort, ClaimStore};
use crate::scenario::{ClaimTemplate, FlightDelayScenario};
use crate::workflow::{StepResult, WorkflowConfig, WorkflowEngine};

/// Reply to `start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedClaim {
    pub id: ClaimId,
    pub status: WorkflowStatus,
}

/// Reply to `process_step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: u8,
    pub result: StepResult,
    pub logs: Vec<AgentLog>,
}

/// Reply to `approve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    pub status: WorkflowStatus,
    pub timestamp: DateTime<Utc>,
}

/// Reply to `pay`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub status: WorkflowStatus,
    pub payment: AdapterResponse,
    pub logs: Vec<AgentLog>,
}

type LockTable = Arc<StdMutex<HashMap<ClaimId, Arc<Mutex<()>>>>>;

/// Per-claim async mutexes
///
/// An entry exists only while some caller holds or waits for that claim's
/// lock; the last guard to drop removes it.
#[derive(Debug, Default)]
pub struct ClaimLocks {
    table: LockTable,
}

/// Exclusive access to one claim, released on drop
#[derive(Debug)]
pub struct ClaimLockGuard {
    id: ClaimId,
    table: LockTable,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ClaimLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the table and this guard still reference the mutex
        let idle = table
            .get(&self.id)
            .is_some_and(|entry| Arc::ptr_eq(entry, &self.lock) && Arc::strong_count(&self.lock) == 2);
        if idle {
            table.remove(&self.id);
        }
    }
}

impl ClaimLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to one claim
    pub async fn acquire(&self, id: ClaimId) -> ClaimLockGuard {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(table.entry(id).or_default())
        };
        // Built before waiting so a cancelled acquire still prunes its entry
        let mut handle = ClaimLockGuard {
            id,
            table: Arc::clone(&self.table),
            lock,
            guard: None,
        };
        handle.guard = Some(Arc::clone(&handle.lock).lock_owned().await);
        handle
    }

    /// Drops every idle entry; held guards stay valid
    pub fn clear(&self) {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of claims currently locked or awaited
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Coordinates the workflow engine and the claim store
pub struct ClaimService {
    store: Arc<dyn ClaimStore>,
    services: Arc<dyn ClaimServicesPort>,
    engine: WorkflowEngine,
    template: Arc<dyn ClaimTemplate>,
    clock: Arc<dyn Clock>,
    locks: ClaimLocks,
}

impl std::fmt::Debug for ClaimService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimService")
            .field("engine", &self.engine)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl ClaimService {
    pub fn new(
        store: Arc<dyn ClaimStore>,
        services: Arc<dyn ClaimServicesPort>,
        clock: Arc<dyn Clock>,
        config: WorkflowConfig,
    ) -> Self {
        let engine = WorkflowEngine::new(Arc::clone(&services), Arc::clone(&clock), config);
        Self {
            store,
            services,
            engine,
            template: Arc::new(FlightDelayScenario::default()),
            clock,
            locks: ClaimLocks::new(),
        }
    }

    /// Replaces the scenario new claims are built from
    pub fn with_template(mut self, template: Arc<dyn ClaimTemplate>) -> Self {
        self.template = template;
        self
    }

    pub fn locks(&self) -> &ClaimLocks {
        &self.locks
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    /// Builds an unsaved claim from the template
    pub fn scenario(&self) -> ClaimWorkflow {
        self.template.instantiate(self.clock.now())
    }

    /// Creates a claim and moves it into `processing`
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<StartedClaim, ClaimError> {
        let mut claim = self.scenario();
        self.engine.start(&mut claim)?;
        self.store.create(&claim).await?;
        info!(claim_id = %claim.id, "Claim created");
        Ok(StartedClaim {
            id: claim.id,
            status: claim.status,
        })
    }

    pub async fn get(&self, id: ClaimId) -> Result<ClaimWorkflow, ClaimError> {
        Ok(self.store.get(id).await?)
    }

    /// Runs one validation step and persists its outcome
    ///
    /// The step is marked `in_progress` before its service is called. A
    /// failed service call is persisted as a `failed` step with an error log
    /// and then returned as `AdapterFailure`.
    #[instrument(skip(self), fields(claim_id = %id))]
    pub async fn process_step(&self, id: ClaimId, step_number: u8) -> Result<StepReport, ClaimError> {
        let _guard = self.locks.acquire(id).await;
        let claim = self.store.get(id).await?;
        let kind = self.engine.prepare_step(&claim, step_number)?;

        self.store
            .update_step(id, step_number, &StepUpdate::in_progress(self.clock.now()))
            .await?;

        let outcome = match self.engine.execute_step(&claim, kind).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(step = step_number, error = %err, "Validation step aborted");
                self.store
                    .update_step(id, step_number, &StepUpdate::failed(err.to_string(), self.clock.now()))
                    .await?;
                return Err(err);
            }
        };

        self.store
            .update_step(id, step_number, &outcome.result.to_update())
            .await?;

        let mut fields = ClaimFieldUpdate {
            claim_details: outcome.claim_details.clone(),
            ..Default::default()
        };
        if !outcome.is_failed() && step_number > claim.current_step {
            fields.current_step = Some(step_number);
        }
        if !fields.is_empty() {
            self.store.set_fields(id, &fields).await?;
        }
        self.store.append_logs(id, &outcome.logs).await?;

        if let Some(failure) = outcome.failure {
            return Err(failure.into());
        }
        Ok(StepReport {
            step: step_number,
            result: outcome.result,
            logs: outcome.logs,
        })
    }

    /// Approves a claim whose validation is complete
    #[instrument(skip(self), fields(claim_id = %id))]
    pub async fn approve(&self, id: ClaimId) -> Result<ApprovalReceipt, ClaimError> {
        let _guard = self.locks.acquire(id).await;
        let claim = self.store.get(id).await?;
        let approval = self.engine.approve(&claim)?;

        self.store
            .set_fields(
                id,
                &ClaimFieldUpdate {
                    status: Some(WorkflowStatus::Approved),
                    claim_details_status: Some(ClaimDetailsStatus::Approved),
                    ..Default::default()
                },
            )
            .await?;
        self.store.append_logs(id, &[approval.log]).await?;

        Ok(ApprovalReceipt {
            status: WorkflowStatus::Approved,
            timestamp: approval.timestamp,
        })
    }

    /// Pays an approved claim
    ///
    /// Nothing is written when the claim is not payable. A gateway failure
    /// leaves the claim `approved` and records the attempt in the log.
    #[instrument(skip(self), fields(claim_id = %id))]
    pub async fn pay(&self, id: ClaimId) -> Result<PaymentReceipt, ClaimError> {
        let _guard = self.locks.acquire(id).await;
        let claim = self.store.get(id).await?;
        let outcome = self.engine.pay(&claim).await?;

        let payment = match outcome.result {
            Ok(response) => response,
            Err(failure) => {
                self.store.append_logs(id, &outcome.logs).await?;
                return Err(failure.into());
            }
        };

        self.store
            .set_fields(
                id,
                &ClaimFieldUpdate {
                    status: Some(WorkflowStatus::Paid),
                    claim_details_status: Some(ClaimDetailsStatus::Paid),
                    payment_response: Some(payment.clone()),
                    ..Default::default()
                },
            )
            .await?;
        self.store.append_logs(id, &outcome.logs).await?;

        Ok(PaymentReceipt {
            status: WorkflowStatus::Paid,
            payment,
            logs: outcome.logs,
        })
    }

    /// Removes every claim; administrative and test use only
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<u64, ClaimError> {
        self.locks.clear();
        let removed = self.store.delete_all().await?;
        info!(removed, "All claims cleared");
        Ok(removed)
    }

    /// Health of the store and the external services
    pub async fn health(&self) -> Vec<HealthCheckResult> {
        vec![
            self.store.health_check().await,
            self.services.health_check().await,
        ]
    }
}
