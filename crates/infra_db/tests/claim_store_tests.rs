//! PostgreSQL claim store tests
//!
//! Require Docker. Run with `cargo test -p infra_db -- --ignored`.

use std::sync::Arc;

use core_kernel::{AdapterHealth, ClaimId, HealthCheckable, PortError};
use domain_claims::{
    AgentLog, ClaimDetailsStatus, ClaimFieldUpdate, ClaimStore, LogType, StepStatus, StepUpdate,
    WorkflowStatus,
};
use test_utils::{
    create_isolated_test_database, ClaimFixtures, ClaimServiceBuilder, ClaimWorkflowBuilder,
    TemporalFixtures,
};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_round_trips_document() {
    let db = create_isolated_test_database().await.unwrap();
    let store = db.store();
    let claim = ClaimFixtures::processing(12);

    store.create(&claim).await.unwrap();
    let loaded = store.get(claim.id).await.unwrap();

    assert_eq!(loaded, claim);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_create_conflicts() {
    let db = create_isolated_test_database().await.unwrap();
    let store = db.store();
    let claim = ClaimFixtures::processing(6);

    store.create(&claim).await.unwrap();
    let err = store.create(&claim).await.unwrap_err();

    assert!(matches!(err, PortError::Conflict { .. }));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_missing_claim_is_not_found() {
    let db = create_isolated_test_database().await.unwrap();
    let store = db.store();

    let err = store.get(ClaimId::new_v7()).await.unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .append_logs(ClaimId::new_v7(), &[AgentLog::new(TemporalFixtures::now(), "Test", "x", LogType::Info)])
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_partial_updates_touch_only_their_fields() {
    let db = create_isolated_test_database().await.unwrap();
    let store = db.store();
    let claim = ClaimFixtures::processing(6);
    store.create(&claim).await.unwrap();

    store
        .update_step(claim.id, 3, &StepUpdate::in_progress(TemporalFixtures::now()))
        .await
        .unwrap();
    store
        .set_fields(
            claim.id,
            &ClaimFieldUpdate {
                current_step: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let loaded = store.get(claim.id).await.unwrap();
    assert_eq!(loaded.step(3).unwrap().status, StepStatus::InProgress);
    assert_eq!(loaded.step(2).unwrap().status, StepStatus::Pending);
    assert_eq!(loaded.current_step, 3);
    assert_eq!(loaded.status, WorkflowStatus::Processing);
    assert_eq!(loaded.agent_logs, claim.agent_logs);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unknown_step_is_rejected() {
    let db = create_isolated_test_database().await.unwrap();
    let store = db.store();
    let claim = ClaimFixtures::processing(6);
    store.create(&claim).await.unwrap();

    let err = store
        .update_step(claim.id, 9, &StepUpdate::in_progress(TemporalFixtures::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Validation { .. }));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_status_column_follows_document() {
    let db = create_isolated_test_database().await.unwrap();
    let store = db.store();
    let claim = ClaimWorkflowBuilder::new()
        .with_status(WorkflowStatus::Processing)
        .fully_validated()
        .build();
    store.create(&claim).await.unwrap();

    store
        .set_fields(
            claim.id,
            &ClaimFieldUpdate {
                status: Some(WorkflowStatus::Approved),
                claim_details_status: Some(ClaimDetailsStatus::Approved),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let repo = store.repository();
    assert_eq!(repo.count(Some("approved")).await.unwrap(), 1);
    assert_eq!(repo.count(Some("processing")).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_all_and_health() {
    let db = create_isolated_test_database().await.unwrap();
    let store = db.store();
    store.create(&ClaimFixtures::processing(6)).await.unwrap();
    store.create(&ClaimFixtures::processing(12)).await.unwrap();

    assert_eq!(store.delete_all().await.unwrap(), 2);
    assert_eq!(store.health_check().await.status, AdapterHealth::Healthy);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_full_workflow_over_postgres() {
    let db = create_isolated_test_database().await.unwrap();
    let harness = ClaimServiceBuilder::new()
        .with_delay(13)
        .with_store(Arc::new(db.store()))
        .build();

    let id = harness.service.start().await.unwrap().id;
    for step in 1..=6 {
        harness.service.process_step(id, step).await.unwrap();
    }
    harness.service.approve(id).await.unwrap();
    harness.service.pay(id).await.unwrap();

    let claim = harness.store.get(id).await.unwrap();
    assert_eq!(claim.status, WorkflowStatus::Paid);
    assert_eq!(
        claim.claim_details.unwrap().compensation_amount,
        test_utils::MoneyFixtures::sgd(200)
    );
    assert!(claim.agent_logs.len() > 20);
}
