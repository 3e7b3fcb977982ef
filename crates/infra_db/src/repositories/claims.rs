//! Claim document repository
//!
//! Stores each `ClaimWorkflow` as one JSONB document. Partial updates are a
//! read-modify-write of the whole document inside a transaction that holds
//! a row lock, so each update is atomic for its claim.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use domain_claims::ClaimWorkflow;

use crate::error::DatabaseError;

const ENTITY: &str = "ClaimWorkflow";

/// Repository for claim workflow documents
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a new document; fails with `DuplicateEntry` if the id exists
    pub async fn insert(&self, claim: &ClaimWorkflow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claim_documents (claim_id, status, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(*claim.id.as_uuid())
        .bind(claim.status.to_string())
        .bind(Json(claim))
        .bind(claim.created_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;
        Ok(())
    }

    /// Retrieves a document by claim id
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimDocumentRow, DatabaseError> {
        sqlx::query_as::<_, ClaimDocumentRow>(
            r#"
            SELECT claim_id, status, document, created_at, updated_at
            FROM claim_documents
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::classify)?
        .ok_or_else(|| DatabaseError::not_found(ENTITY, claim_id))
    }

    /// Applies `change` to a document under a row lock and writes it back
    pub async fn modify<F>(&self, claim_id: Uuid, change: F) -> Result<ClaimWorkflow, DatabaseError>
    where
        F: FnOnce(&mut ClaimWorkflow) -> Result<(), DatabaseError>,
    {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::classify)?;

        let Json(mut claim) = sqlx::query_scalar::<_, Json<ClaimWorkflow>>(
            "SELECT document FROM claim_documents WHERE claim_id = $1 FOR UPDATE",
        )
        .bind(claim_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::classify)?
        .ok_or_else(|| DatabaseError::not_found(ENTITY, claim_id))?;

        change(&mut claim)?;

        sqlx::query(
            r#"
            UPDATE claim_documents
            SET document = $2, status = $3, updated_at = NOW()
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id)
        .bind(Json(&claim))
        .bind(claim.status.to_string())
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::classify)?;

        tx.commit().await.map_err(DatabaseError::classify)?;
        debug!(claim_id = %claim_id, "Claim document updated");
        Ok(claim)
    }

    /// Deletes every document, returning how many were removed
    pub async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM claim_documents")
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;
        Ok(result.rows_affected())
    }

    /// Counts documents, optionally restricted to one status
    pub async fn count(&self, status: Option<&str>) -> Result<i64, DatabaseError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM claim_documents WHERE $1::TEXT IS NULL OR status = $1",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }
}

/// Database row for a claim document
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimDocumentRow {
    pub claim_id: Uuid,
    pub status: String,
    pub document: Json<ClaimWorkflow>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimDocumentRow {
    pub fn into_claim(self) -> ClaimWorkflow {
        self.document.0
    }
}
