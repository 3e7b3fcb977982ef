//! Database error types
//!
//! Errors raised by the pool, migrations and the claim document store, and
//! their translation into the domain's `PortError`.

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A document update was rejected before being written
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("ClaimWorkflow", "42");
    /// assert!(error.to_string().contains("ClaimWorkflow"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_) | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }

    /// Maps a SQLx error to a specific variant based on the PostgreSQL
    /// error code
    pub fn classify(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                    Some("23514") => DatabaseError::ConstraintViolation(db_err.message().to_string()),
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            }
            _ => DatabaseError::SqlError(error),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity, id } => PortError::NotFound { entity_type: entity, id },
            DatabaseError::DuplicateEntry(message) => PortError::Conflict { message },
            DatabaseError::InvalidUpdate(message) => PortError::Validation { message },
            DatabaseError::ConnectionFailed(message) => PortError::connection(message),
            DatabaseError::PoolExhausted => PortError::Timeout {
                operation: "acquire database connection".to_string(),
                duration_ms: 0,
            },
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let port: PortError = DatabaseError::not_found("ClaimWorkflow", "abc").into();
        assert!(port.is_not_found());
        assert!(port.to_string().contains("abc"));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let port: PortError = DatabaseError::DuplicateEntry("claim_documents_pkey".into()).into();
        assert!(matches!(port, PortError::Conflict { .. }));
    }

    #[test]
    fn test_connection_errors_are_transient() {
        let port: PortError = DatabaseError::ConnectionFailed("refused".into()).into();
        assert!(port.is_transient());
        assert!(DatabaseError::PoolExhausted.is_connection_error());
    }

    #[test]
    fn test_row_not_found_is_not_classified_as_missing_claim() {
        let err = DatabaseError::classify(sqlx::Error::RowNotFound);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_document_decode_failure_maps_to_internal() {
        let err = DatabaseError::classify(sqlx::Error::Decode("missing field `status`".into()));
        assert!(matches!(err, DatabaseError::SqlError(sqlx::Error::Decode(_))));

        let port: PortError = err.into();
        assert!(matches!(port, PortError::Internal { .. }));
        assert!(!port.is_transient());
    }
}
