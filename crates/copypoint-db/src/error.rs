//! # Database Error Types
//!
//! Error types for database operations and the service layer on top.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module)      ← adds context and categorization           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (this module) ← merges domain errors (CoreError) with     │
//! │       │                       persistence failures so callers can       │
//! │       ▼                       tell "fix your input / configure the      │
//! │  Caller / UI layer            matrix" apart from "storage broke"        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use copypoint_core::CoreError;

// =============================================================================
// DbError
// =============================================================================

/// Database operation errors.
///
/// These wrap sqlx errors and provide additional context. Every variant
/// is fatal to the current operation; nothing here is auto-retried.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate SKU, duplicate matrix key).
    #[error("duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation (e.g., a sale line referencing a
    /// product that does not exist).
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// A stored value could not be decoded into its domain type.
    #[error("decode failed for {column}: {reason}")]
    Decode { column: String, reason: String },

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound { entity: entity.into(), id: id.to_string() }
    }
}

/// Convert sqlx errors to DbError.
///
/// SQLite reports constraint violations through the database error
/// message; we classify on the message prefix.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation { message: msg.to_string() }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::ColumnDecode { index, source } => DbError::Decode {
                column: index,
                reason: source.to_string(),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// ServiceError
// =============================================================================

/// Error type returned by the sale engine and price resolver.
///
/// Keeps the three failure families of the system distinguishable:
/// invalid input and unmet business rules arrive as [`CoreError`],
/// persistence failures as [`DbError`]. Callers present configuration
/// errors ("configure this price combination") differently from system
/// faults, and never auto-retry either.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// True when the failure is the caller's input or a business rule,
    /// as opposed to a storage fault.
    pub fn is_domain(&self) -> bool {
        matches!(self, ServiceError::Core(_))
    }
}

/// Result type for engine/resolver operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_service_error_families() {
        let domain: ServiceError = CoreError::EmptyCart.into();
        assert!(domain.is_domain());

        let storage: ServiceError = DbError::PoolExhausted.into();
        assert!(!storage.is_domain());
    }
}
