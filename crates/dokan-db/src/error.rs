//! # Store Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error ──► DbError ──┬──► StorageError   (checkout, storage.rs)   │
//! │                            └──► ApiError       (admin + lookup routes)  │
//! │                                                                         │
//! │  Constraint failures are sorted by sqlx's ErrorKind, so callers can     │
//! │  match on UniqueViolation instead of parsing SQLite messages.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dokan_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row for this id / order number, or an `UPDATE` matched nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// `field` is `table.column` straight from SQLite until a repository
    /// rewrites it with the offending value.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A CHECK in the schema refused the row (price < 0, usage over cap…).
    #[error("Check constraint failed: {0}")]
    CheckViolation(String),

    /// The conditional increment found the code already at its cap.
    #[error("Discount code {0} has reached its usage limit")]
    UsageCapReached(String),

    /// Rejected by a core rule before any SQL ran.
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Stored text that no longer maps onto a domain enum or timestamp.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True for a UNIQUE failure reported on `column` (`table.column`).
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field, .. } if field == column)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        // "UNIQUE constraint failed: orders.order_number"
                        field: message
                            .rsplit(": ")
                            .next()
                            .unwrap_or(message.as_str())
                            .to_string(),
                        value: "unknown".to_string(),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        DbError::CheckViolation(message)
                    }
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::CorruptRow(format!("column {index}: {source}"))
            }
            sqlx::Error::Decode(source) => DbError::CorruptRow(source.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers() {
        let err = DbError::not_found("Order", "ORD-1");
        assert_eq!(err.to_string(), "Order not found: ORD-1");

        let err = DbError::duplicate("orders.order_number", "ORD-1");
        assert!(err.is_unique_violation_on("orders.order_number"));
        assert!(!err.is_unique_violation_on("discount_codes.code"));
    }

    #[test]
    fn test_pool_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_constraint_kinds_from_sqlite() {
        let db = crate::Database::new(crate::DbConfig::in_memory()).await.unwrap();

        sqlx::query("CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER CHECK (n >= 0))")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO t VALUES ('a', 1)")
            .execute(db.pool())
            .await
            .unwrap();

        let dup: DbError = sqlx::query("INSERT INTO t VALUES ('a', 2)")
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();
        assert!(dup.is_unique_violation_on("t.id"), "{dup:?}");

        let check: DbError = sqlx::query("INSERT INTO t VALUES ('b', -1)")
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();
        assert!(matches!(check, DbError::CheckViolation(_)), "{check:?}");
    }
}
