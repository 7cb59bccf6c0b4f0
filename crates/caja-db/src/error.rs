//! # Database Errors
//!
//! ```text
//! sqlx::Error ─────────┐
//! MigrateError ────────┼──► DbError ──► SaleError / ProductUpdateError (caja-sales)
//! bad TEXT decimal ────┘
//! ```
//! Messages here may carry SQLite detail. The service layer logs them and
//! wraps them; it never shows them to a caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row for the id, or an UPDATE that touched nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// `field` is `table.column` as SQLite reports it.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A sale for a missing branch, a line for a missing sale, ...
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A stored value does not parse into its domain type.
    #[error("Cannot decode column {column}: '{value}'")]
    Decode { column: String, value: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin or commit of a multi-row write failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn decode(column: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::Decode {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

const UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";
const FOREIGN_KEY_MESSAGE: &str = "FOREIGN KEY constraint failed";

/// ```text
/// RowNotFound          → NotFound
/// Database (UNIQUE)    → UniqueViolation
/// Database (FOREIGN)   → ForeignKeyViolation
/// Database (other)     → QueryFailed
/// PoolTimedOut         → PoolExhausted
/// PoolClosed           → ConnectionFailed
/// ColumnDecode         → Decode
/// anything else        → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if let Some(field) = msg.strip_prefix(UNIQUE_PREFIX) {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains(FOREIGN_KEY_MESSAGE) {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            sqlx::Error::ColumnDecode { index, source } => {
                DbError::decode(index, source.to_string())
            }

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
