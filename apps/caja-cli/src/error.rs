//! # Command Error
//!
//! What a failed command prints to stderr:
//! ```json
//! {
//!   "code": "NOT_FOUND",
//!   "status": 404,
//!   "message": "Branch not found: 7"
//! }
//! ```

use serde::Serialize;

use caja_core::CoreError;
use caja_db::DbError;
use caja_sales::{ErrorCode, ProductUpdateError, SaleError};

/// Error returned from commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Transport status for `code`
    pub status: u16,

    /// Human-readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            status: code.http_status(),
            message: message.into(),
        }
    }

    /// Creates a validation error (bad arguments, unreadable request file).
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        ApiError::new(err.code(), err.to_string())
    }
}

impl From<ProductUpdateError> for ApiError {
    fn from(err: ProductUpdateError) -> Self {
        ApiError::new(err.code(), err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            _ => ApiError::new(ErrorCode::DatabaseError, "Database operation failed"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
