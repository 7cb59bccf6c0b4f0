//! # Service Error Types
//!
//! One error kind per failure a caller must be able to tell apart.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in caja-sales                             │
//! │                                                                         │
//! │  ValidationError ─────────────────┐                                     │
//! │  CoreError (calculator) ──────────┤                                     │
//! │  DbError (caught + logged with ───┼──► SaleError / ProductUpdateError  │
//! │           operation name)         │            │                        │
//! │  PermissionError ─────────────────┘            ▼                        │
//! │                                       .code() → ErrorCode               │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                                       .http_status() → 404/400/409/...  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Storage errors stay reachable through `source()` but are never rendered
//! into the caller-facing message.

use serde::Serialize;
use thiserror::Error;

use caja_core::{CoreError, PermissionError, ValidationError};
use caja_db::DbError;

// =============================================================================
// Error Code
// =============================================================================

/// Machine-readable error category.
///
/// ## Status Mapping
/// ```text
/// NotFound          → 404
/// ValidationError   → 400
/// Conflict          → 409
/// PermissionDenied  → 403
/// DatabaseError     → 500
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    Conflict,
    PermissionDenied,
    DatabaseError,
}

impl ErrorCode {
    /// Transport status code for this category.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::ValidationError => 400,
            ErrorCode::Conflict => 409,
            ErrorCode::PermissionDenied => 403,
            ErrorCode::DatabaseError => 500,
        }
    }
}

// =============================================================================
// Sale Error
// =============================================================================

/// Failures of sale generation.
#[derive(Debug, Error)]
pub enum SaleError {
    #[error("Branch not found: {0}")]
    BranchNotFound(i64),

    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// A requested product is missing from the active catalog batch.
    #[error("Product not found for sale: {0}")]
    ProductNotFoundForSale(i64),

    /// The catalog batch came back empty.
    #[error("No products found for sale")]
    NoProductsForSale,

    #[error("Invalid sale request: {0}")]
    Validation(#[from] ValidationError),

    /// A branch/customer/catalog lookup hit a storage failure.
    #[error("Lookup failed during {operation}")]
    Lookup {
        operation: &'static str,
        #[source]
        source: DbError,
    },

    #[error("Sale creation failed")]
    SaleCreationFailed(#[source] DbError),

    /// The header is committed; its lines are not.
    #[error("Sale detail creation failed for sale {sale_id}")]
    SaleDetailCreationFailed {
        sale_id: i64,
        #[source]
        source: DbError,
    },

    /// Fewer lines were stored than requested. The header is committed.
    #[error("Missing products in sale {sale_id}: expected {expected} lines, stored {stored}")]
    SaleLinesIncomplete {
        sale_id: i64,
        expected: usize,
        stored: usize,
    },

    /// The sale may be fully stored even though it could not be read back.
    #[error("Could not retrieve created sale {sale_id}")]
    SaleRetrievalFailed {
        sale_id: i64,
        #[source]
        source: Option<DbError>,
    },
}

impl SaleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SaleError::BranchNotFound(_)
            | SaleError::CustomerNotFound(_)
            | SaleError::ProductNotFoundForSale(_)
            | SaleError::NoProductsForSale => ErrorCode::NotFound,
            SaleError::Validation(_) => ErrorCode::ValidationError,
            SaleError::SaleLinesIncomplete { .. } => ErrorCode::Conflict,
            SaleError::Lookup { .. }
            | SaleError::SaleCreationFailed(_)
            | SaleError::SaleDetailCreationFailed { .. }
            | SaleError::SaleRetrievalFailed { .. } => ErrorCode::DatabaseError,
        }
    }
}

impl From<CoreError> for SaleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFoundForSale(id) => SaleError::ProductNotFoundForSale(id),
            CoreError::Validation(e) => SaleError::Validation(e),
            CoreError::AmountOutOfRange(amount) => {
                SaleError::Validation(ValidationError::OutOfRange {
                    field: "total".to_string(),
                    min: "0".to_string(),
                    max: format!("999999999.99 (got {})", amount),
                })
            }
        }
    }
}

/// Result type for sale operations.
pub type SaleResult<T> = Result<T, SaleError>;

// =============================================================================
// Product Update Error
// =============================================================================

/// Failures of the permission-checked product update.
#[derive(Debug, Error)]
pub enum ProductUpdateError {
    /// One of the four per-field-group denials.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionError),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Invalid product update: {0}")]
    Validation(#[from] ValidationError),

    #[error("Product update failed during {operation}")]
    Storage {
        operation: &'static str,
        #[source]
        source: DbError,
    },
}

impl ProductUpdateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProductUpdateError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            ProductUpdateError::ProductNotFound(_) => ErrorCode::NotFound,
            ProductUpdateError::Validation(_) => ErrorCode::ValidationError,
            ProductUpdateError::Storage { .. } => ErrorCode::DatabaseError,
        }
    }
}
