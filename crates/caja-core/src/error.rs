//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                          │
//! │  ├── CoreError        - Calculation and formatting failures            │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── PermissionError  - Product-update gate denials                    │
//! │                                                                         │
//! │  caja-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  caja-sales errors                                                     │
//! │  └── SaleError        - One variant per sale-generation failure kind   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → SaleError → caller      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A requested line references a product that is missing from the
    /// active catalog batch.
    #[error("Product not found for sale: {0}")]
    ProductNotFoundForSale(i64),

    /// The amount cannot be spelled out (negative, or one billion and above).
    #[error("Amount out of range for words formatting: {0}")]
    AmountOutOfRange(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Collection has too many entries.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },
}

// =============================================================================
// Permission Error
// =============================================================================

/// Product-update gate denials, one per guarded field group.
///
/// ## Evaluation Order
/// ```text
/// price ──► commissions ──► purchase data ──► stock
///   │            │                │              │
///   ▼            ▼                ▼              ▼
/// PriceUpdate  Commission   PurchaseData    StockUpdate
/// Denied       UpdateDenied UpdateDenied    Denied
/// ```
/// The first failing group wins; later groups are not evaluated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PermissionError {
    #[error("You do not have permission to update the product price")]
    PriceUpdateDenied,

    #[error("You do not have permission to update the product commissions")]
    CommissionUpdateDenied,

    #[error("You do not have permission to update the product purchase data")]
    PurchaseDataUpdateDenied,

    #[error("You do not have permission to update the product stock")]
    StockUpdateDenied,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
