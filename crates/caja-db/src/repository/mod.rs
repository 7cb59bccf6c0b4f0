//! # Repository Module
//!
//! Database repository implementations for the Caja back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SaleService / ProductService                                          │
//! │       │                                                                 │
//! │       │  db.products().find_active_by_ids(&[1, 2])                     │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── query_as::<_, ProductRow>(...)   row struct, TEXT decimals        │
//! │  └── ProductRow::into_domain()        parse → CatalogProduct           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BranchRepository`](branch::BranchRepository) - Branch lookup
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer lookup
//! - [`ProductRepository`](product::ProductRepository) - Catalog batch lookup and partial updates
//! - [`SaleRepository`](sale::SaleRepository) - Sale header and line persistence
//! - [`RoleRepository`](role::RoleRepository) - Role permission grants

pub mod branch;
pub mod customer;
pub mod product;
pub mod role;
pub mod sale;

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DbError, DbResult};

// =============================================================================
// Decimal Columns
// =============================================================================

/// Parses a TEXT decimal column.
pub(crate) fn parse_decimal(column: &str, value: &str) -> DbResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| DbError::decode(column, value))
}

/// Parses a nullable TEXT decimal column.
pub(crate) fn parse_optional_decimal(
    column: &str,
    value: Option<&str>,
) -> DbResult<Option<Decimal>> {
    value.map(|v| parse_decimal(column, v)).transpose()
}

/// Formats a decimal for a TEXT column with exactly `scale` places.
///
/// `20` at scale 4 is stored as `"20.0000"`, so a re-fetched value keeps
/// the precision it was computed at.
pub(crate) fn decimal_text(value: Decimal, scale: u32) -> String {
    let mut fixed = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(scale);
    fixed.to_string()
}
