//! # Permission Evaluator
//!
//! Capability membership tests and the product-update gate.
//!
//! ## Model
//! ```text
//! Role ──(resolved by caller)──► [PermissionGrant { system_page, permission_name }]
//!                                             │
//!                                             ▼
//!                         has_permission(grants, "update_product_price")
//! ```
//! Grants are a flat set: exact, case-sensitive name match, no wildcard,
//! no hierarchy.
//!
//! ## Product-Update Gate
//! ```text
//! ┌───────────────────────────────┬──────────────────────────────────────┐
//! │ Field group present           │ Required permission                  │
//! ├───────────────────────────────┼──────────────────────────────────────┤
//! │ price                         │ update_product_price                 │
//! │ branch/user commission %      │ update_product_commissions           │
//! │ purchase price / purchased by │ update_product_purchase_data         │
//! │ stock                         │ update_product_stock                 │
//! └───────────────────────────────┴──────────────────────────────────────┘
//! ```
//! Groups are checked top to bottom and the first denial is returned.

use serde::{Deserialize, Serialize};

use crate::error::PermissionError;
use crate::types::ProductUpdate;

pub const UPDATE_PRODUCT_PRICE: &str = "update_product_price";
pub const UPDATE_PRODUCT_COMMISSIONS: &str = "update_product_commissions";
pub const UPDATE_PRODUCT_PURCHASE_DATA: &str = "update_product_purchase_data";
pub const UPDATE_PRODUCT_STOCK: &str = "update_product_stock";

/// Back-office page a permission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SystemPage {
    Branches,
    Brands,
    Categories,
    Customers,
    Products,
    Sales,
    Users,
    Roles,
}

/// A (page, action-name) pair granted to a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    pub system_page: SystemPage,
    pub permission_name: String,
}

impl PermissionGrant {
    pub fn new(system_page: SystemPage, permission_name: impl Into<String>) -> Self {
        PermissionGrant {
            system_page,
            permission_name: permission_name.into(),
        }
    }
}

/// True iff some grant's permission name equals `name` exactly.
pub fn has_permission(grants: &[PermissionGrant], name: &str) -> bool {
    grants.iter().any(|g| g.permission_name == name)
}

/// Checks a product update against the caller's grants.
///
/// ## Example
/// ```rust
/// use caja_core::permission::evaluate_product_update_permission;
/// use caja_core::{Patch, PermissionError, ProductUpdate};
/// use rust_decimal::Decimal;
///
/// let update = ProductUpdate {
///     stock: Patch::Value(Decimal::TEN),
///     ..Default::default()
/// };
/// assert_eq!(
///     evaluate_product_update_permission(&update, &[]),
///     Err(PermissionError::StockUpdateDenied)
/// );
/// ```
pub fn evaluate_product_update_permission(
    update: &ProductUpdate,
    grants: &[PermissionGrant],
) -> Result<(), PermissionError> {
    let checks = [
        (
            update.price.is_valid_value(),
            UPDATE_PRODUCT_PRICE,
            PermissionError::PriceUpdateDenied,
        ),
        (
            update.branch_commission_percent.is_valid_value()
                || update.user_commission_percent.is_valid_value(),
            UPDATE_PRODUCT_COMMISSIONS,
            PermissionError::CommissionUpdateDenied,
        ),
        (
            update.purchase_price.is_valid_value() || update.purchased_by.is_valid_value(),
            UPDATE_PRODUCT_PURCHASE_DATA,
            PermissionError::PurchaseDataUpdateDenied,
        ),
        (
            update.stock.is_valid_value(),
            UPDATE_PRODUCT_STOCK,
            PermissionError::StockUpdateDenied,
        ),
    ];

    for (present, permission, denial) in checks {
        if present && !has_permission(grants, permission) {
            return Err(denial);
        }
    }

    Ok(())
}
