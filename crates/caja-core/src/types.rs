//! # Domain Types
//!
//! Core domain types used throughout the Caja back office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ CatalogProduct  │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id, uuid       │   │  sale_id (FK)   │       │
//! │  │  list_price     │   │  branch_id      │   │  product_id?    │       │
//! │  │  purchase_price?│   │  customer_id?   │   │  price, qty     │       │
//! │  │  commission %   │   │  SaleTotals     │   │  vat, discount  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Branch      │   │  RecordStatus   │   │   InvoiceType   │       │
//! │  │  vat_enabled    │   │  Active         │   │  Ticket         │       │
//! │  └─────────────────┘   │  Inactive       │   │  ConsumerInvoice│       │
//! │                        └─────────────────┘   │  TaxCredit      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A sale owns its lines. A line holds a nullable, non-owning reference to
//! its catalog product; the numeric fields stay authoritative after the
//! product is removed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Record Status
// =============================================================================

/// Active/inactive flag shared by catalog records and sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(RecordStatus::Active),
            "inactive" => Ok(RecordStatus::Inactive),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

// =============================================================================
// Invoice Type
// =============================================================================

/// Fiscal document printed for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    /// Plain till receipt.
    Ticket,
    /// Final consumer invoice (VAT included in prices).
    ConsumerInvoice,
    /// Tax credit invoice for registered businesses.
    TaxCredit,
}

// =============================================================================
// Branch & Customer
// =============================================================================

/// A store location. Its VAT flag decides whether sale lines extract VAT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub vat_enabled: bool,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

/// A customer a sale can optionally be attributed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A product as stored in the catalog.
///
/// Authoritative for purchase price and commission percentage at the
/// moment a sale is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: i64,
    pub branch_id: Option<i64>,
    pub name: String,
    /// Current list price (2 dp).
    pub list_price: Decimal,
    /// Cost per unit; missing on products never purchased through the system.
    pub purchase_price: Option<Decimal>,
    /// Supplier or person the stock was purchased from.
    pub purchased_by: Option<String>,
    pub stock: Decimal,
    pub user_commission_percent: Option<Decimal>,
    pub branch_commission_percent: Option<Decimal>,
    pub status: RecordStatus,
}

impl CatalogProduct {
    /// Only active products are eligible for sale lines.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

/// A catalog product to be inserted (no database id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub branch_id: Option<i64>,
    pub name: String,
    pub list_price: Decimal,
    pub purchase_price: Option<Decimal>,
    pub purchased_by: Option<String>,
    pub stock: Decimal,
    pub user_commission_percent: Option<Decimal>,
    pub branch_commission_percent: Option<Decimal>,
}

// =============================================================================
// Sale Request
// =============================================================================

/// One requested line: a product at a caller-chosen price and quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub product_id: i64,
    /// Requested unit price (VAT included), 2 dp.
    pub price: Decimal,
    /// Requested quantity, 4 dp.
    pub quantity: Decimal,
}

/// Input of the sale-generation entrypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSaleRequest {
    pub branch_id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub invoice_type: InvoiceType,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub shipping_cost: Option<Decimal>,
    #[serde(default)]
    pub customer_notes: Option<String>,
    pub products: Vec<SaleLineRequest>,
}

// =============================================================================
// Sale Totals
// =============================================================================

/// Sale-level totals, every field rounded to 2 dp after each accumulation.
///
/// `subtotal` mirrors `total`; tax-exclusive/inclusive splits are layered
/// on elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub total: Decimal,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total_profit: Decimal,
    pub gross_profit: Decimal,
    pub users_commission: Decimal,
    pub total_text: String,
}

// =============================================================================
// Sale Header
// =============================================================================

/// A sale header ready to be persisted (no database id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub uuid: String,
    pub branch_id: i64,
    pub customer_id: Option<i64>,
    pub user_id: i64,
    pub invoice_type: InvoiceType,
    pub paid: bool,
    pub shipping_cost: Decimal,
    pub customer_notes: Option<String>,
    pub totals: SaleTotals,
    pub status: RecordStatus,
}

/// A persisted sale header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub uuid: String,
    pub branch_id: i64,
    pub customer_id: Option<i64>,
    pub user_id: i64,
    pub invoice_type: InvoiceType,
    pub paid: bool,
    pub shipping_cost: Decimal,
    pub customer_notes: Option<String>,
    #[serde(flatten)]
    pub totals: SaleTotals,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale Line (sale detail)
// =============================================================================

/// A computed line waiting for its sale id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleLine {
    pub sale_id: i64,
    pub product_id: Option<i64>,
    pub purchase_price: Decimal,
    pub price: Decimal,
    pub quantity: Decimal,
    pub affected_sale: Decimal,
    pub discount: Decimal,
    pub vat: Option<Decimal>,
    pub user_commission: Decimal,
    pub branch_commission: Decimal,
}

/// A persisted sale line.
///
/// `product_id` becomes `None` when the catalog product is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: Option<i64>,
    pub purchase_price: Decimal,
    pub price: Decimal,
    pub quantity: Decimal,
    pub affected_sale: Decimal,
    pub discount: Decimal,
    pub vat: Option<Decimal>,
    pub user_commission: Decimal,
    pub branch_commission: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A sale with its customer and lines attached, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithRelations {
    #[serde(flatten)]
    pub sale: Sale,
    pub customer: Option<Customer>,
    pub sale_details: Vec<SaleLine>,
}

// =============================================================================
// Patch (tri-state field presence)
// =============================================================================

/// Presence of one field in a partial update payload.
///
/// ```text
/// {}                  → Missing
/// {"price": null}     → Null
/// {"price": "12.50"}  → Value(12.50)
/// ```
/// Declare the field with `#[serde(default)]` so an omitted key becomes
/// `Missing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    /// True iff the field carries a value (neither omitted nor null).
    #[inline]
    pub fn is_valid_value(&self) -> bool {
        matches!(self, Patch::Value(_))
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// The carried value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            Patch::Missing | Patch::Null => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// Product Update
// =============================================================================

/// Partial product update, as received by the product-update handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub price: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub branch_commission_percent: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub user_commission_percent: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub purchase_price: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub purchased_by: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub stock: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub status: Patch<RecordStatus>,
}
