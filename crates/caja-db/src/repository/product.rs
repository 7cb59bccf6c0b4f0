//! # Product Repository
//!
//! Database operations for catalog products.
//!
//! ## Key Operations
//! - Batched lookup of the active products referenced by a sale
//! - Inserts
//! - Partial updates driven by a [`ProductUpdate`]
//!
//! ## Partial Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductUpdate field          SQL fragment                              │
//! │  ─────────────────────────    ───────────────────────────────           │
//! │  Patch::Missing           →   (column untouched)                        │
//! │  Patch::Null              →   , column = NULL                           │
//! │  Patch::Value(v)          →   , column = ?                              │
//! │                                                                         │
//! │  UPDATE products SET updated_at = ? [, ...] WHERE id = ?               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::{decimal_text, parse_decimal, parse_optional_decimal};
use crate::error::{DbError, DbResult};
use caja_core::money::{CURRENCY_SCALE, QUANTITY_SCALE};
use caja_core::{CatalogProduct, NewProduct, Patch, ProductUpdate, RecordStatus};

const PRODUCT_COLUMNS: &str = "id, branch_id, name, price, purchase_price, purchased_by, stock, \
     user_commission_percent, branch_commission_percent, status";

/// A `products` row with its decimal columns still as text.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    branch_id: Option<i64>,
    name: String,
    price: String,
    purchase_price: Option<String>,
    purchased_by: Option<String>,
    stock: String,
    user_commission_percent: Option<String>,
    branch_commission_percent: Option<String>,
    status: RecordStatus,
}

impl ProductRow {
    fn into_domain(self) -> DbResult<CatalogProduct> {
        Ok(CatalogProduct {
            id: self.id,
            branch_id: self.branch_id,
            name: self.name,
            list_price: parse_decimal("price", &self.price)?,
            purchase_price: parse_optional_decimal(
                "purchase_price",
                self.purchase_price.as_deref(),
            )?,
            purchased_by: self.purchased_by,
            stock: parse_decimal("stock", &self.stock)?,
            user_commission_percent: parse_optional_decimal(
                "user_commission_percent",
                self.user_commission_percent.as_deref(),
            )?,
            branch_commission_percent: parse_optional_decimal(
                "branch_commission_percent",
                self.branch_commission_percent.as_deref(),
            )?,
            status: self.status,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let batch = repo.find_active_by_ids(&[1, 2, 3]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID, whatever its status.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<CatalogProduct>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_domain).transpose()
    }

    /// Loads the active products among `ids` in one query.
    ///
    /// Ids that are missing or inactive are simply absent from the result;
    /// order is unspecified.
    pub async fn find_active_by_ids(&self, ids: &[i64]) -> DbResult<Vec<CatalogProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = ids.len(), "Loading products for sale");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM products WHERE status = 'active' AND id IN (",
            PRODUCT_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = query
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(found = rows.len(), "Products loaded");
        rows.into_iter().map(ProductRow::into_domain).collect()
    }

    /// Inserts a new active product and returns it.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<CatalogProduct> {
        debug!(name = %product.name, "Inserting product");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                branch_id, name, price, purchase_price, purchased_by, stock,
                user_commission_percent, branch_commission_percent,
                status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8,
                ?9, ?10, ?10
            )
            "#,
        )
        .bind(product.branch_id)
        .bind(&product.name)
        .bind(decimal_text(product.list_price, CURRENCY_SCALE))
        .bind(product.purchase_price.map(|v| decimal_text(v, CURRENCY_SCALE)))
        .bind(&product.purchased_by)
        .bind(decimal_text(product.stock, QUANTITY_SCALE))
        .bind(product.user_commission_percent.map(|v| decimal_text(v, CURRENCY_SCALE)))
        .bind(product.branch_commission_percent.map(|v| decimal_text(v, CURRENCY_SCALE)))
        .bind(RecordStatus::Active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(CatalogProduct {
            id: result.last_insert_rowid(),
            branch_id: product.branch_id,
            name: product.name.clone(),
            list_price: product.list_price,
            purchase_price: product.purchase_price,
            purchased_by: product.purchased_by.clone(),
            stock: product.stock,
            user_commission_percent: product.user_commission_percent,
            branch_commission_percent: product.branch_commission_percent,
            status: RecordStatus::Active,
        })
    }

    /// Writes the fields present in `update` and returns the stored product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn apply_update(&self, id: i64, update: &ProductUpdate) -> DbResult<CatalogProduct> {
        debug!(id, "Updating product");

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE products SET updated_at = ");
        query.push_bind(Utc::now());

        push_text(&mut query, "name", &update.name);
        push_decimal(&mut query, "price", &update.price, CURRENCY_SCALE);
        push_decimal(
            &mut query,
            "branch_commission_percent",
            &update.branch_commission_percent,
            CURRENCY_SCALE,
        );
        push_decimal(
            &mut query,
            "user_commission_percent",
            &update.user_commission_percent,
            CURRENCY_SCALE,
        );
        push_decimal(&mut query, "purchase_price", &update.purchase_price, CURRENCY_SCALE);
        push_text(&mut query, "purchased_by", &update.purchased_by);
        push_decimal(&mut query, "stock", &update.stock, QUANTITY_SCALE);
        if let Patch::Value(status) = update.status {
            query.push(", status = ").push_bind(status);
        }

        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn push_decimal(
    query: &mut QueryBuilder<'_, Sqlite>,
    column: &str,
    patch: &Patch<Decimal>,
    scale: u32,
) {
    match patch {
        Patch::Missing => {}
        Patch::Null => {
            query.push(format!(", {} = NULL", column));
        }
        Patch::Value(value) => {
            query.push(format!(", {} = ", column)).push_bind(decimal_text(*value, scale));
        }
    }
}

fn push_text(query: &mut QueryBuilder<'_, Sqlite>, column: &str, patch: &Patch<String>) {
    match patch {
        Patch::Missing => {}
        Patch::Null => {
            query.push(format!(", {} = NULL", column));
        }
        Patch::Value(value) => {
            query.push(format!(", {} = ", column)).push_bind(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use rust_decimal_macros::dec;

    fn new_product(name: &str, price: Decimal) -> NewProduct {
        NewProduct {
            branch_id: None,
            name: name.to_string(),
            list_price: price,
            purchase_price: Some(dec!(6.00)),
            purchased_by: Some("Distribuidora Central".to_string()),
            stock: dec!(25),
            user_commission_percent: Some(dec!(50)),
            branch_commission_percent: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trips_decimals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let inserted = db.products().insert(&new_product("Café 500g", dec!(10.00))).await.unwrap();
        let fetched = db.products().get_by_id(inserted.id).await.unwrap().unwrap();

        assert_eq!(fetched, inserted);
        assert_eq!(fetched.list_price, dec!(10));
        assert_eq!(fetched.user_commission_percent, Some(dec!(50)));
    }

    #[tokio::test]
    async fn test_find_active_by_ids_skips_missing_and_inactive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let a = repo.insert(&new_product("A", dec!(1))).await.unwrap();
        let b = repo.insert(&new_product("B", dec!(2))).await.unwrap();
        repo.apply_update(
            b.id,
            &ProductUpdate {
                status: Patch::Value(RecordStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let found = repo.find_active_by_ids(&[a.id, b.id, 999]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a.id);

        assert!(repo.find_active_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_update_writes_only_present_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        let product = repo.insert(&new_product("Azúcar 1kg", dec!(1.25))).await.unwrap();

        let update = ProductUpdate {
            price: Patch::Value(dec!(1.40)),
            purchased_by: Patch::Null,
            ..Default::default()
        };
        let updated = repo.apply_update(product.id, &update).await.unwrap();

        assert_eq!(updated.list_price, dec!(1.40));
        assert_eq!(updated.purchased_by, None);
        assert_eq!(updated.purchase_price, Some(dec!(6.00)));
        assert_eq!(updated.stock, dec!(25));
        assert_eq!(updated.name, "Azúcar 1kg");
    }

    #[tokio::test]
    async fn test_apply_update_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db
            .products()
            .apply_update(
                42,
                &ProductUpdate {
                    stock: Patch::Value(dec!(1)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }
}
