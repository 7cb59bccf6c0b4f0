//! # Sale Repository
//!
//! Database operations for sale headers and sale details.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. HEADER                                                             │
//! │     └── insert_header(NewSale) → Sale { id, status: Active }           │
//! │                                                                         │
//! │  2. LINES (one transaction for the batch)                              │
//! │     └── insert_lines([NewSaleLine]) → [SaleLine]                       │
//! │                                                                         │
//! │  3. READ BACK                                                          │
//! │     └── get_with_relations(id, uuid) → Sale + customer + details       │
//! │                                                                         │
//! │  4. (OPTIONAL) DEACTIVATE                                              │
//! │     └── update_status(id, Inactive)                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Steps 1 and 2 are separate writes: a header can exist without lines.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{decimal_text, parse_decimal, parse_optional_decimal};
use crate::error::{DbError, DbResult};
use crate::repository::customer::CustomerRepository;
use caja_core::money::{CURRENCY_SCALE, QUANTITY_SCALE};
use caja_core::{
    InvoiceType, NewSale, NewSaleLine, RecordStatus, Sale, SaleLine, SaleTotals,
    SaleWithRelations,
};

const SALE_COLUMNS: &str = "id, uuid, branch_id, customer_id, user_id, invoice_type, paid, \
     shipping_cost, customer_notes, total, subtotal, vat, total_profit, gross_profit, \
     users_commission, total_text, status, created_at, updated_at";

const LINE_COLUMNS: &str = "id, sale_id, product_id, purchase_price, price, quantity, \
     affected_sale, discount, vat, user_commission, branch_commission, created_at";

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    uuid: String,
    branch_id: i64,
    customer_id: Option<i64>,
    user_id: i64,
    invoice_type: InvoiceType,
    paid: bool,
    shipping_cost: String,
    customer_notes: Option<String>,
    total: String,
    subtotal: String,
    vat: String,
    total_profit: String,
    gross_profit: String,
    users_commission: String,
    total_text: String,
    status: RecordStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_domain(self) -> DbResult<Sale> {
        Ok(Sale {
            id: self.id,
            uuid: self.uuid,
            branch_id: self.branch_id,
            customer_id: self.customer_id,
            user_id: self.user_id,
            invoice_type: self.invoice_type,
            paid: self.paid,
            shipping_cost: parse_decimal("shipping_cost", &self.shipping_cost)?,
            customer_notes: self.customer_notes,
            totals: SaleTotals {
                total: parse_decimal("total", &self.total)?,
                subtotal: parse_decimal("subtotal", &self.subtotal)?,
                vat: parse_decimal("vat", &self.vat)?,
                total_profit: parse_decimal("total_profit", &self.total_profit)?,
                gross_profit: parse_decimal("gross_profit", &self.gross_profit)?,
                users_commission: parse_decimal("users_commission", &self.users_commission)?,
                total_text: self.total_text,
            },
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleLineRow {
    id: i64,
    sale_id: i64,
    product_id: Option<i64>,
    purchase_price: String,
    price: String,
    quantity: String,
    affected_sale: String,
    discount: String,
    vat: Option<String>,
    user_commission: String,
    branch_commission: String,
    created_at: DateTime<Utc>,
}

impl SaleLineRow {
    fn into_domain(self) -> DbResult<SaleLine> {
        Ok(SaleLine {
            id: self.id,
            sale_id: self.sale_id,
            product_id: self.product_id,
            purchase_price: parse_decimal("purchase_price", &self.purchase_price)?,
            price: parse_decimal("price", &self.price)?,
            quantity: parse_decimal("quantity", &self.quantity)?,
            affected_sale: parse_decimal("affected_sale", &self.affected_sale)?,
            discount: parse_decimal("discount", &self.discount)?,
            vat: parse_optional_decimal("vat", self.vat.as_deref())?,
            user_commission: parse_decimal("user_commission", &self.user_commission)?,
            branch_commission: parse_decimal("branch_commission", &self.branch_commission)?,
            created_at: self.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {} FROM sales WHERE id = ?1",
            SALE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SaleRow::into_domain).transpose()
    }

    /// Inserts a sale header and returns it with its generated id.
    pub async fn insert_header(&self, sale: &NewSale) -> DbResult<Sale> {
        debug!(uuid = %sale.uuid, branch_id = sale.branch_id, "Inserting sale header");

        let now = Utc::now();
        let totals = &sale.totals;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                uuid, branch_id, customer_id, user_id, invoice_type, paid,
                shipping_cost, customer_notes,
                total, subtotal, vat, total_profit, gross_profit, users_commission, total_text,
                status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8,
                ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, ?17
            )
            "#,
        )
        .bind(&sale.uuid)
        .bind(sale.branch_id)
        .bind(sale.customer_id)
        .bind(sale.user_id)
        .bind(sale.invoice_type)
        .bind(sale.paid)
        .bind(decimal_text(sale.shipping_cost, CURRENCY_SCALE))
        .bind(&sale.customer_notes)
        .bind(decimal_text(totals.total, CURRENCY_SCALE))
        .bind(decimal_text(totals.subtotal, CURRENCY_SCALE))
        .bind(decimal_text(totals.vat, CURRENCY_SCALE))
        .bind(decimal_text(totals.total_profit, CURRENCY_SCALE))
        .bind(decimal_text(totals.gross_profit, CURRENCY_SCALE))
        .bind(decimal_text(totals.users_commission, CURRENCY_SCALE))
        .bind(&totals.total_text)
        .bind(sale.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Sale {
            id: result.last_insert_rowid(),
            uuid: sale.uuid.clone(),
            branch_id: sale.branch_id,
            customer_id: sale.customer_id,
            user_id: sale.user_id,
            invoice_type: sale.invoice_type,
            paid: sale.paid,
            shipping_cost: sale.shipping_cost,
            customer_notes: sale.customer_notes.clone(),
            totals: sale.totals.clone(),
            status: sale.status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Inserts a batch of lines in one transaction and returns the stored rows.
    ///
    /// Either every line is written or none is.
    pub async fn insert_lines(&self, lines: &[NewSaleLine]) -> DbResult<Vec<SaleLine>> {
        debug!(lines = lines.len(), "Inserting sale lines");

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut stored = Vec::with_capacity(lines.len());
        for line in lines {
            let result = sqlx::query(
                r#"
                INSERT INTO sale_details (
                    sale_id, product_id, purchase_price, price, quantity,
                    affected_sale, discount, vat, user_commission, branch_commission,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(line.sale_id)
            .bind(line.product_id)
            .bind(decimal_text(line.purchase_price, CURRENCY_SCALE))
            .bind(decimal_text(line.price, CURRENCY_SCALE))
            .bind(decimal_text(line.quantity, QUANTITY_SCALE))
            .bind(decimal_text(line.affected_sale, QUANTITY_SCALE))
            .bind(decimal_text(line.discount, QUANTITY_SCALE))
            .bind(line.vat.map(|vat| decimal_text(vat, QUANTITY_SCALE)))
            .bind(decimal_text(line.user_commission, QUANTITY_SCALE))
            .bind(decimal_text(line.branch_commission, QUANTITY_SCALE))
            .bind(now)
            .execute(&mut *tx)
            .await?;

            stored.push(SaleLine {
                id: result.last_insert_rowid(),
                sale_id: line.sale_id,
                product_id: line.product_id,
                purchase_price: line.purchase_price,
                price: line.price,
                quantity: line.quantity,
                affected_sale: line.affected_sale,
                discount: line.discount,
                vat: line.vat,
                user_commission: line.user_commission,
                branch_commission: line.branch_commission,
                created_at: now,
            });
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(stored)
    }

    /// Gets the lines of a sale in insertion order.
    pub async fn get_lines(&self, sale_id: i64) -> DbResult<Vec<SaleLine>> {
        let rows = sqlx::query_as::<_, SaleLineRow>(&format!(
            "SELECT {} FROM sale_details WHERE sale_id = ?1 ORDER BY id",
            LINE_COLUMNS
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleLineRow::into_domain).collect()
    }

    /// Loads a sale by id and uuid with its customer and lines.
    ///
    /// ## Returns
    /// * `Ok(None)` - No sale matches both id and uuid
    pub async fn get_with_relations(
        &self,
        id: i64,
        uuid: &str,
    ) -> DbResult<Option<SaleWithRelations>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {} FROM sales WHERE id = ?1 AND uuid = ?2",
            SALE_COLUMNS
        ))
        .bind(id)
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let sale = row.into_domain()?;

        let customer = match sale.customer_id {
            Some(customer_id) => {
                CustomerRepository::new(self.pool.clone())
                    .get_by_id(customer_id)
                    .await?
            }
            None => None,
        };
        let sale_details = self.get_lines(sale.id).await?;

        Ok(Some(SaleWithRelations {
            sale,
            customer,
            sale_details,
        }))
    }

    /// Sets a sale active or inactive.
    pub async fn update_status(&self, id: i64, status: RecordStatus) -> DbResult<()> {
        debug!(id, status = ?status, "Updating sale status");

        let result = sqlx::query("UPDATE sales SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Lists a branch's sales, newest first.
    pub async fn list_by_branch(&self, branch_id: i64, limit: u32) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {} FROM sales WHERE branch_id = ?1 ORDER BY id DESC LIMIT ?2",
            SALE_COLUMNS
        ))
        .bind(branch_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleRow::into_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use caja_core::NewProduct;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn totals(total: Decimal) -> SaleTotals {
        SaleTotals {
            total,
            subtotal: total,
            vat: Decimal::ZERO,
            total_profit: dec!(8.00),
            gross_profit: dec!(4.00),
            users_commission: dec!(4.00),
            total_text: "VEINTE DOLARES CON CERO CENTAVOS 00/100".to_string(),
        }
    }

    fn new_sale(branch_id: i64, customer_id: Option<i64>, uuid: &str) -> NewSale {
        NewSale {
            uuid: uuid.to_string(),
            branch_id,
            customer_id,
            user_id: 7,
            invoice_type: InvoiceType::ConsumerInvoice,
            paid: true,
            shipping_cost: Decimal::ZERO,
            customer_notes: Some("Sin bolsa".to_string()),
            totals: totals(dec!(20.00)),
            status: RecordStatus::Active,
        }
    }

    fn new_line(sale_id: i64, product_id: Option<i64>) -> NewSaleLine {
        NewSaleLine {
            sale_id,
            product_id,
            purchase_price: dec!(6.00),
            price: dec!(10.00),
            quantity: dec!(2),
            affected_sale: dec!(20.0000),
            discount: Decimal::ZERO,
            vat: Some(Decimal::ZERO),
            user_commission: dec!(4.0000),
            branch_commission: dec!(4.0000),
        }
    }

    #[tokio::test]
    async fn test_header_lines_and_relations() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let branch = db.branches().insert("Centro", false).await.unwrap();
        let customer = db.customers().insert("Ana", None, None).await.unwrap();

        let sale = db
            .sales()
            .insert_header(&new_sale(branch.id, Some(customer.id), "sale-uuid-1"))
            .await
            .unwrap();
        let lines = db
            .sales()
            .insert_lines(&[new_line(sale.id, None), new_line(sale.id, None)])
            .await
            .unwrap();
        assert_eq!(lines.len(), 2);

        let loaded = db
            .sales()
            .get_with_relations(sale.id, "sale-uuid-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.sale.totals.total, dec!(20.00));
        assert_eq!(loaded.sale.invoice_type, InvoiceType::ConsumerInvoice);
        assert_eq!(loaded.customer.map(|c| c.id), Some(customer.id));
        assert_eq!(loaded.sale_details.len(), 2);
        assert_eq!(loaded.sale_details[0].affected_sale, dec!(20));

        assert!(db
            .sales()
            .get_with_relations(sale.id, "other-uuid")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_line_batch_is_atomic() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let branch = db.branches().insert("Centro", false).await.unwrap();
        let sale = db
            .sales()
            .insert_header(&new_sale(branch.id, None, "sale-uuid-2"))
            .await
            .unwrap();

        // Second line references a sale that does not exist.
        let result = db
            .sales()
            .insert_lines(&[new_line(sale.id, None), new_line(sale.id + 100, None)])
            .await;
        assert!(result.is_err());
        assert!(db.sales().get_lines(sale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_product_leaves_line_intact() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let branch = db.branches().insert("Centro", false).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                branch_id: Some(branch.id),
                name: "Pan".to_string(),
                list_price: dec!(10.00),
                purchase_price: Some(dec!(6.00)),
                purchased_by: None,
                stock: dec!(5),
                user_commission_percent: None,
                branch_commission_percent: None,
            })
            .await
            .unwrap();
        let sale = db
            .sales()
            .insert_header(&new_sale(branch.id, None, "sale-uuid-3"))
            .await
            .unwrap();
        db.sales()
            .insert_lines(&[new_line(sale.id, Some(product.id))])
            .await
            .unwrap();

        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(product.id)
            .execute(db.pool())
            .await
            .unwrap();

        let lines = db.sales().get_lines(sale.id).await.unwrap();
        assert_eq!(lines[0].product_id, None);
        assert_eq!(lines[0].price, dec!(10.00));
    }

    #[tokio::test]
    async fn test_update_status_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let branch = db.branches().insert("Centro", false).await.unwrap();
        let first = db
            .sales()
            .insert_header(&new_sale(branch.id, None, "a"))
            .await
            .unwrap();
        let second = db
            .sales()
            .insert_header(&new_sale(branch.id, None, "b"))
            .await
            .unwrap();

        db.sales()
            .update_status(first.id, RecordStatus::Inactive)
            .await
            .unwrap();
        let reloaded = db.sales().get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, RecordStatus::Inactive);

        let listed = db.sales().list_by_branch(branch.id, 10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);

        assert!(matches!(
            db.sales().update_status(999, RecordStatus::Active).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
