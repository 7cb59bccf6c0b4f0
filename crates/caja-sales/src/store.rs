//! # Sale Store
//!
//! The storage operations sale generation consumes, behind one trait.
//!
//! ```text
//! SaleService<S: SaleStore>
//!      │
//!      ├── branch_by_id ───────────┐
//!      ├── customer_by_id ─────────┤ concurrent (step 1)
//!      ├── products_by_ids                       (step 2)
//!      ├── persist_sale_header                   (step 4)
//!      ├── persist_sale_lines                    (step 5)
//!      └── fetch_sale_with_relations             (step 6)
//!
//! impl SaleStore for caja_db::Database   ← production
//! impl SaleStore for RecordingStore      ← tests (call order, short batches)
//! ```

use caja_core::{
    Branch, CatalogProduct, Customer, NewSale, NewSaleLine, Sale, SaleLine, SaleWithRelations,
};
use caja_db::{Database, DbResult};

/// Storage collaborator of [`SaleService`](crate::SaleService).
///
/// Futures are awaited in place and never spawned, so they need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait SaleStore {
    async fn branch_by_id(&self, id: i64) -> DbResult<Option<Branch>>;

    async fn customer_by_id(&self, id: i64) -> DbResult<Option<Customer>>;

    /// Active products among `ids`.
    async fn products_by_ids(&self, ids: &[i64]) -> DbResult<Vec<CatalogProduct>>;

    async fn persist_sale_header(&self, sale: &NewSale) -> DbResult<Sale>;

    /// Returns the lines actually stored.
    async fn persist_sale_lines(&self, lines: &[NewSaleLine]) -> DbResult<Vec<SaleLine>>;

    async fn fetch_sale_with_relations(
        &self,
        id: i64,
        uuid: &str,
    ) -> DbResult<Option<SaleWithRelations>>;
}

impl SaleStore for Database {
    async fn branch_by_id(&self, id: i64) -> DbResult<Option<Branch>> {
        self.branches().get_by_id(id).await
    }

    async fn customer_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        self.customers().get_by_id(id).await
    }

    async fn products_by_ids(&self, ids: &[i64]) -> DbResult<Vec<CatalogProduct>> {
        self.products().find_active_by_ids(ids).await
    }

    async fn persist_sale_header(&self, sale: &NewSale) -> DbResult<Sale> {
        self.sales().insert_header(sale).await
    }

    async fn persist_sale_lines(&self, lines: &[NewSaleLine]) -> DbResult<Vec<SaleLine>> {
        self.sales().insert_lines(lines).await
    }

    async fn fetch_sale_with_relations(
        &self,
        id: i64,
        uuid: &str,
    ) -> DbResult<Option<SaleWithRelations>> {
        self.sales().get_with_relations(id, uuid).await
    }
}
