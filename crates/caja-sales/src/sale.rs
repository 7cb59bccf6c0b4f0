//! # Sale Generation
//!
//! Single-pass orchestration of one sale: any failure aborts the rest.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0. validate request                     → Validation                   │
//! │  1. branch ∥ customer existence          → BranchNotFound /             │
//! │                                            CustomerNotFound             │
//! │  2. active catalog batch (one query)     → NoProductsForSale            │
//! │  3. calculator + totals fold + words     → ProductNotFoundForSale       │
//! │  4. persist header (new UUID)            → SaleCreationFailed           │
//! │  5. persist lines (header id attached)   → SaleDetailCreationFailed     │
//! │     stored count == requested count      → SaleLinesIncomplete          │
//! │  6. re-fetch with customer + details     → SaleRetrievalFailed          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Steps 4 and 5 are separate writes. A failure in step 5 or the count check
//! leaves a committed header without (all of) its lines.

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use caja_core::calculator::generate_sale_data;
use caja_core::money::round2;
use caja_core::validation::validate_generate_sale_request;
use caja_core::{Branch, GenerateSaleRequest, NewSale, RecordStatus, SaleWithRelations};
use caja_db::DbError;

use crate::error::{SaleError, SaleResult};
use crate::store::SaleStore;

/// Generates sales against a [`SaleStore`].
///
/// ## Usage
/// ```rust,ignore
/// let service = SaleService::new(db.clone());
/// let sale = service.generate_sale(&request, user_id).await?;
/// println!("{}", sale.sale.totals.total_text);
/// ```
#[derive(Debug, Clone)]
pub struct SaleService<S> {
    store: S,
}

impl<S: SaleStore> SaleService<S> {
    pub fn new(store: S) -> Self {
        SaleService { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a sale with its lines and returns it as stored.
    ///
    /// `user_id` is the authenticated caller recorded as the sale's creator.
    pub async fn generate_sale(
        &self,
        request: &GenerateSaleRequest,
        user_id: i64,
    ) -> SaleResult<SaleWithRelations> {
        debug!(
            branch_id = request.branch_id,
            customer_id = ?request.customer_id,
            lines = request.products.len(),
            "generate_sale"
        );

        if let Err(e) = validate_generate_sale_request(request) {
            warn!(branch_id = request.branch_id, error = %e, "Sale request rejected");
            return Err(e.into());
        }

        let branch = self.validate_references(request).await?;

        let product_ids = unique_product_ids(request);
        let products = self
            .store
            .products_by_ids(&product_ids)
            .await
            .map_err(|e| lookup_failed("products_lookup", e))?;
        if products.is_empty() {
            warn!(branch_id = branch.id, "No active products found for sale");
            return Err(SaleError::NoProductsForSale);
        }

        let computation = generate_sale_data(
            &products,
            &request.products,
            branch.vat_enabled,
            request.shipping_cost,
        )?;

        let header = NewSale {
            uuid: Uuid::new_v4().to_string(),
            branch_id: branch.id,
            customer_id: request.customer_id,
            user_id,
            invoice_type: request.invoice_type,
            paid: request.paid,
            shipping_cost: round2(request.shipping_cost.unwrap_or(Decimal::ZERO)),
            customer_notes: request.customer_notes.clone(),
            totals: computation.totals,
            status: RecordStatus::Active,
        };

        let sale = self.store.persist_sale_header(&header).await.map_err(|e| {
            error!(operation = "persist_sale_header", error = %e, "Sale creation failed");
            SaleError::SaleCreationFailed(e)
        })?;

        let expected = computation.lines.len();
        let lines: Vec<_> = computation
            .lines
            .into_iter()
            .map(|line| line.into_new_line(sale.id))
            .collect();

        let stored = self.store.persist_sale_lines(&lines).await.map_err(|e| {
            error!(
                operation = "persist_sale_lines",
                sale_id = sale.id,
                error = %e,
                "Sale detail creation failed"
            );
            SaleError::SaleDetailCreationFailed {
                sale_id: sale.id,
                source: e,
            }
        })?;

        if stored.len() != expected {
            error!(
                operation = "persist_sale_lines",
                sale_id = sale.id,
                expected,
                stored = stored.len(),
                "Missing products in sale"
            );
            return Err(SaleError::SaleLinesIncomplete {
                sale_id: sale.id,
                expected,
                stored: stored.len(),
            });
        }

        let created = match self.store.fetch_sale_with_relations(sale.id, &sale.uuid).await {
            Ok(Some(created)) => created,
            Ok(None) => {
                error!(
                    operation = "fetch_sale_with_relations",
                    sale_id = sale.id,
                    "Sale not found after creation"
                );
                return Err(SaleError::SaleRetrievalFailed {
                    sale_id: sale.id,
                    source: None,
                });
            }
            Err(e) => {
                error!(
                    operation = "fetch_sale_with_relations",
                    sale_id = sale.id,
                    error = %e,
                    "Sale retrieval failed"
                );
                return Err(SaleError::SaleRetrievalFailed {
                    sale_id: sale.id,
                    source: Some(e),
                });
            }
        };

        info!(
            sale_id = created.sale.id,
            uuid = %created.sale.uuid,
            branch_id = created.sale.branch_id,
            lines = created.sale_details.len(),
            total = %created.sale.totals.total,
            "Sale generated"
        );

        Ok(created)
    }

    /// Step 1: branch and customer lookups, joined. Branch failures win.
    async fn validate_references(&self, request: &GenerateSaleRequest) -> SaleResult<Branch> {
        let customer_lookup = async {
            match request.customer_id {
                Some(id) => self.store.customer_by_id(id).await.map(|c| c.is_some()),
                None => Ok(true),
            }
        };

        let (branch, customer_exists) =
            tokio::join!(self.store.branch_by_id(request.branch_id), customer_lookup);

        let branch = branch
            .map_err(|e| lookup_failed("branch_lookup", e))?
            .ok_or_else(|| {
                warn!(branch_id = request.branch_id, "Branch not found");
                SaleError::BranchNotFound(request.branch_id)
            })?;

        let customer_exists = customer_exists.map_err(|e| lookup_failed("customer_lookup", e))?;
        if let (false, Some(customer_id)) = (customer_exists, request.customer_id) {
            warn!(customer_id, "Customer not found");
            return Err(SaleError::CustomerNotFound(customer_id));
        }

        Ok(branch)
    }
}

fn lookup_failed(operation: &'static str, source: DbError) -> SaleError {
    error!(operation, error = %source, "Lookup failed");
    SaleError::Lookup { operation, source }
}

/// Requested product ids, first occurrence order, without repeats.
fn unique_product_ids(request: &GenerateSaleRequest) -> Vec<i64> {
    let mut ids: Vec<i64> = Vec::with_capacity(request.products.len());
    for line in &request.products {
        if !ids.contains(&line.product_id) {
            ids.push(line.product_id);
        }
    }
    ids
}

// =============================================================================
// Unit Tests
// =============================================================================
