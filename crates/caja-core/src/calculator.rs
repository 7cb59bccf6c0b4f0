//! # Sale Line-Item Calculator
//!
//! Per-line financial figures and the sale totals fold.
//!
//! ## Per-Line Algorithm
//! ```text
//! price          = round2(requested price)
//! quantity       = round4(requested quantity)
//! affected_sale  = round4(price × quantity)
//! vat            = round4(affected_sale / 1.13 × 0.13)     (VAT branches only)
//! profit         = round4(affected_sale − (purchase_price × quantity + vat))
//! user_comm      = round4(profit × user_commission% / 100)
//! branch_comm    = round4(profit − user_comm)
//! discount       = round4((list_price − price) × quantity)
//! ```
//! Prices include VAT: it is extracted from the amount, never added on top.
//! `discount` compares against the catalog's current list price.
//!
//! ## Totals Fold
//! ```text
//! SaleTotals::seeded(shipping)
//!      │  accumulate(line 1)   every field += line figure, round2
//!      │  accumulate(line 2)
//!      ▼  ...
//! SaleTotals ──► with total_text = amount_to_words(total)
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{CoreError, CoreResult};
use crate::money::{accumulate2, round2, round4};
use crate::types::{CatalogProduct, NewSaleLine, SaleLineRequest, SaleTotals};
use crate::words::amount_to_words;

/// VAT rate applied to VAT-inclusive prices.
pub const VAT_RATE: Decimal = dec!(0.13);

/// `1 + VAT_RATE`: divides a VAT-inclusive amount back to its net value.
pub const VAT_DIVISOR: Decimal = dec!(1.13);

// =============================================================================
// Line Figures
// =============================================================================

/// Figures computed for one requested line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFigures {
    pub product_id: i64,
    pub purchase_price: Decimal,
    pub price: Decimal,
    pub quantity: Decimal,
    pub affected_sale: Decimal,
    pub vat: Decimal,
    pub profit: Decimal,
    pub user_commission: Decimal,
    /// Gross-profit contribution retained by the branch.
    pub branch_commission: Decimal,
    pub discount: Decimal,
}

impl LineFigures {
    /// Attaches the figures to a persisted sale header.
    pub fn into_new_line(self, sale_id: i64) -> NewSaleLine {
        NewSaleLine {
            sale_id,
            product_id: Some(self.product_id),
            purchase_price: self.purchase_price,
            price: self.price,
            quantity: self.quantity,
            affected_sale: self.affected_sale,
            discount: self.discount,
            vat: Some(self.vat),
            user_commission: self.user_commission,
            branch_commission: self.branch_commission,
        }
    }
}

/// Computes the figures for one line against its catalog product.
pub fn calculate_line(
    product: &CatalogProduct,
    request: &SaleLineRequest,
    vat_enabled: bool,
) -> LineFigures {
    let price = round2(request.price);
    let quantity = round4(request.quantity);
    let purchase_price = product.purchase_price.unwrap_or(Decimal::ZERO);
    let user_commission_percent = product.user_commission_percent.unwrap_or(Decimal::ZERO);

    let affected_sale = round4(price * quantity);
    let vat = if vat_enabled {
        round4(affected_sale / VAT_DIVISOR * VAT_RATE)
    } else {
        Decimal::ZERO
    };
    let profit = round4(affected_sale - (purchase_price * quantity + vat));
    let user_commission = round4(profit * (user_commission_percent / Decimal::ONE_HUNDRED));
    let branch_commission = round4(profit - user_commission);
    let discount = round4((product.list_price - price) * quantity);

    LineFigures {
        product_id: product.id,
        purchase_price,
        price,
        quantity,
        affected_sale,
        vat,
        profit,
        user_commission,
        branch_commission,
        discount,
    }
}

// =============================================================================
// Totals Fold
// =============================================================================

impl SaleTotals {
    /// Starting totals: `total` (and `subtotal`) carry the shipping cost.
    pub fn seeded(shipping_cost: Option<Decimal>) -> Self {
        let total = round2(shipping_cost.unwrap_or(Decimal::ZERO));
        SaleTotals {
            total,
            subtotal: total,
            vat: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            users_commission: Decimal::ZERO,
            total_text: String::new(),
        }
    }

    /// Returns the totals after adding one line, rounding every field.
    pub fn accumulate(&self, line: &LineFigures) -> Self {
        let total = accumulate2(self.total, line.affected_sale);
        SaleTotals {
            total,
            subtotal: total,
            vat: accumulate2(self.vat, line.vat),
            total_profit: accumulate2(self.total_profit, line.profit),
            gross_profit: accumulate2(self.gross_profit, line.branch_commission),
            users_commission: accumulate2(self.users_commission, line.user_commission),
            total_text: String::new(),
        }
    }

    /// Attaches the receipt words for the final total.
    pub fn with_total_text(self) -> CoreResult<Self> {
        let total_text = amount_to_words(self.total)?;
        Ok(SaleTotals { total_text, ..self })
    }
}

// =============================================================================
// Sale Data
// =============================================================================

/// Lines and totals for a whole sale, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleComputation {
    pub lines: Vec<LineFigures>,
    pub totals: SaleTotals,
}

/// Runs the calculator across every requested line, in request order.
///
/// `products` is the active catalog batch. A requested id absent from it
/// fails the whole computation; no partial totals are returned.
pub fn generate_sale_data(
    products: &[CatalogProduct],
    requested: &[SaleLineRequest],
    vat_enabled: bool,
    shipping_cost: Option<Decimal>,
) -> CoreResult<SaleComputation> {
    let catalog: HashMap<i64, &CatalogProduct> = products
        .iter()
        .filter(|p| p.is_active())
        .map(|p| (p.id, p))
        .collect();

    let lines = requested
        .iter()
        .map(|request| {
            catalog
                .get(&request.product_id)
                .map(|product| calculate_line(product, request, vat_enabled))
                .ok_or(CoreError::ProductNotFoundForSale(request.product_id))
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let totals = lines
        .iter()
        .fold(SaleTotals::seeded(shipping_cost), |totals, line| {
            totals.accumulate(line)
        })
        .with_total_text()?;

    Ok(SaleComputation { lines, totals })
}
