//! # Validation Module
//!
//! Input validation for sale requests and product updates.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Shape and type of the request body                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ranges, signs, lengths, collection sizes                          │
//! │  └── Runs before any lookup or computation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Orchestration (caja-sales)                                   │
//! │  └── Reference existence (branch, customer, products)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::validation::validate_quantity;
//! use rust_decimal::Decimal;
//!
//! assert!(validate_quantity(Decimal::ONE).is_ok());
//! assert!(validate_quantity(Decimal::ZERO).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{GenerateSaleRequest, Patch, ProductUpdate, SaleLineRequest};
use crate::{MAX_NOTES_LENGTH, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length.
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a record id.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a sold quantity (must be > 0).
pub fn validate_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a money amount. Zero is allowed.
pub fn validate_amount(field: &str, amount: Decimal) -> ValidationResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a percentage in the closed range 0–100.
pub fn validate_percent(field: &str, percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }
    Ok(())
}

/// Validates a required, length-bounded text field.
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Sale Request
// =============================================================================

fn validate_sale_line(line: &SaleLineRequest) -> ValidationResult<()> {
    validate_id("productId", line.product_id)?;
    validate_amount("price", line.price)?;
    validate_quantity(line.quantity)
}

/// Validates a sale request before any reference lookup runs.
///
/// ## Rules
/// - At least one line, at most [`MAX_SALE_LINES`]
/// - Positive branch, customer and product ids
/// - Non-negative prices and shipping cost, positive quantities
/// - Customer notes at most [`MAX_NOTES_LENGTH`] characters
pub fn validate_generate_sale_request(request: &GenerateSaleRequest) -> ValidationResult<()> {
    validate_id("branchId", request.branch_id)?;

    if let Some(customer_id) = request.customer_id {
        validate_id("customerId", customer_id)?;
    }

    if request.products.is_empty() {
        return Err(ValidationError::Required {
            field: "products".to_string(),
        });
    }

    if request.products.len() > MAX_SALE_LINES {
        return Err(ValidationError::TooMany {
            field: "products".to_string(),
            max: MAX_SALE_LINES,
        });
    }

    request.products.iter().try_for_each(validate_sale_line)?;

    if let Some(shipping_cost) = request.shipping_cost {
        validate_amount("shippingCost", shipping_cost)?;
    }

    if let Some(notes) = &request.customer_notes {
        if notes.chars().count() > MAX_NOTES_LENGTH {
            return Err(ValidationError::TooLong {
                field: "customerNotes".to_string(),
                max: MAX_NOTES_LENGTH,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Product Update
// =============================================================================

/// Validates the values carried by a product update.
///
/// Only `Patch::Value` fields are range-checked. `Patch::Null` is rejected
/// on every field. The permission gate ignores `null`, so clearing a
/// guarded field must never reach storage.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    for (field, is_null) in [
        ("name", matches!(update.name, Patch::Null)),
        ("price", matches!(update.price, Patch::Null)),
        ("stock", matches!(update.stock, Patch::Null)),
        ("status", matches!(update.status, Patch::Null)),
        (
            "branchCommissionPercent",
            matches!(update.branch_commission_percent, Patch::Null),
        ),
        (
            "userCommissionPercent",
            matches!(update.user_commission_percent, Patch::Null),
        ),
        ("purchasePrice", matches!(update.purchase_price, Patch::Null)),
        ("purchasedBy", matches!(update.purchased_by, Patch::Null)),
    ] {
        if is_null {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
    }

    if let Some(name) = update.name.value() {
        validate_text("name", name, MAX_PRODUCT_NAME_LENGTH)?;
    }
    if let Some(price) = update.price.value() {
        validate_amount("price", *price)?;
    }
    if let Some(percent) = update.branch_commission_percent.value() {
        validate_percent("branchCommissionPercent", *percent)?;
    }
    if let Some(percent) = update.user_commission_percent.value() {
        validate_percent("userCommissionPercent", *percent)?;
    }
    if let Some(purchase_price) = update.purchase_price.value() {
        validate_amount("purchasePrice", *purchase_price)?;
    }
    if let Some(purchased_by) = update.purchased_by.value() {
        validate_text("purchasedBy", purchased_by, MAX_PRODUCT_NAME_LENGTH)?;
    }
    if let Some(stock) = update.stock.value() {
        validate_amount("stock", *stock)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceType;
    use rust_decimal_macros::dec;

    fn line(product_id: i64, price: Decimal, quantity: Decimal) -> SaleLineRequest {
        SaleLineRequest {
            product_id,
            price,
            quantity,
        }
    }

    fn request(products: Vec<SaleLineRequest>) -> GenerateSaleRequest {
        GenerateSaleRequest {
            branch_id: 1,
            customer_id: Some(1),
            invoice_type: InvoiceType::Ticket,
            paid: true,
            shipping_cost: None,
            customer_notes: None,
            products,
        }
    }

    #[test]
    fn test_valid_request() {
        let req = request(vec![line(1, dec!(10.00), dec!(2))]);
        assert!(validate_generate_sale_request(&req).is_ok());
    }

    #[test]
    fn test_free_line_is_allowed() {
        let req = request(vec![line(1, Decimal::ZERO, dec!(1))]);
        assert!(validate_generate_sale_request(&req).is_ok());
    }

    #[test]
    fn test_empty_and_oversized_requests() {
        assert_eq!(
            validate_generate_sale_request(&request(vec![])),
            Err(ValidationError::Required {
                field: "products".to_string()
            })
        );

        let many = (0..=MAX_SALE_LINES)
            .map(|_| line(1, dec!(1), dec!(1)))
            .collect();
        assert!(matches!(
            validate_generate_sale_request(&request(many)),
            Err(ValidationError::TooMany { .. })
        ));
    }

    #[test]
    fn test_line_rules() {
        for bad in [
            line(0, dec!(1), dec!(1)),
            line(1, dec!(-1), dec!(1)),
            line(1, dec!(1), dec!(0)),
        ] {
            assert!(validate_generate_sale_request(&request(vec![bad])).is_err());
        }
    }

    #[test]
    fn test_shipping_and_notes() {
        let mut req = request(vec![line(1, dec!(1), dec!(1))]);
        req.shipping_cost = Some(dec!(-0.01));
        assert!(validate_generate_sale_request(&req).is_err());

        req.shipping_cost = Some(Decimal::ZERO);
        req.customer_notes = Some("x".repeat(MAX_NOTES_LENGTH + 1));
        assert!(matches!(
            validate_generate_sale_request(&req),
            Err(ValidationError::TooLong { .. })
        ));

        req.customer_notes = Some("Entregar después de las 5".to_string());
        assert!(validate_generate_sale_request(&req).is_ok());
    }

    #[test]
    fn test_product_update_ranges() {
        let ok = ProductUpdate {
            price: Patch::Value(dec!(4.99)),
            user_commission_percent: Patch::Value(dec!(100)),
            purchase_price: Patch::Null,
            ..Default::default()
        };
        assert!(validate_product_update(&ok).is_ok());

        let bad_percent = ProductUpdate {
            branch_commission_percent: Patch::Value(dec!(100.01)),
            ..Default::default()
        };
        assert!(matches!(
            validate_product_update(&bad_percent),
            Err(ValidationError::OutOfRange { .. })
        ));

        let bad_stock = ProductUpdate {
            stock: Patch::Value(dec!(-1)),
            ..Default::default()
        };
        assert!(validate_product_update(&bad_stock).is_err());
    }

    #[test]
    fn test_product_update_required_fields_cannot_be_cleared() {
        let update = ProductUpdate {
            price: Patch::Null,
            ..Default::default()
        };
        assert_eq!(
            validate_product_update(&update),
            Err(ValidationError::Required {
                field: "price".to_string()
            })
        );

        let blank_supplier = ProductUpdate {
            purchased_by: Patch::Value("   ".to_string()),
            ..Default::default()
        };
        assert!(validate_product_update(&blank_supplier).is_err());
    }

    #[test]
    fn test_product_update_guarded_fields_cannot_be_cleared() {
        let cases = [
            (
                "purchasePrice",
                ProductUpdate {
                    purchase_price: Patch::Null,
                    ..Default::default()
                },
            ),
            (
                "purchasedBy",
                ProductUpdate {
                    purchased_by: Patch::Null,
                    ..Default::default()
                },
            ),
            (
                "userCommissionPercent",
                ProductUpdate {
                    user_commission_percent: Patch::Null,
                    ..Default::default()
                },
            ),
            (
                "branchCommissionPercent",
                ProductUpdate {
                    branch_commission_percent: Patch::Null,
                    ..Default::default()
                },
            ),
        ];

        for (field, update) in cases {
            assert_eq!(
                validate_product_update(&update),
                Err(ValidationError::Required {
                    field: field.to_string()
                })
            );
        }
    }
}
