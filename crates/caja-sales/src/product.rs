//! # Permission-Checked Product Update
//!
//! ```text
//! ProductUpdate ──► validate ──► permission gate ──► apply_update ──► CatalogProduct
//!                       │               │                  │
//!                       ▼               ▼                  ▼
//!                  Validation     PermissionDenied   ProductNotFound / Storage
//! ```
//! A rejected update never reaches storage.

use tracing::{debug, error, info, warn};

use caja_core::permission::{evaluate_product_update_permission, PermissionGrant};
use caja_core::validation::validate_product_update;
use caja_core::{CatalogProduct, ProductUpdate};
use caja_db::{Database, DbError};

use crate::error::ProductUpdateError;

/// Applies partial product updates on behalf of a caller.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Updates a product with the caller's already-resolved grants.
    pub async fn update_product(
        &self,
        product_id: i64,
        update: &ProductUpdate,
        grants: &[PermissionGrant],
    ) -> Result<CatalogProduct, ProductUpdateError> {
        debug!(product_id, grants = grants.len(), "update_product");

        validate_product_update(update).map_err(|e| {
            warn!(product_id, error = %e, "Product update rejected");
            e
        })?;

        evaluate_product_update_permission(update, grants).map_err(|e| {
            warn!(product_id, error = %e, "Product update denied");
            e
        })?;

        let product = self
            .db
            .products()
            .apply_update(product_id, update)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => ProductUpdateError::ProductNotFound(product_id),
                source => {
                    error!(
                        operation = "apply_product_update",
                        product_id,
                        error = %source,
                        "Product update failed"
                    );
                    ProductUpdateError::Storage {
                        operation: "apply_product_update",
                        source,
                    }
                }
            })?;

        info!(product_id, "Product updated");
        Ok(product)
    }

    /// Resolves the grants of `role_id`, then updates as [`Self::update_product`].
    pub async fn update_product_as_role(
        &self,
        product_id: i64,
        update: &ProductUpdate,
        role_id: i64,
    ) -> Result<CatalogProduct, ProductUpdateError> {
        let grants = self.db.roles().grants_for_role(role_id).await.map_err(|source| {
            error!(
                operation = "grants_for_role",
                role_id,
                error = %source,
                "Grant resolution failed"
            );
            ProductUpdateError::Storage {
                operation: "grants_for_role",
                source,
            }
        })?;

        self.update_product(product_id, update, &grants).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caja_core::permission::{
        SystemPage, UPDATE_PRODUCT_COMMISSIONS, UPDATE_PRODUCT_PRICE, UPDATE_PRODUCT_STOCK,
    };
    use caja_core::{NewProduct, Patch, PermissionError, ValidationError};
    use caja_db::DbConfig;
    use rust_decimal_macros::dec;

    async fn setup() -> (ProductService, Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                branch_id: None,
                name: "Arroz 2kg".to_string(),
                list_price: dec!(3.10),
                purchase_price: Some(dec!(2.20)),
                purchased_by: Some("Distribuidora Central".to_string()),
                stock: dec!(80),
                user_commission_percent: Some(dec!(5)),
                branch_commission_percent: Some(dec!(95)),
            })
            .await
            .unwrap();
        (ProductService::new(db.clone()), db, product.id)
    }

    fn grant(name: &str) -> PermissionGrant {
        PermissionGrant::new(SystemPage::Products, name)
    }

    #[tokio::test]
    async fn test_price_denied_before_stock() {
        let (service, db, id) = setup().await;
        let update = ProductUpdate {
            price: Patch::Value(dec!(3.50)),
            stock: Patch::Value(dec!(10)),
            ..Default::default()
        };

        let err = service.update_product(id, &update, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ProductUpdateError::PermissionDenied(PermissionError::PriceUpdateDenied)
        ));
        assert_eq!(err.code().http_status(), 403);

        // Nothing was written.
        let stored = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.list_price, dec!(3.10));
        assert_eq!(stored.stock, dec!(80));
    }

    #[tokio::test]
    async fn test_granted_update_is_persisted() {
        let (service, _, id) = setup().await;
        let update = ProductUpdate {
            price: Patch::Value(dec!(3.50)),
            user_commission_percent: Patch::Value(dec!(10)),
            ..Default::default()
        };
        let grants = [grant(UPDATE_PRODUCT_PRICE), grant(UPDATE_PRODUCT_COMMISSIONS)];

        let product = service.update_product(id, &update, &grants).await.unwrap();
        assert_eq!(product.list_price, dec!(3.50));
        assert_eq!(product.user_commission_percent, Some(dec!(10)));
        assert_eq!(product.branch_commission_percent, Some(dec!(95)));
    }

    #[tokio::test]
    async fn test_unguarded_fields_need_no_grant() {
        let (service, _, id) = setup().await;
        let update = ProductUpdate {
            name: Patch::Value("Arroz blanco 2kg".to_string()),
            ..Default::default()
        };

        let product = service.update_product(id, &update, &[]).await.unwrap();
        assert_eq!(product.name, "Arroz blanco 2kg");
    }

    #[tokio::test]
    async fn test_validation_runs_before_gate() {
        let (service, _, id) = setup().await;
        let update = ProductUpdate {
            stock: Patch::Value(dec!(-1)),
            ..Default::default()
        };

        let err = service.update_product(id, &update, &[]).await.unwrap_err();
        assert!(matches!(err, ProductUpdateError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cleared_price_is_rejected() {
        let (service, _, id) = setup().await;
        let update = ProductUpdate {
            price: Patch::Null,
            ..Default::default()
        };

        let err = service.update_product(id, &update, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ProductUpdateError::Validation(ValidationError::Required { .. })
        ));
    }

    #[tokio::test]
    async fn test_clearing_guarded_fields_without_grants_is_rejected() {
        let (service, db, id) = setup().await;
        let update = ProductUpdate {
            purchase_price: Patch::Null,
            user_commission_percent: Patch::Null,
            branch_commission_percent: Patch::Null,
            ..Default::default()
        };

        let err = service.update_product(id, &update, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ProductUpdateError::Validation(ValidationError::Required { .. })
        ));
        assert_eq!(err.code().http_status(), 400);

        let stored = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.purchase_price, Some(dec!(2.20)));
        assert_eq!(stored.user_commission_percent, Some(dec!(5)));
        assert_eq!(stored.branch_commission_percent, Some(dec!(95)));
        assert_eq!(stored.purchased_by.as_deref(), Some("Distribuidora Central"));
    }

    #[tokio::test]
    async fn test_missing_product() {
        let (service, _, _) = setup().await;
        let update = ProductUpdate {
            stock: Patch::Value(dec!(5)),
            ..Default::default()
        };

        let err = service
            .update_product(999, &update, &[grant(UPDATE_PRODUCT_STOCK)])
            .await
            .unwrap_err();
        assert!(matches!(err, ProductUpdateError::ProductNotFound(999)));
        assert_eq!(err.code().http_status(), 404);
    }

    #[tokio::test]
    async fn test_update_as_role_resolves_grants() {
        let (service, db, id) = setup().await;
        let roles = db.roles();
        let cashier = roles.insert_role("Cajero").await.unwrap();
        let stocker = roles.insert_role("Bodeguero").await.unwrap();
        let permission = roles
            .insert_permission(SystemPage::Products, UPDATE_PRODUCT_STOCK)
            .await
            .unwrap();
        roles.grant_permission(stocker, permission).await.unwrap();

        let update = ProductUpdate {
            stock: Patch::Value(dec!(12)),
            ..Default::default()
        };

        let err = service
            .update_product_as_role(id, &update, cashier)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProductUpdateError::PermissionDenied(PermissionError::StockUpdateDenied)
        ));

        let product = service
            .update_product_as_role(id, &update, stocker)
            .await
            .unwrap();
        assert_eq!(product.stock, dec!(12));
    }
}
