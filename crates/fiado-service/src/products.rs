//! # Product Operations
//!
//! Catalog CRUD and stock adjustments. Stock mutation is never part of
//! a product update; it goes through the guarded `adjust_stock` path
//! (or the sale-creation transaction) so concurrent sales cannot
//! oversell.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::CreditService;
use fiado_core::{validation, Product};
use fiado_db::repository::product::generate_product_id;

/// A new catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Editable product fields. Stock is deliberately absent; use
/// [`CreditService::adjust_stock`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub brand: Option<Option<String>>,
    #[serde(default)]
    pub image_url: Option<Option<String>>,
}

impl CreditService {
    /// Adds a product to the catalog.
    pub async fn create_product(&self, request: NewProduct) -> ServiceResult<Product> {
        validation::validate_product_name(&request.name)?;
        validation::validate_price_cents(request.price_cents)?;
        validation::validate_stock(request.stock)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            stock: request.stock,
            category: request.category,
            brand: request.brand,
            image_url: request.image_url,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db().products().insert(&product).await?;

        info!(product_id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: &str) -> ServiceResult<Product> {
        self.db()
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    /// Lists active products.
    pub async fn list_products(&self, limit: u32) -> ServiceResult<Vec<Product>> {
        Ok(self.db().products().list_active(limit).await?)
    }

    /// Searches products by name, brand or category.
    pub async fn search_products(&self, query: &str, limit: u32) -> ServiceResult<Vec<Product>> {
        Ok(self.db().products().search(query, limit).await?)
    }

    /// Applies a partial update to a product.
    pub async fn update_product(&self, id: &str, update: ProductUpdate) -> ServiceResult<Product> {
        let mut product = self.get_product(id).await?;

        if let Some(name) = update.name {
            validation::validate_product_name(&name)?;
            product.name = name;
        }
        if let Some(price_cents) = update.price_cents {
            validation::validate_price_cents(price_cents)?;
            product.price_cents = price_cents;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(brand) = update.brand {
            product.brand = brand;
        }
        if let Some(image_url) = update.image_url {
            product.image_url = image_url;
        }
        product.updated_at = Utc::now();

        self.db().products().update(&product).await?;

        Ok(product)
    }

    /// Adjusts stock by a signed delta (restock positive, shrinkage
    /// negative). A decrement below zero is rejected atomically.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> ServiceResult<Product> {
        self.db().products().adjust_stock(id, delta).await?;
        info!(product_id = %id, delta, "Stock adjusted");
        self.get_product(id).await
    }

    /// Removes a product from sale without losing its sale history.
    pub async fn deactivate_product(&self, id: &str) -> ServiceResult<()> {
        self.db().products().soft_delete(id).await?;
        info!(product_id = %id, "Product deactivated");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::service;
    use crate::ErrorCode;

    fn new_product(name: &str, price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price_cents,
            stock,
            category: None,
            brand: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_search_product() {
        let svc = service().await;
        svc.create_product(new_product("Television 55\"", 1_000_000, 3))
            .await
            .unwrap();

        let hits = svc.search_products("televis", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].price_cents, 1_000_000);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_price() {
        let svc = service().await;
        let err = svc.create_product(new_product("Freebie", 0, 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_adjust_stock_guards_below_zero() {
        let svc = service().await;
        let product = svc.create_product(new_product("Radio", 45_000, 2)).await.unwrap();

        let err = svc.adjust_stock(&product.id, -3).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // Restock then draw down to exactly zero.
        let product = svc.adjust_stock(&product.id, 3).await.unwrap();
        assert_eq!(product.stock, 5);
        let product = svc.adjust_stock(&product.id, -5).await.unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_deactivated_product_leaves_listing() {
        let svc = service().await;
        let product = svc.create_product(new_product("Fan", 80_000, 4)).await.unwrap();

        svc.deactivate_product(&product.id).await.unwrap();

        assert!(svc.list_products(10).await.unwrap().is_empty());
        // Still fetchable by id for history views.
        let fetched = svc.get_product(&product.id).await.unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn test_update_does_not_touch_stock() {
        let svc = service().await;
        let product = svc.create_product(new_product("Soap", 2_500, 10)).await.unwrap();

        let updated = svc
            .update_product(
                &product.id,
                ProductUpdate {
                    price_cents: Some(3_000),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price_cents, 3_000);
        assert_eq!(updated.stock, 10);
    }
}
