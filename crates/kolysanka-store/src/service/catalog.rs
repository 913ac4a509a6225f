//! # Catalog Service
//!
//! Product CRUD over the `products` collection.
//!
//! The collection is seeded with three sample products on first access,
//! so a fresh profile has a browsable catalog before the operator adds
//! anything.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use kolysanka_core::{NewProduct, Product, ProductFilter, ProductPatch};

use crate::error::{StoreError, StoreResult};
use crate::kv::{self, keys};
use crate::seed;

/// Service for catalog operations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    /// Creates a new CatalogService.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogService { pool }
    }

    /// Lists all products, seeding the sample catalog on first access.
    ///
    /// The seed is written back immediately so the generated ids stay
    /// stable across reads.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        if let Some(products) = kv::read_value(&self.pool, keys::PRODUCTS).await? {
            return Ok(products);
        }

        let products = seed::sample_products(Utc::now());
        kv::write_value(&self.pool, keys::PRODUCTS, &products).await?;
        info!(count = products.len(), "seeded sample catalog");

        Ok(products)
    }

    /// Gets a product by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let products = self.list().await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }

    /// Lists products matching the filter.
    pub async fn filter(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let products = self.list().await?;
        Ok(products.into_iter().filter(|p| filter.matches(p)).collect())
    }

    /// Creates a product.
    ///
    /// Assigns a fresh UUID and created/updated timestamps, appends, and
    /// persists the full collection.
    pub async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        new.validate()?;

        let product = new.into_product(Uuid::new_v4().to_string(), Utc::now());
        debug!(id = %product.id, name = %product.name, "creating product");

        let mut products = self.list().await?;
        products.push(product.clone());
        kv::write_value(&self.pool, keys::PRODUCTS, &products).await?;

        Ok(product)
    }

    /// Applies a partial update to a product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the updated record, with refreshed `updated_at`
    /// * `Err(StoreError::NotFound)` - id was never created
    pub async fn update(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        patch.validate()?;

        debug!(id = %id, "updating product");

        let mut products = self.list().await?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        patch.apply(product, Utc::now());
        let updated = product.clone();

        kv::write_value(&self.pool, keys::PRODUCTS, &products).await?;

        Ok(updated)
    }

    /// Deletes a product by id.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "deleting product");

        let mut products = self.list().await?;
        let before = products.len();
        products.retain(|p| p.id != id);

        if products.len() == before {
            return Err(StoreError::not_found("Product", id));
        }

        kv::write_value(&self.pool, keys::PRODUCTS, &products).await?;

        Ok(())
    }

    /// Toggles whether a product is offered for sale.
    ///
    /// Convenience wrapper over [`update`](Self::update) for the admin
    /// panel's take-off-sale / put-back-on-sale action.
    pub async fn set_in_stock(&self, id: &str, in_stock: bool) -> StoreResult<Product> {
        self.update(
            id,
            ProductPatch {
                in_stock: Some(in_stock),
                ..ProductPatch::default()
            },
        )
        .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
