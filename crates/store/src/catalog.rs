//! Catalog store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::{DomainError, Product};
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Storage for catalog products.
///
/// `adjust_stock` is the atomic per-key primitive the inventory arithmetic
/// rides on: the read-modify-write of `quantity_on_hand` happens under a
/// single write guard, so concurrent reservations against the same product
/// can never both succeed when only one has sufficient stock.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns the product with the given ID.
    async fn get(&self, id: ProductId) -> Result<Product>;

    /// Inserts or replaces a product. Rejects a SKU already carried by a
    /// different product.
    async fn put(&self, product: Product) -> Result<()>;

    /// Atomically applies a signed adjustment to the product's quantity on
    /// hand. Fails without modifying anything if the result would be
    /// negative. Returns the new quantity.
    async fn adjust_stock(&self, id: ProductId, delta: i64) -> Result<u32>;
}

/// In-memory catalog store.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products stored.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn get(&self, id: ProductId) -> Result<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(id))
    }

    async fn put(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        if products
            .values()
            .any(|p| p.sku() == product.sku() && p.id() != product.id())
        {
            return Err(StoreError::DuplicateSku(product.sku().clone()));
        }
        products.insert(product.id(), product);
        Ok(())
    }

    async fn adjust_stock(&self, id: ProductId, delta: i64) -> Result<u32> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        product.adjust_quantity(delta).map_err(|e| match e {
            DomainError::StockUnderflow { on_hand, delta } => StoreError::InsufficientStock {
                product_id: id,
                requested: delta.unsigned_abs() as u32,
                available: on_hand,
            },
            // adjust_quantity only fails with StockUnderflow
            _ => StoreError::ProductNotFound(id),
        })
    }
}
