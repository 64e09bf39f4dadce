//! Inventory reservation over the catalog store.

use common::ProductId;
use store::CatalogStore;

use crate::Result;

/// Debits and credits product stock through the catalog store's atomic
/// per-product adjustment.
///
/// `reserve` is applied exactly once per order line at order creation and
/// never retried. `release` undoes a prior reserve and must be called at
/// most once per successful reserve; the order's per-line reservation
/// flags are the callers' bookkeeping for that.
#[derive(Clone)]
pub struct InventoryService<C> {
    catalog: C,
}

impl<C: CatalogStore> InventoryService<C> {
    /// Creates a new inventory service over the given catalog.
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Reserves `quantity` units of a product, decrementing its quantity on
    /// hand. Fails with `InsufficientStock` if fewer units are on hand,
    /// leaving the stock unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self, product_id: ProductId, quantity: u32) -> Result<()> {
        let remaining = self
            .catalog
            .adjust_stock(product_id, -(quantity as i64))
            .await?;
        tracing::debug!(%product_id, quantity, remaining, "stock reserved");
        Ok(())
    }

    /// Releases a prior reservation, incrementing the product's quantity on
    /// hand.
    #[tracing::instrument(skip(self))]
    pub async fn release(&self, product_id: ProductId, quantity: u32) -> Result<()> {
        let remaining = self.catalog.adjust_stock(product_id, quantity as i64).await?;
        tracing::debug!(%product_id, quantity, remaining, "stock released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FulfillmentError;
    use common::CategoryId;
    use domain::{Money, Product, Sku};
    use store::InMemoryCatalog;

    async fn catalog_with(stock: u32) -> (InMemoryCatalog, ProductId) {
        let catalog = InMemoryCatalog::new();
        let product = Product::new(
            "Widget",
            Sku::new("SKU-001").unwrap(),
            Money::from_cents(1000),
            stock,
            CategoryId::new(),
        )
        .unwrap();
        let id = product.id();
        catalog.put(product).await.unwrap();
        (catalog, id)
    }

    #[tokio::test]
    async fn test_reserve_decrements_stock() {
        let (catalog, id) = catalog_with(50).await;
        let inventory = InventoryService::new(catalog.clone());

        inventory.reserve(id, 2).await.unwrap();
        assert_eq!(catalog.get(id).await.unwrap().quantity_on_hand(), 48);
    }

    #[tokio::test]
    async fn test_reserve_insufficient_stock_leaves_stock_unchanged() {
        let (catalog, id) = catalog_with(5).await;
        let inventory = InventoryService::new(catalog.clone());

        let result = inventory.reserve(id, 6).await;
        assert!(matches!(
            result,
            Err(FulfillmentError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            })
        ));
        assert_eq!(catalog.get(id).await.unwrap().quantity_on_hand(), 5);
    }

    #[tokio::test]
    async fn test_reserve_unknown_product() {
        let (catalog, _) = catalog_with(5).await;
        let inventory = InventoryService::new(catalog);

        let result = inventory.reserve(ProductId::new(), 1).await;
        assert!(matches!(result, Err(FulfillmentError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_release_round_trip() {
        let (catalog, id) = catalog_with(50).await;
        let inventory = InventoryService::new(catalog.clone());

        inventory.reserve(id, 30).await.unwrap();
        inventory.release(id, 30).await.unwrap();
        assert_eq!(catalog.get(id).await.unwrap().quantity_on_hand(), 50);
    }

    #[tokio::test]
    async fn test_reserve_entire_stock() {
        let (catalog, id) = catalog_with(5).await;
        let inventory = InventoryService::new(catalog.clone());

        inventory.reserve(id, 5).await.unwrap();
        assert_eq!(catalog.get(id).await.unwrap().quantity_on_hand(), 0);
    }
}
