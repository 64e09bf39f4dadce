//! Shipment store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, ShipmentId};
use domain::Shipment;
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Storage for shipment records.
///
/// `insert` enforces at most one shipment per order atomically.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Returns the shipment with the given ID.
    async fn get(&self, id: ShipmentId) -> Result<Shipment>;

    /// Inserts a new shipment, rejecting a second shipment for the same
    /// order.
    async fn insert(&self, shipment: Shipment) -> Result<()>;

    /// Replaces an existing shipment.
    async fn save(&self, shipment: Shipment) -> Result<()>;

    /// Returns the shipment for an order, if any.
    async fn for_order(&self, order_id: OrderId) -> Result<Option<Shipment>>;
}

/// In-memory shipment store.
#[derive(Clone, Default)]
pub struct InMemoryShipments {
    shipments: Arc<RwLock<HashMap<ShipmentId, Shipment>>>,
}

impl InMemoryShipments {
    /// Creates a new empty shipment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of shipments stored.
    pub async fn shipment_count(&self) -> usize {
        self.shipments.read().await.len()
    }
}

#[async_trait]
impl ShipmentStore for InMemoryShipments {
    async fn get(&self, id: ShipmentId) -> Result<Shipment> {
        self.shipments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::ShipmentNotFound(id))
    }

    async fn insert(&self, shipment: Shipment) -> Result<()> {
        let mut shipments = self.shipments.write().await;
        if let Some(existing) = shipments
            .values()
            .find(|s| s.order_id() == shipment.order_id())
        {
            return Err(StoreError::ActiveShipmentExists {
                order_id: shipment.order_id(),
                shipment_id: existing.id(),
            });
        }
        shipments.insert(shipment.id(), shipment);
        Ok(())
    }

    async fn save(&self, shipment: Shipment) -> Result<()> {
        let mut shipments = self.shipments.write().await;
        let id = shipment.id();
        if !shipments.contains_key(&id) {
            return Err(StoreError::ShipmentNotFound(id));
        }
        shipments.insert(id, shipment);
        Ok(())
    }

    async fn for_order(&self, order_id: OrderId) -> Result<Option<Shipment>> {
        let shipments = self.shipments.read().await;
        Ok(shipments
            .values()
            .find(|s| s.order_id() == order_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryShipments::new();
        let s = Shipment::new(OrderId::new(), "123 Test Street");
        let id = s.id();

        store.insert(s.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), s);
    }

    #[tokio::test]
    async fn test_second_shipment_for_order_rejected() {
        let store = InMemoryShipments::new();
        let order_id = OrderId::new();
        store
            .insert(Shipment::new(order_id, "123 Test Street"))
            .await
            .unwrap();

        let result = store.insert(Shipment::new(order_id, "456 Other Street")).await;
        assert!(matches!(
            result,
            Err(StoreError::ActiveShipmentExists { .. })
        ));
        assert_eq!(store.shipment_count().await, 1);
    }

    #[tokio::test]
    async fn test_for_order() {
        let store = InMemoryShipments::new();
        let order_id = OrderId::new();
        assert!(store.for_order(order_id).await.unwrap().is_none());

        let s = Shipment::new(order_id, "123 Test Street");
        let id = s.id();
        store.insert(s).await.unwrap();

        let found = store.for_order(order_id).await.unwrap().unwrap();
        assert_eq!(found.id(), id);
    }

    #[tokio::test]
    async fn test_save_missing_shipment_rejected() {
        let store = InMemoryShipments::new();
        let result = store.save(Shipment::new(OrderId::new(), "nowhere")).await;
        assert!(matches!(result, Err(StoreError::ShipmentNotFound(_))));
    }
}
