//! Order store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::Order;
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Storage for orders.
///
/// `try_lock`/`unlock` flip the order's mutation lock flag atomically under
/// the store's write guard. `try_lock` never waits: if the flag is already
/// held the call fails immediately, signaling the conflict to the caller.
/// Callers only `save` an order while holding its lock (or, for a brand-new
/// order, before any other caller can see it via `insert`).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Returns the order with the given ID.
    async fn get(&self, id: OrderId) -> Result<Order>;

    /// Inserts a new order.
    async fn insert(&self, order: Order) -> Result<()>;

    /// Replaces an existing order.
    async fn save(&self, order: Order) -> Result<()>;

    /// Attempts to acquire the order's mutation lock without blocking.
    async fn try_lock(&self, id: OrderId) -> Result<()>;

    /// Releases the order's mutation lock.
    async fn unlock(&self, id: OrderId) -> Result<()>;
}

/// In-memory order store.
#[derive(Clone, Default)]
pub struct InMemoryOrders {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrders {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrders {
    async fn get(&self, id: OrderId) -> Result<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(id))
    }

    async fn insert(&self, order: Order) -> Result<()> {
        self.orders.write().await.insert(order.id(), order);
        Ok(())
    }

    async fn save(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        let id = order.id();
        if !orders.contains_key(&id) {
            return Err(StoreError::OrderNotFound(id));
        }
        orders.insert(id, order);
        Ok(())
    }

    async fn try_lock(&self, id: OrderId) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::OrderNotFound(id))?;
        if !order.try_lock() {
            return Err(StoreError::OrderLockHeld(id));
        }
        Ok(())
    }

    async fn unlock(&self, id: OrderId) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::OrderNotFound(id))?;
        order.unlock();
        Ok(())
    }
}
