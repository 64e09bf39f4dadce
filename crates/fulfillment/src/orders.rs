//! Order lifecycle service: creation with stock reservation, confirmation,
//! delivery, and cancellation.

use common::{OrderId, ProductId, UserId};
use domain::{DomainError, Order, OrderLine, PaymentStatus};
use serde::{Deserialize, Serialize};
use store::{CatalogStore, OrderStore, PaymentStore};

use crate::inventory::InventoryService;
use crate::{FulfillmentError, Result};

/// A requested order line, as submitted by the caller.
///
/// The unit price is not part of the request; it is snapshotted from the
/// catalog when the order is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Drives an order through its lifecycle.
///
/// Creation reserves stock all-or-nothing across the order's lines.
/// Confirmation, delivery, and cancellation run under the order's
/// non-blocking mutation lock: a concurrent holder produces `OrderLocked`
/// instead of waiting, and the lock is released on every exit path.
#[derive(Clone)]
pub struct OrderLifecycle<O, C, P> {
    orders: O,
    payments: P,
    catalog: C,
    inventory: InventoryService<C>,
}

impl<O, C, P> OrderLifecycle<O, C, P>
where
    O: OrderStore + Clone,
    C: CatalogStore + Clone,
    P: PaymentStore + Clone,
{
    /// Creates a new order lifecycle service.
    pub fn new(orders: O, catalog: C, payments: P) -> Self {
        let inventory = InventoryService::new(catalog.clone());
        Self {
            orders,
            payments,
            catalog,
            inventory,
        }
    }

    /// Creates a pending order for the given user, reserving stock for every
    /// line.
    ///
    /// Reservations are all-or-nothing: if any line cannot be reserved, the
    /// reservations already taken for earlier lines are released and no
    /// order is stored.
    #[tracing::instrument(skip(self, requests))]
    pub async fn create(&self, user_id: UserId, requests: Vec<OrderLineRequest>) -> Result<Order> {
        if requests.is_empty() {
            return Err(DomainError::EmptyOrder.into());
        }

        let mut lines: Vec<OrderLine> = Vec::with_capacity(requests.len());
        for request in requests {
            let product = self.catalog.get(request.product_id).await?;
            let mut line =
                OrderLine::new(request.product_id, request.quantity, product.unit_price())?;

            if let Err(e) = self
                .inventory
                .reserve(request.product_id, request.quantity)
                .await
            {
                self.roll_back_reservations(&lines).await;
                return Err(e);
            }
            line.mark_reserved();
            lines.push(line);
        }

        let order = Order::new(user_id, lines)?;
        self.orders.insert(order.clone()).await?;
        tracing::info!(
            order_id = %order.id(),
            %user_id,
            total = %order.total_amount(),
            "order created"
        );
        Ok(order)
    }

    /// Confirms the order. Requires a completed payment.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(&self, order_id: OrderId) -> Result<Order> {
        self.orders.try_lock(order_id).await?;
        let result = self.confirm_locked(order_id).await;
        self.release_lock(order_id).await;
        result
    }

    /// Marks a confirmed order delivered.
    #[tracing::instrument(skip(self))]
    pub async fn mark_delivered(&self, order_id: OrderId) -> Result<Order> {
        self.orders.try_lock(order_id).await?;
        let result = self.deliver_locked(order_id).await;
        self.release_lock(order_id).await;
        result
    }

    /// Cancels a pending order and releases its stock reservations.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, order_id: OrderId) -> Result<Order> {
        self.orders.try_lock(order_id).await?;
        let result = self.cancel_locked(order_id).await;
        self.release_lock(order_id).await;
        result
    }

    async fn confirm_locked(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.orders.get(order_id).await?;

        let completed = self
            .payments
            .active_for_order(order_id)
            .await?
            .is_some_and(|p| p.status() == PaymentStatus::Completed);
        if !completed {
            return Err(FulfillmentError::PaymentNotCompleted(order_id));
        }

        order.confirm()?;
        self.orders.save(order.clone()).await?;
        tracing::info!(%order_id, "order confirmed");
        Ok(order)
    }

    async fn deliver_locked(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.orders.get(order_id).await?;
        order.mark_delivered()?;
        self.orders.save(order.clone()).await?;
        tracing::info!(%order_id, "order delivered");
        Ok(order)
    }

    async fn cancel_locked(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.orders.get(order_id).await?;
        if !order.status().can_cancel() {
            return Err(DomainError::InvalidOrderTransition {
                current: order.status(),
                action: "cancel",
            }
            .into());
        }

        // Releases run before the status flips and cleared flags are saved
        // on failure, so a retried cancel picks up where this one stopped
        // instead of releasing the same lines again.
        for idx in 0..order.lines().len() {
            let line = &order.lines()[idx];
            if !line.is_reserved() {
                continue;
            }
            let (product_id, quantity) = (line.product_id, line.quantity);
            if let Err(e) = self.inventory.release(product_id, quantity).await {
                tracing::warn!(
                    %order_id,
                    %product_id,
                    error = %e,
                    "failed to release reservation during cancel"
                );
                self.orders.save(order.clone()).await?;
                return Err(e);
            }
            order.lines_mut()[idx].mark_released();
        }

        order.cancel()?;
        self.orders.save(order.clone()).await?;
        tracing::info!(%order_id, "order cancelled, reservations released");
        Ok(order)
    }

    async fn roll_back_reservations(&self, lines: &[OrderLine]) {
        for line in lines {
            if !line.is_reserved() {
                continue;
            }
            if let Err(e) = self.inventory.release(line.product_id, line.quantity).await {
                tracing::warn!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %e,
                    "failed to roll back reservation"
                );
            }
        }
    }

    async fn release_lock(&self, order_id: OrderId) {
        if let Err(e) = self.orders.unlock(order_id).await {
            tracing::warn!(%order_id, error = %e, "failed to release order lock");
        }
    }
}
