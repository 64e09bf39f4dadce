//! Shipment tracking service: creation, status advancement, and location
//! updates.

use common::{OrderId, ShipmentId};
use domain::{OrderStatus, Shipment, ShipmentStatus};
use store::{CatalogStore, OrderStore, PaymentStore, ShipmentStore};

use crate::orders::OrderLifecycle;
use crate::{FulfillmentError, Result};

/// Creates and advances shipments for confirmed orders.
///
/// Delivering a shipment marks its order delivered in the same operation;
/// if the order cannot be marked delivered, the shipment stays in transit.
#[derive(Clone)]
pub struct ShipmentTracker<O, C, P, S> {
    shipments: S,
    orders: O,
    lifecycle: OrderLifecycle<O, C, P>,
}

impl<O, C, P, S> ShipmentTracker<O, C, P, S>
where
    O: OrderStore + Clone,
    C: CatalogStore + Clone,
    P: PaymentStore + Clone,
    S: ShipmentStore + Clone,
{
    /// Creates a new shipment tracker over the given stores and lifecycle.
    pub fn new(shipments: S, orders: O, lifecycle: OrderLifecycle<O, C, P>) -> Self {
        Self {
            shipments,
            orders,
            lifecycle,
        }
    }

    /// Creates a shipment for a confirmed order, assigning a tracking
    /// number. At most one shipment may exist per order.
    #[tracing::instrument(skip(self, address))]
    pub async fn create(&self, order_id: OrderId, address: String) -> Result<Shipment> {
        let order = self.orders.get(order_id).await?;
        if order.status() != OrderStatus::Confirmed {
            return Err(FulfillmentError::OrderNotConfirmed {
                order_id,
                status: order.status(),
            });
        }

        let shipment = Shipment::new(order_id, address);
        self.shipments.insert(shipment.clone()).await?;
        tracing::info!(
            shipment_id = %shipment.id(),
            %order_id,
            tracking_number = %shipment.tracking_number(),
            "shipment created"
        );
        Ok(shipment)
    }

    /// Advances a shipment one step forward. Advancing to `Delivered` also
    /// marks the order delivered.
    #[tracing::instrument(skip(self))]
    pub async fn advance(&self, shipment_id: ShipmentId, next: ShipmentStatus) -> Result<Shipment> {
        let mut shipment = self.shipments.get(shipment_id).await?;
        shipment.advance(next)?;

        // Order first: if the order cannot be delivered the shipment stays
        // where it was.
        if next == ShipmentStatus::Delivered {
            self.lifecycle.mark_delivered(shipment.order_id()).await?;
        }

        self.shipments.save(shipment.clone()).await?;
        tracing::info!(
            %shipment_id,
            order_id = %shipment.order_id(),
            status = %shipment.status(),
            "shipment advanced"
        );
        Ok(shipment)
    }

    /// Updates a shipment's advisory current location.
    #[tracing::instrument(skip(self, location))]
    pub async fn update_location(
        &self,
        shipment_id: ShipmentId,
        location: String,
    ) -> Result<Shipment> {
        let mut shipment = self.shipments.get(shipment_id).await?;
        shipment.set_location(location);
        self.shipments.save(shipment.clone()).await?;
        Ok(shipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CategoryId, UserId};
    use domain::{Money, Order, Payment, PaymentMethod, Product, Sku};
    use store::{InMemoryCatalog, InMemoryOrders, InMemoryPayments, InMemoryShipments};

    use crate::orders::OrderLineRequest;

    struct Fixture {
        catalog: InMemoryCatalog,
        orders: InMemoryOrders,
        payments: InMemoryPayments,
        shipments: InMemoryShipments,
        lifecycle: OrderLifecycle<InMemoryOrders, InMemoryCatalog, InMemoryPayments>,
        tracker:
            ShipmentTracker<InMemoryOrders, InMemoryCatalog, InMemoryPayments, InMemoryShipments>,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = InMemoryCatalog::new();
            let orders = InMemoryOrders::new();
            let payments = InMemoryPayments::new();
            let shipments = InMemoryShipments::new();
            let lifecycle = OrderLifecycle::new(orders.clone(), catalog.clone(), payments.clone());
            let tracker =
                ShipmentTracker::new(shipments.clone(), orders.clone(), lifecycle.clone());
            Self {
                catalog,
                orders,
                payments,
                shipments,
                lifecycle,
                tracker,
            }
        }

        async fn seed_pending_order(&self) -> Order {
            let product = Product::new(
                "Test Product",
                Sku::new("SKU-001").unwrap(),
                Money::from_cents(9999),
                100,
                CategoryId::new(),
            )
            .unwrap();
            let product_id = product.id();
            self.catalog.put(product).await.unwrap();

            self.lifecycle
                .create(
                    UserId::new(),
                    vec![OrderLineRequest {
                        product_id,
                        quantity: 1,
                    }],
                )
                .await
                .unwrap()
        }

        async fn seed_confirmed_order(&self) -> Order {
            let order = self.seed_pending_order().await;
            let mut payment = Payment::new(
                order.id(),
                order.user_id(),
                order.total_amount(),
                PaymentMethod::CreditCard,
            );
            payment.complete().unwrap();
            self.payments.insert(payment).await.unwrap();
            self.lifecycle.confirm(order.id()).await.unwrap()
        }
    }

    #[tokio::test]
    async fn test_create_for_confirmed_order() {
        let fx = Fixture::new();
        let order = fx.seed_confirmed_order().await;

        let shipment = fx
            .tracker
            .create(order.id(), "123 Test Street".to_string())
            .await
            .unwrap();

        assert_eq!(shipment.status(), ShipmentStatus::Preparing);
        assert_eq!(shipment.order_id(), order.id());
        assert!(shipment.tracking_number().as_str().starts_with("TRK-"));
    }

    #[tokio::test]
    async fn test_create_for_pending_order_rejected() {
        let fx = Fixture::new();
        let order = fx.seed_pending_order().await;

        let result = fx
            .tracker
            .create(order.id(), "123 Test Street".to_string())
            .await;
        assert!(matches!(
            result,
            Err(FulfillmentError::OrderNotConfirmed {
                status: domain::OrderStatus::Pending,
                ..
            })
        ));
        assert_eq!(fx.shipments.shipment_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_unknown_order() {
        let fx = Fixture::new();
        let result = fx
            .tracker
            .create(OrderId::new(), "123 Test Street".to_string())
            .await;
        assert!(matches!(result, Err(FulfillmentError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_second_shipment_rejected() {
        let fx = Fixture::new();
        let order = fx.seed_confirmed_order().await;
        fx.tracker
            .create(order.id(), "123 Test Street".to_string())
            .await
            .unwrap();

        let result = fx
            .tracker
            .create(order.id(), "456 Other Street".to_string())
            .await;
        assert!(matches!(
            result,
            Err(FulfillmentError::AlreadyShipped { .. })
        ));
    }

    #[tokio::test]
    async fn test_delivery_marks_order_delivered() {
        let fx = Fixture::new();
        let order = fx.seed_confirmed_order().await;
        let shipment = fx
            .tracker
            .create(order.id(), "123 Test Street".to_string())
            .await
            .unwrap();

        fx.tracker
            .advance(shipment.id(), ShipmentStatus::InTransit)
            .await
            .unwrap();
        let delivered = fx
            .tracker
            .advance(shipment.id(), ShipmentStatus::Delivered)
            .await
            .unwrap();

        assert_eq!(delivered.status(), ShipmentStatus::Delivered);
        assert_eq!(
            fx.orders.get(order.id()).await.unwrap().status(),
            domain::OrderStatus::Delivered
        );
    }

    #[tokio::test]
    async fn test_skipping_a_step_rejected() {
        let fx = Fixture::new();
        let order = fx.seed_confirmed_order().await;
        let shipment = fx
            .tracker
            .create(order.id(), "123 Test Street".to_string())
            .await
            .unwrap();

        let result = fx
            .tracker
            .advance(shipment.id(), ShipmentStatus::Delivered)
            .await;
        assert!(matches!(
            result,
            Err(FulfillmentError::Transition(
                domain::DomainError::InvalidShipmentTransition { .. }
            ))
        ));
        assert_eq!(
            fx.shipments.get(shipment.id()).await.unwrap().status(),
            ShipmentStatus::Preparing
        );
        assert_eq!(
            fx.orders.get(order.id()).await.unwrap().status(),
            domain::OrderStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_advance_while_order_locked_leaves_shipment_unchanged() {
        let fx = Fixture::new();
        let order = fx.seed_confirmed_order().await;
        let shipment = fx
            .tracker
            .create(order.id(), "123 Test Street".to_string())
            .await
            .unwrap();
        fx.tracker
            .advance(shipment.id(), ShipmentStatus::InTransit)
            .await
            .unwrap();

        fx.orders.try_lock(order.id()).await.unwrap();
        let result = fx
            .tracker
            .advance(shipment.id(), ShipmentStatus::Delivered)
            .await;
        assert!(matches!(result, Err(FulfillmentError::OrderLocked(_))));
        assert_eq!(
            fx.shipments.get(shipment.id()).await.unwrap().status(),
            ShipmentStatus::InTransit
        );
    }

    #[tokio::test]
    async fn test_update_location() {
        let fx = Fixture::new();
        let order = fx.seed_confirmed_order().await;
        let shipment = fx
            .tracker
            .create(order.id(), "123 Test Street".to_string())
            .await
            .unwrap();

        let updated = fx
            .tracker
            .update_location(shipment.id(), "Distribution center".to_string())
            .await
            .unwrap();
        assert_eq!(updated.current_location(), Some("Distribution center"));

        let stored = fx.shipments.get(shipment.id()).await.unwrap();
        assert_eq!(stored.current_location(), Some("Distribution center"));
    }

    #[tokio::test]
    async fn test_unknown_shipment() {
        let fx = Fixture::new();
        let result = fx
            .tracker
            .advance(ShipmentId::new(), ShipmentStatus::InTransit)
            .await;
        assert!(matches!(
            result,
            Err(FulfillmentError::ShipmentNotFound(_))
        ));
    }
}
