//! Top-level coordinator tying the fulfillment services together.

use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId, ShipmentId, UserId};
use domain::{
    Money, OrderStatus, PaymentMethod, PaymentStatus, ShipmentStatus, TrackingNumber,
};
use serde::Serialize;
use store::{CatalogStore, OrderStore, PaymentStore, ShipmentStore, UserDirectory};

use crate::orders::{OrderLifecycle, OrderLineRequest};
use crate::payments::PaymentLedger;
use crate::shipments::ShipmentTracker;
use crate::{FulfillmentError, Result};

/// Response for a placed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPlacement {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Money,
}

/// Response for a completed payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub amount: Money,
}

/// Response for a created shipment.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentTicket {
    pub shipment_id: ShipmentId,
    pub order_id: OrderId,
    pub status: ShipmentStatus,
    pub tracking_number: TrackingNumber,
}

/// Payment portion of the consolidated tracking view.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    pub amount: Money,
    pub method: PaymentMethod,
}

/// Shipment portion of the consolidated tracking view.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentSummary {
    pub shipment_id: ShipmentId,
    pub status: ShipmentStatus,
    pub tracking_number: TrackingNumber,
    pub current_location: Option<String>,
}

/// Consolidated view of an order with its payment and shipment, if any.
#[derive(Debug, Clone, Serialize)]
pub struct OrderTracking {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
    pub payment: Option<PaymentSummary>,
    pub shipment: Option<ShipmentSummary>,
}

/// Entry point for order fulfillment.
///
/// Sequences the order, payment, and shipment services over shared stores.
/// Each operation resolves to a response DTO or a `FulfillmentError`; the
/// services below own the business rules.
#[derive(Clone)]
pub struct FulfillmentCoordinator<U, C, O, P, S> {
    users: U,
    orders: O,
    payments: P,
    shipments: S,
    lifecycle: OrderLifecycle<O, C, P>,
    ledger: PaymentLedger<O, C, P>,
    tracker: ShipmentTracker<O, C, P, S>,
}

impl<U, C, O, P, S> FulfillmentCoordinator<U, C, O, P, S>
where
    U: UserDirectory + Clone,
    C: CatalogStore + Clone,
    O: OrderStore + Clone,
    P: PaymentStore + Clone,
    S: ShipmentStore + Clone,
{
    /// Creates a new coordinator over the given stores.
    pub fn new(users: U, catalog: C, orders: O, payments: P, shipments: S) -> Self {
        let lifecycle = OrderLifecycle::new(orders.clone(), catalog.clone(), payments.clone());
        let ledger = PaymentLedger::new(payments.clone(), orders.clone(), lifecycle.clone());
        let tracker = ShipmentTracker::new(shipments.clone(), orders.clone(), lifecycle.clone());
        Self {
            users,
            orders,
            payments,
            shipments,
            lifecycle,
            ledger,
            tracker,
        }
    }

    /// Places an order for an existing user, reserving stock for every line.
    #[tracing::instrument(skip(self, lines))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        lines: Vec<OrderLineRequest>,
    ) -> Result<OrderPlacement> {
        let start = std::time::Instant::now();
        if !self.users.exists(user_id).await? {
            return Err(FulfillmentError::UserNotFound(user_id));
        }

        let order = self.lifecycle.create(user_id, lines).await?;
        metrics::counter!("orders_placed_total").increment(1);
        metrics::histogram!("place_order_duration_seconds").record(start.elapsed().as_secs_f64());
        Ok(OrderPlacement {
            order_id: order.id(),
            status: order.status(),
            total_amount: order.total_amount(),
        })
    }

    /// Pays for an order and confirms it.
    ///
    /// The offered amount must match the order total exactly; a mismatch is
    /// rejected before any payment is recorded.
    #[tracing::instrument(skip(self))]
    pub async fn pay_order(
        &self,
        order_id: OrderId,
        user_id: UserId,
        method: PaymentMethod,
        amount: Money,
    ) -> Result<PaymentReceipt> {
        let start = std::time::Instant::now();
        let order = self.orders.get(order_id).await?;
        if amount != order.total_amount() {
            return Err(FulfillmentError::AmountMismatch {
                expected: order.total_amount(),
                offered: amount,
            });
        }

        let payment = self.ledger.initiate(order_id, user_id, method).await?;
        let payment = self.ledger.complete(payment.id(), amount).await?;
        metrics::counter!("payments_completed_total").increment(1);
        metrics::histogram!("pay_order_duration_seconds").record(start.elapsed().as_secs_f64());
        Ok(PaymentReceipt {
            payment_id: payment.id(),
            order_id,
            status: payment.status(),
            amount: payment.amount(),
        })
    }

    /// Creates a shipment for a confirmed order.
    #[tracing::instrument(skip(self, address))]
    pub async fn ship_order(&self, order_id: OrderId, address: String) -> Result<ShipmentTicket> {
        let shipment = self.tracker.create(order_id, address).await?;
        metrics::counter!("shipments_created_total").increment(1);
        Ok(ShipmentTicket {
            shipment_id: shipment.id(),
            order_id,
            status: shipment.status(),
            tracking_number: shipment.tracking_number().clone(),
        })
    }

    /// Advances a shipment one step. Delivery also marks the order
    /// delivered.
    #[tracing::instrument(skip(self))]
    pub async fn advance_shipment(
        &self,
        shipment_id: ShipmentId,
        next: ShipmentStatus,
    ) -> Result<ShipmentStatus> {
        let shipment = self.tracker.advance(shipment_id, next).await?;
        if shipment.status() == ShipmentStatus::Delivered {
            metrics::counter!("shipments_delivered_total").increment(1);
        }
        Ok(shipment.status())
    }

    /// Updates a shipment's advisory current location.
    #[tracing::instrument(skip(self, location))]
    pub async fn update_location(&self, shipment_id: ShipmentId, location: String) -> Result<()> {
        self.tracker.update_location(shipment_id, location).await?;
        Ok(())
    }

    /// Cancels a pending order and releases its stock reservations.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<OrderPlacement> {
        let order = self.lifecycle.cancel(order_id).await?;
        metrics::counter!("orders_cancelled_total").increment(1);
        Ok(OrderPlacement {
            order_id: order.id(),
            status: order.status(),
            total_amount: order.total_amount(),
        })
    }

    /// Returns the consolidated tracking view for an order.
    #[tracing::instrument(skip(self))]
    pub async fn track_order(&self, order_id: OrderId) -> Result<OrderTracking> {
        let order = self.orders.get(order_id).await?;
        let payment = self.payments.active_for_order(order_id).await?;
        let shipment = self.shipments.for_order(order_id).await?;

        Ok(OrderTracking {
            order_id: order.id(),
            user_id: order.user_id(),
            status: order.status(),
            total_amount: order.total_amount(),
            created_at: order.created_at(),
            payment: payment.map(|p| PaymentSummary {
                payment_id: p.id(),
                status: p.status(),
                amount: p.amount(),
                method: p.method(),
            }),
            shipment: shipment.map(|s| ShipmentSummary {
                shipment_id: s.id(),
                status: s.status(),
                tracking_number: s.tracking_number().clone(),
                current_location: s.current_location().map(str::to_string),
            }),
        })
    }
}
