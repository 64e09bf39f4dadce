//! Fulfillment error types.

use common::{OrderId, PaymentId, ProductId, ShipmentId, UserId};
use domain::{DomainError, Money, OrderStatus, Sku};
use store::StoreError;
use thiserror::Error;

/// Errors surfaced to callers of the fulfillment services.
///
/// Every error is reported synchronously to the immediate caller; the core
/// performs no automatic retries.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// The referenced user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The referenced payment does not exist.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// The referenced shipment does not exist.
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(ShipmentId),

    /// A reservation asked for more stock than is on hand.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Another caller holds the order's mutation lock.
    #[error("Order is locked by a concurrent operation: {0}")]
    OrderLocked(OrderId),

    /// The offered payment amount does not match the order total.
    #[error("Amount mismatch: order total is {expected}, offered {offered}")]
    AmountMismatch { expected: Money, offered: Money },

    /// An active payment already exists for the order.
    #[error("Order {order_id} already has active payment {payment_id}")]
    AlreadyPaid {
        order_id: OrderId,
        payment_id: PaymentId,
    },

    /// A shipment already exists for the order.
    #[error("Order {order_id} already has shipment {shipment_id}")]
    AlreadyShipped {
        order_id: OrderId,
        shipment_id: ShipmentId,
    },

    /// A shipment was requested for an order that is not confirmed.
    #[error("Order {order_id} is not confirmed (status: {status})")]
    OrderNotConfirmed {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// Confirmation was requested without a completed payment.
    #[error("Order {0} has no completed payment")]
    PaymentNotCompleted(OrderId),

    /// The caller is not the order's owning user.
    #[error("Order {order_id} belongs to user {expected}, not {caller}")]
    UserMismatch {
        order_id: OrderId,
        expected: UserId,
        caller: UserId,
    },

    /// A different product already carries this SKU.
    #[error("Duplicate SKU: {0}")]
    DuplicateSku(Sku),

    /// An entity state machine rule was violated.
    #[error(transparent)]
    Transition(#[from] DomainError),
}

impl From<StoreError> for FulfillmentError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ProductNotFound(id) => FulfillmentError::ProductNotFound(id),
            StoreError::OrderNotFound(id) => FulfillmentError::OrderNotFound(id),
            StoreError::PaymentNotFound(id) => FulfillmentError::PaymentNotFound(id),
            StoreError::ShipmentNotFound(id) => FulfillmentError::ShipmentNotFound(id),
            StoreError::DuplicateSku(sku) => FulfillmentError::DuplicateSku(sku),
            StoreError::InsufficientStock {
                product_id,
                requested,
                available,
            } => FulfillmentError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            StoreError::OrderLockHeld(id) => FulfillmentError::OrderLocked(id),
            StoreError::ActivePaymentExists {
                order_id,
                payment_id,
            } => FulfillmentError::AlreadyPaid {
                order_id,
                payment_id,
            },
            StoreError::ActiveShipmentExists {
                order_id,
                shipment_id,
            } => FulfillmentError::AlreadyShipped {
                order_id,
                shipment_id,
            },
        }
    }
}
