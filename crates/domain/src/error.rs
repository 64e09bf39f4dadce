//! Domain error types.

use thiserror::Error;

use crate::{OrderStatus, PaymentStatus, ShipmentStatus};

/// Errors raised by entity construction and state transitions.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An order state machine rule was violated.
    #[error("Invalid order transition: cannot {action} from {current} state")]
    InvalidOrderTransition {
        current: OrderStatus,
        action: &'static str,
    },

    /// A payment state machine rule was violated.
    #[error("Invalid payment transition: cannot {action} from {current} state")]
    InvalidPaymentTransition {
        current: PaymentStatus,
        action: &'static str,
    },

    /// A shipment state machine rule was violated.
    #[error("Invalid shipment transition: {current} -> {requested}")]
    InvalidShipmentTransition {
        current: ShipmentStatus,
        requested: ShipmentStatus,
    },

    /// An order must contain at least one line.
    #[error("Order has no lines")]
    EmptyOrder,

    /// Ordered quantities must be positive.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Unit prices must be non-negative.
    #[error("Invalid unit price: {cents} cents (must not be negative)")]
    NegativePrice { cents: i64 },

    /// SKUs must be non-blank.
    #[error("SKU must not be blank")]
    BlankSku,

    /// A stock adjustment would drive the quantity on hand negative.
    #[error("Stock underflow: {on_hand} on hand, adjustment {delta}")]
    StockUnderflow { on_hand: u32, delta: i64 },
}
