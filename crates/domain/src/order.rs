//! Order entity and its lifecycle state machine.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::{DomainError, Money};

/// The status of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Pending ──(payment completed)──► Confirmed ──(shipment delivered)──► Delivered
///    │
///    └──(explicit cancel)──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order placed, stock reserved, awaiting payment.
    #[default]
    Pending,

    /// Payment completed, awaiting shipment.
    Confirmed,

    /// Shipment delivered (terminal state).
    Delivered,

    /// Order was cancelled and its reservations released (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order can be confirmed in this status.
    pub fn can_confirm(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if the order can be marked delivered in this status.
    pub fn can_deliver(&self) -> bool {
        matches!(self, OrderStatus::Confirmed)
    }

    /// Returns true if the order can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line in an order.
///
/// The unit price is a snapshot taken from the product at order time; later
/// catalog price changes do not alter placed orders. The `reserved` flag
/// tracks whether this line currently holds a stock reservation, so a
/// release is applied at most once per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The product this line orders.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit at order time.
    pub unit_price: Money,

    reserved: bool,
}

impl OrderLine {
    /// Creates a new order line, rejecting zero quantities.
    pub fn new(
        product_id: ProductId,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        Ok(Self {
            product_id,
            quantity,
            unit_price,
            reserved: false,
        })
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Returns true if this line currently holds a stock reservation.
    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// Records that stock has been reserved for this line.
    pub fn mark_reserved(&mut self) {
        self.reserved = true;
    }

    /// Records that this line's reservation has been released.
    pub fn mark_released(&mut self) {
        self.reserved = false;
    }
}

/// An order with its line items, status, and per-order mutation lock.
///
/// The lock flag is the mutual-exclusion guard for multi-step transitions;
/// it is flipped through [`Order::try_lock`] / [`Order::unlock`] by the
/// order store under its own write lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    lines: Vec<OrderLine>,
    status: OrderStatus,
    locked: bool,
    total_amount: Money,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order, computing the total from its lines.
    pub fn new(user_id: UserId, lines: Vec<OrderLine>) -> Result<Self, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        let total_amount = lines.iter().map(OrderLine::line_total).sum();
        Ok(Self {
            id: OrderId::new(),
            user_id,
            lines,
            status: OrderStatus::Pending,
            locked: false,
            total_amount,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Mutable access to the lines, for reservation bookkeeping only.
    /// Lines cannot be added or removed after creation.
    pub fn lines_mut(&mut self) -> &mut [OrderLine] {
        &mut self.lines
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attempts to acquire the mutation lock. Returns false if already held.
    pub fn try_lock(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Releases the mutation lock.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Transitions Pending -> Confirmed.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        if !self.status.can_confirm() {
            return Err(DomainError::InvalidOrderTransition {
                current: self.status,
                action: "confirm",
            });
        }
        self.status = OrderStatus::Confirmed;
        Ok(())
    }

    /// Transitions Confirmed -> Delivered.
    pub fn mark_delivered(&mut self) -> Result<(), DomainError> {
        if !self.status.can_deliver() {
            return Err(DomainError::InvalidOrderTransition {
                current: self.status,
                action: "mark delivered",
            });
        }
        self.status = OrderStatus::Delivered;
        Ok(())
    }

    /// Transitions Pending -> Cancelled.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_cancel() {
            return Err(DomainError::InvalidOrderTransition {
                current: self.status,
                action: "cancel",
            });
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }
}
