//! Order fulfillment services and top-level coordinator.
//!
//! The fulfillment flow sequences four services, threading a single order
//! identifier through all of them:
//! 1. `OrderLifecycle` creates the order and reserves stock per line
//! 2. `PaymentLedger` records the payment and confirms the order
//! 3. `ShipmentTracker` ships the confirmed order
//! 4. delivering the shipment marks the order delivered
//!
//! `FulfillmentCoordinator` is the entry point external callers use; the
//! services below it own the business rules. Multi-line reservations are
//! all-or-nothing, payment completion and order confirmation form one
//! logical transaction, and every multi-step order mutation runs under the
//! order's non-blocking mutation lock.

mod config;
mod coordinator;
mod error;
mod inventory;
mod orders;
mod payments;
mod shipments;

pub use config::Config;
pub use coordinator::{
    FulfillmentCoordinator, OrderPlacement, OrderTracking, PaymentReceipt, PaymentSummary,
    ShipmentSummary, ShipmentTicket,
};
pub use error::FulfillmentError;
pub use inventory::InventoryService;
pub use orders::{OrderLifecycle, OrderLineRequest};
pub use payments::PaymentLedger;
pub use shipments::ShipmentTracker;

/// Result type for fulfillment operations.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
