//! Shared identifier types used across the fulfillment workspace.

mod types;

pub use types::{CategoryId, OrderId, PaymentId, ProductId, ShipmentId, UserId};
