//! Domain layer for the order fulfillment core.
//!
//! This crate provides the entities the fulfillment workflow coordinates:
//! - `Product` with its stock counter and SKU
//! - `Order` with its line items and lifecycle state machine
//! - `Payment` tied to an order
//! - `Shipment` tied to a confirmed order
//!
//! State transition rules live on the status enums and entity methods;
//! persistence and orchestration live in the `store` and `fulfillment`
//! crates.

mod error;
mod money;
mod order;
mod payment;
mod product;
mod shipment;

pub use error::DomainError;
pub use money::Money;
pub use order::{Order, OrderLine, OrderStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use product::{Product, Sku};
pub use shipment::{Shipment, ShipmentStatus, TrackingNumber};
