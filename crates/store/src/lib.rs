//! Repository traits and in-memory implementations.
//!
//! Each entity collection gets a trait with atomic per-key operations; the
//! in-memory implementations guard a `HashMap` with a `tokio::sync::RwLock`
//! and perform every read-modify-write under a single write guard. The two
//! hot mutation points, product stock and the order status/lock pair, are
//! only ever touched through these atomic operations.

mod catalog;
mod error;
mod orders;
mod payments;
mod shipments;
mod users;

pub use catalog::{CatalogStore, InMemoryCatalog};
pub use error::StoreError;
pub use orders::{InMemoryOrders, OrderStore};
pub use payments::{InMemoryPayments, PaymentStore};
pub use shipments::{InMemoryShipments, ShipmentStore};
pub use users::{InMemoryUsers, UserDirectory};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
