use common::{OrderId, PaymentId, ProductId, ShipmentId};
use domain::Sku;
use thiserror::Error;

/// Errors raised by the repository layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The product was not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The order was not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The payment was not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// The shipment was not found.
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(ShipmentId),

    /// A different product already carries this SKU.
    #[error("Duplicate SKU: {0}")]
    DuplicateSku(Sku),

    /// A stock adjustment would drive the quantity on hand negative.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The order's mutation lock is already held.
    #[error("Order lock already held: {0}")]
    OrderLockHeld(OrderId),

    /// An active (non-failed) payment already exists for the order.
    #[error("Order {order_id} already has active payment {payment_id}")]
    ActivePaymentExists {
        order_id: OrderId,
        payment_id: PaymentId,
    },

    /// An active shipment already exists for the order.
    #[error("Order {order_id} already has shipment {shipment_id}")]
    ActiveShipmentExists {
        order_id: OrderId,
        shipment_id: ShipmentId,
    },
}
