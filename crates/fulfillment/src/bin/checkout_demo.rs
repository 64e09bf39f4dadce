//! Demo binary walking an order through the full fulfillment flow.

use common::UserId;
use domain::{Money, PaymentMethod, Product, ShipmentStatus, Sku};
use fulfillment::{Config, FulfillmentCoordinator, OrderLineRequest};
use store::{
    CatalogStore, InMemoryCatalog, InMemoryOrders, InMemoryPayments, InMemoryShipments,
    InMemoryUsers,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let users = InMemoryUsers::new();
    let catalog = InMemoryCatalog::new();
    let orders = InMemoryOrders::new();
    let payments = InMemoryPayments::new();
    let shipments = InMemoryShipments::new();
    let coordinator = FulfillmentCoordinator::new(
        users.clone(),
        catalog.clone(),
        orders,
        payments,
        shipments,
    );

    let user_id = UserId::new();
    users.add(user_id).await;

    let product = Product::new(
        "Wireless Headphones",
        Sku::new("HDPH-001").expect("valid sku"),
        Money::from_cents(99999),
        config.demo_stock,
        common::CategoryId::new(),
    )
    .expect("valid product");
    let product_id = product.id();
    catalog.put(product).await.expect("seed product");

    let placement = coordinator
        .place_order(
            user_id,
            vec![OrderLineRequest {
                product_id,
                quantity: config.demo_quantity,
            }],
        )
        .await
        .expect("place order");
    tracing::info!(order_id = %placement.order_id, total = %placement.total_amount, "order placed");

    let receipt = coordinator
        .pay_order(
            placement.order_id,
            user_id,
            PaymentMethod::CreditCard,
            placement.total_amount,
        )
        .await
        .expect("pay order");
    tracing::info!(payment_id = %receipt.payment_id, status = %receipt.status, "order paid");

    let ticket = coordinator
        .ship_order(placement.order_id, "742 Evergreen Terrace".to_string())
        .await
        .expect("ship order");
    tracing::info!(
        shipment_id = %ticket.shipment_id,
        tracking_number = %ticket.tracking_number,
        "shipment created"
    );

    coordinator
        .advance_shipment(ticket.shipment_id, ShipmentStatus::InTransit)
        .await
        .expect("advance to in transit");
    coordinator
        .update_location(ticket.shipment_id, "Regional distribution center".to_string())
        .await
        .expect("update location");
    coordinator
        .advance_shipment(ticket.shipment_id, ShipmentStatus::Delivered)
        .await
        .expect("advance to delivered");

    let tracking = coordinator
        .track_order(placement.order_id)
        .await
        .expect("track order");
    let remaining = catalog
        .get(product_id)
        .await
        .expect("product still listed")
        .quantity_on_hand();
    tracing::info!(
        order_id = %tracking.order_id,
        status = %tracking.status,
        remaining_stock = remaining,
        "fulfillment complete"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&tracking).expect("serialize tracking view")
    );
}
