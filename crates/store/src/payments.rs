//! Payment store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, PaymentId};
use domain::Payment;
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Storage for payment records.
///
/// `insert` enforces the one-active-payment-per-order rule atomically: a
/// second insert for the same order is rejected unless every earlier
/// payment for that order has failed.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Returns the payment with the given ID.
    async fn get(&self, id: PaymentId) -> Result<Payment>;

    /// Inserts a new payment, rejecting a duplicate active payment for the
    /// same order.
    async fn insert(&self, payment: Payment) -> Result<()>;

    /// Replaces an existing payment.
    async fn save(&self, payment: Payment) -> Result<()>;

    /// Returns the active (non-failed) payment for an order, if any.
    async fn active_for_order(&self, order_id: OrderId) -> Result<Option<Payment>>;
}

/// In-memory payment store.
#[derive(Clone, Default)]
pub struct InMemoryPayments {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPayments {
    /// Creates a new empty payment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of payments stored.
    pub async fn payment_count(&self) -> usize {
        self.payments.read().await.len()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPayments {
    async fn get(&self, id: PaymentId) -> Result<Payment> {
        self.payments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::PaymentNotFound(id))
    }

    async fn insert(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        if let Some(existing) = payments
            .values()
            .find(|p| p.order_id() == payment.order_id() && p.is_active())
        {
            return Err(StoreError::ActivePaymentExists {
                order_id: payment.order_id(),
                payment_id: existing.id(),
            });
        }
        payments.insert(payment.id(), payment);
        Ok(())
    }

    async fn save(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        let id = payment.id();
        if !payments.contains_key(&id) {
            return Err(StoreError::PaymentNotFound(id));
        }
        payments.insert(id, payment);
        Ok(())
    }

    async fn active_for_order(&self, order_id: OrderId) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .find(|p| p.order_id() == order_id && p.is_active())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;
    use domain::{Money, PaymentMethod};

    fn payment(order_id: OrderId) -> Payment {
        Payment::new(
            order_id,
            UserId::new(),
            Money::from_cents(5000),
            PaymentMethod::CreditCard,
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryPayments::new();
        let p = payment(OrderId::new());
        let id = p.id();

        store.insert(p.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), p);
    }

    #[tokio::test]
    async fn test_second_active_payment_rejected() {
        let store = InMemoryPayments::new();
        let order_id = OrderId::new();
        store.insert(payment(order_id)).await.unwrap();

        let result = store.insert(payment(order_id)).await;
        assert!(matches!(result, Err(StoreError::ActivePaymentExists { .. })));
        assert_eq!(store.payment_count().await, 1);
    }

    #[tokio::test]
    async fn test_new_payment_allowed_after_failure() {
        let store = InMemoryPayments::new();
        let order_id = OrderId::new();

        let mut first = payment(order_id);
        let first_id = first.id();
        store.insert(first.clone()).await.unwrap();

        first.fail().unwrap();
        store.save(first).await.unwrap();
        assert!(!store.get(first_id).await.unwrap().is_active());

        store.insert(payment(order_id)).await.unwrap();
        assert_eq!(store.payment_count().await, 2);
    }

    #[tokio::test]
    async fn test_active_for_order() {
        let store = InMemoryPayments::new();
        let order_id = OrderId::new();
        assert!(store.active_for_order(order_id).await.unwrap().is_none());

        let p = payment(order_id);
        let id = p.id();
        store.insert(p).await.unwrap();

        let active = store.active_for_order(order_id).await.unwrap().unwrap();
        assert_eq!(active.id(), id);
    }

    #[tokio::test]
    async fn test_save_missing_payment_rejected() {
        let store = InMemoryPayments::new();
        let result = store.save(payment(OrderId::new())).await;
        assert!(matches!(result, Err(StoreError::PaymentNotFound(_))));
    }
}
