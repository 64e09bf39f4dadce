//! Payment ledger service: initiation, completion, and failure of payments.

use common::{OrderId, PaymentId, UserId};
use domain::{DomainError, Money, Payment, PaymentMethod, PaymentStatus};
use store::{CatalogStore, OrderStore, PaymentStore};

use crate::orders::OrderLifecycle;
use crate::{FulfillmentError, Result};

/// Records payments against orders and drives order confirmation.
///
/// Completing a payment and confirming its order form one logical
/// transaction: if confirmation fails after the payment was marked
/// completed, the payment is rolled back to failed and the error is
/// surfaced to the caller.
#[derive(Clone)]
pub struct PaymentLedger<O, C, P> {
    payments: P,
    orders: O,
    lifecycle: OrderLifecycle<O, C, P>,
}

impl<O, C, P> PaymentLedger<O, C, P>
where
    O: OrderStore + Clone,
    C: CatalogStore + Clone,
    P: PaymentStore + Clone,
{
    /// Creates a new payment ledger over the given stores and lifecycle.
    pub fn new(payments: P, orders: O, lifecycle: OrderLifecycle<O, C, P>) -> Self {
        Self {
            payments,
            orders,
            lifecycle,
        }
    }

    /// Initiates a payment for an order on behalf of its owning user.
    ///
    /// The amount is copied from the order total. At most one active payment
    /// may exist per order; a second attempt fails with `AlreadyPaid` until
    /// the first has failed.
    #[tracing::instrument(skip(self))]
    pub async fn initiate(
        &self,
        order_id: OrderId,
        user_id: UserId,
        method: PaymentMethod,
    ) -> Result<Payment> {
        let order = self.orders.get(order_id).await?;
        if order.user_id() != user_id {
            return Err(FulfillmentError::UserMismatch {
                order_id,
                expected: order.user_id(),
                caller: user_id,
            });
        }

        let payment = Payment::new(order_id, user_id, order.total_amount(), method);
        self.payments.insert(payment.clone()).await?;
        tracing::info!(
            payment_id = %payment.id(),
            %order_id,
            amount = %payment.amount(),
            "payment initiated"
        );
        Ok(payment)
    }

    /// Completes an initiated payment, checking the offered amount against
    /// the order total, and confirms the order.
    ///
    /// On an amount mismatch the payment is failed and the order is left
    /// untouched. If the order cannot be confirmed after completion, the
    /// payment is rolled back to failed and the confirmation error is
    /// returned.
    #[tracing::instrument(skip(self))]
    pub async fn complete(&self, payment_id: PaymentId, offered: Money) -> Result<Payment> {
        let mut payment = self.payments.get(payment_id).await?;
        if !payment.status().can_complete() {
            return Err(DomainError::InvalidPaymentTransition {
                current: payment.status(),
                action: "complete",
            }
            .into());
        }

        let order = self.orders.get(payment.order_id()).await?;
        if offered != order.total_amount() {
            payment.fail()?;
            self.payments.save(payment.clone()).await?;
            tracing::warn!(
                %payment_id,
                order_id = %order.id(),
                expected = %order.total_amount(),
                %offered,
                "payment failed on amount mismatch"
            );
            return Err(FulfillmentError::AmountMismatch {
                expected: order.total_amount(),
                offered,
            });
        }

        payment.complete()?;
        self.payments.save(payment.clone()).await?;

        if let Err(e) = self.lifecycle.confirm(payment.order_id()).await {
            payment.fail()?;
            self.payments.save(payment.clone()).await?;
            tracing::warn!(
                %payment_id,
                order_id = %payment.order_id(),
                error = %e,
                "order confirmation failed, payment rolled back"
            );
            return Err(e);
        }

        tracing::info!(
            %payment_id,
            order_id = %payment.order_id(),
            "payment completed, order confirmed"
        );
        Ok(payment)
    }

    /// Fails an initiated payment explicitly, freeing the order for a new
    /// payment attempt.
    #[tracing::instrument(skip(self))]
    pub async fn fail(&self, payment_id: PaymentId) -> Result<Payment> {
        let mut payment = self.payments.get(payment_id).await?;
        if payment.status() != PaymentStatus::Initiated {
            return Err(DomainError::InvalidPaymentTransition {
                current: payment.status(),
                action: "fail",
            }
            .into());
        }
        payment.fail()?;
        self.payments.save(payment.clone()).await?;
        tracing::info!(%payment_id, order_id = %payment.order_id(), "payment failed");
        Ok(payment)
    }
}
