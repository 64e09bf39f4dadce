//! Payment entity and its state machine.

use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId, UserId};
use serde::{Deserialize, Serialize};

use crate::{DomainError, Money};

/// The status of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payment recorded, not yet completed.
    #[default]
    Initiated,

    /// Payment completed and counted toward order confirmation.
    Completed,

    /// Payment failed or was rolled back (terminal state).
    Failed,
}

impl PaymentStatus {
    /// Returns true if the payment can be completed in this status.
    pub fn can_complete(&self) -> bool {
        matches!(self, PaymentStatus::Initiated)
    }

    /// Returns true if the payment can be failed in this status.
    ///
    /// A completed payment can still be failed: that is the rollback path
    /// taken when order confirmation does not go through.
    pub fn can_fail(&self) -> bool {
        matches!(self, PaymentStatus::Initiated | PaymentStatus::Completed)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Failed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Initiated => "INITIATED",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a payment is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    CashOnDelivery,
}

/// A payment attempt tied to an order.
///
/// The amount is copied from the order total at initiation and never
/// changes; `completed_at` is the only field that moves after completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    order_id: OrderId,
    user_id: UserId,
    amount: Money,
    method: PaymentMethod,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Creates a new initiated payment.
    pub fn new(order_id: OrderId, user_id: UserId, amount: Money, method: PaymentMethod) -> Self {
        Self {
            id: PaymentId::new(),
            order_id,
            user_id,
            amount,
            method,
            status: PaymentStatus::Initiated,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns true if this payment counts against the one-payment-per-order
    /// rule (any status other than Failed).
    pub fn is_active(&self) -> bool {
        self.status != PaymentStatus::Failed
    }

    /// Transitions Initiated -> Completed.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if !self.status.can_complete() {
            return Err(DomainError::InvalidPaymentTransition {
                current: self.status,
                action: "complete",
            });
        }
        self.status = PaymentStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Transitions to Failed, either from Initiated (ordinary failure) or
    /// from Completed (rollback after a failed order confirmation).
    pub fn fail(&mut self) -> Result<(), DomainError> {
        if !self.status.can_fail() {
            return Err(DomainError::InvalidPaymentTransition {
                current: self.status,
                action: "fail",
            });
        }
        self.status = PaymentStatus::Failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> Payment {
        Payment::new(
            OrderId::new(),
            UserId::new(),
            Money::from_cents(5000),
            PaymentMethod::CreditCard,
        )
    }

    #[test]
    fn test_new_payment_is_initiated() {
        let p = payment();
        assert_eq!(p.status(), PaymentStatus::Initiated);
        assert!(p.completed_at().is_none());
        assert!(p.is_active());
    }

    #[test]
    fn test_complete_sets_timestamp() {
        let mut p = payment();
        p.complete().unwrap();
        assert_eq!(p.status(), PaymentStatus::Completed);
        assert!(p.completed_at().is_some());
    }

    #[test]
    fn test_complete_twice_rejected() {
        let mut p = payment();
        p.complete().unwrap();
        assert!(matches!(
            p.complete(),
            Err(DomainError::InvalidPaymentTransition { .. })
        ));
    }

    #[test]
    fn test_fail_from_initiated() {
        let mut p = payment();
        p.fail().unwrap();
        assert_eq!(p.status(), PaymentStatus::Failed);
        assert!(!p.is_active());
    }

    #[test]
    fn test_fail_from_completed_rollback() {
        let mut p = payment();
        p.complete().unwrap();
        p.fail().unwrap();
        assert_eq!(p.status(), PaymentStatus::Failed);
    }

    #[test]
    fn test_fail_from_failed_rejected() {
        let mut p = payment();
        p.fail().unwrap();
        assert!(matches!(
            p.fail(),
            Err(DomainError::InvalidPaymentTransition { .. })
        ));
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"CASH_ON_DELIVERY\""
        );
    }
}
