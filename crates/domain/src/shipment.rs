//! Shipment entity and its state machine.

use chrono::{DateTime, Utc};
use common::{OrderId, ShipmentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DomainError;

/// The status of a shipment.
///
/// Transitions move strictly forward, one step at a time:
/// `Preparing -> InTransit -> Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Shipment created, package being prepared.
    #[default]
    Preparing,

    /// Package handed to the carrier.
    InTransit,

    /// Package delivered (terminal state).
    Delivered,
}

impl ShipmentStatus {
    /// Returns true if the shipment may move from this status to `next`.
    /// No skipping and no going backward.
    pub fn can_advance_to(&self, next: ShipmentStatus) -> bool {
        matches!(
            (self, next),
            (ShipmentStatus::Preparing, ShipmentStatus::InTransit)
                | (ShipmentStatus::InTransit, ShipmentStatus::Delivered)
        )
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Preparing => "PREPARING",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Carrier tracking number, assigned at shipment creation and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Generates a fresh tracking number.
    pub fn generate() -> Self {
        Self(format!("TRK-{}", Uuid::new_v4().simple()))
    }

    /// Returns the tracking number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shipment for a confirmed order.
///
/// The current location is advisory only and may change at any time; the
/// tracking number never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    id: ShipmentId,
    order_id: OrderId,
    address: String,
    tracking_number: TrackingNumber,
    status: ShipmentStatus,
    current_location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Creates a new preparing shipment with a freshly assigned tracking
    /// number.
    pub fn new(order_id: OrderId, address: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ShipmentId::new(),
            order_id,
            address: address.into(),
            tracking_number: TrackingNumber::generate(),
            status: ShipmentStatus::Preparing,
            current_location: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ShipmentId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn tracking_number(&self) -> &TrackingNumber {
        &self.tracking_number
    }

    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    pub fn current_location(&self) -> Option<&str> {
        self.current_location.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Advances the shipment to `next`, enforcing the forward-only,
    /// one-step-at-a-time rule.
    pub fn advance(&mut self, next: ShipmentStatus) -> Result<(), DomainError> {
        if !self.status.can_advance_to(next) {
            return Err(DomainError::InvalidShipmentTransition {
                current: self.status,
                requested: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Updates the advisory current location.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.current_location = Some(location.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment() -> Shipment {
        Shipment::new(OrderId::new(), "123 Test Street, Test City")
    }

    #[test]
    fn test_new_shipment_is_preparing() {
        let s = shipment();
        assert_eq!(s.status(), ShipmentStatus::Preparing);
        assert!(s.current_location().is_none());
        assert!(s.tracking_number().as_str().starts_with("TRK-"));
    }

    #[test]
    fn test_tracking_numbers_are_unique() {
        assert_ne!(TrackingNumber::generate(), TrackingNumber::generate());
    }

    #[test]
    fn test_advance_forward_one_step() {
        let mut s = shipment();
        s.advance(ShipmentStatus::InTransit).unwrap();
        assert_eq!(s.status(), ShipmentStatus::InTransit);
        s.advance(ShipmentStatus::Delivered).unwrap();
        assert_eq!(s.status(), ShipmentStatus::Delivered);
        assert!(s.status().is_terminal());
    }

    #[test]
    fn test_skipping_a_step_rejected() {
        let mut s = shipment();
        assert!(matches!(
            s.advance(ShipmentStatus::Delivered),
            Err(DomainError::InvalidShipmentTransition { .. })
        ));
        assert_eq!(s.status(), ShipmentStatus::Preparing);
    }

    #[test]
    fn test_going_backward_rejected() {
        let mut s = shipment();
        s.advance(ShipmentStatus::InTransit).unwrap();
        assert!(matches!(
            s.advance(ShipmentStatus::Preparing),
            Err(DomainError::InvalidShipmentTransition { .. })
        ));
    }

    #[test]
    fn test_advancing_delivered_rejected() {
        let mut s = shipment();
        s.advance(ShipmentStatus::InTransit).unwrap();
        s.advance(ShipmentStatus::Delivered).unwrap();
        assert!(matches!(
            s.advance(ShipmentStatus::Delivered),
            Err(DomainError::InvalidShipmentTransition { .. })
        ));
    }

    #[test]
    fn test_set_location() {
        let mut s = shipment();
        s.set_location("Distribution center, Springfield");
        assert_eq!(
            s.current_location(),
            Some("Distribution center, Springfield")
        );
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ShipmentStatus::InTransit).unwrap(),
            "\"IN_TRANSIT\""
        );
    }
}
