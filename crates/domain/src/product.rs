//! Catalog product entity.

use common::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

use crate::{DomainError, Money};

/// Stock-keeping unit. Unique across the catalog and never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Creates a SKU, rejecting blank input.
    pub fn new(sku: impl Into<String>) -> Result<Self, DomainError> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(DomainError::BlankSku);
        }
        Ok(Self(sku))
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A catalog product with its current quantity on hand.
///
/// Stock is only mutated through [`Product::adjust_quantity`], which the
/// catalog store applies atomically per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    sku: Sku,
    unit_price: Money,
    quantity_on_hand: u32,
    category_id: CategoryId,
}

impl Product {
    /// Creates a new product, rejecting negative unit prices.
    pub fn new(
        title: impl Into<String>,
        sku: Sku,
        unit_price: Money,
        quantity_on_hand: u32,
        category_id: CategoryId,
    ) -> Result<Self, DomainError> {
        if unit_price.is_negative() {
            return Err(DomainError::NegativePrice {
                cents: unit_price.cents(),
            });
        }
        Ok(Self {
            id: ProductId::new(),
            title: title.into(),
            sku,
            unit_price,
            quantity_on_hand,
            category_id,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity_on_hand(&self) -> u32 {
        self.quantity_on_hand
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Applies a signed adjustment to the quantity on hand.
    ///
    /// Fails without modifying anything if the result would be negative;
    /// stock is never clamped to zero.
    pub fn adjust_quantity(&mut self, delta: i64) -> Result<u32, DomainError> {
        let adjusted = self.quantity_on_hand as i64 + delta;
        if adjusted < 0 {
            return Err(DomainError::StockUnderflow {
                on_hand: self.quantity_on_hand,
                delta,
            });
        }
        self.quantity_on_hand = adjusted as u32;
        Ok(self.quantity_on_hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(price_cents: i64, quantity: u32) -> Product {
        Product::new(
            "Widget",
            Sku::new("SKU-001").unwrap(),
            Money::from_cents(price_cents),
            quantity,
            CategoryId::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_sku_rejected() {
        assert!(matches!(Sku::new(""), Err(DomainError::BlankSku)));
        assert!(matches!(Sku::new("   "), Err(DomainError::BlankSku)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Product::new(
            "Widget",
            Sku::new("SKU-001").unwrap(),
            Money::from_cents(-1),
            10,
            CategoryId::new(),
        );
        assert!(matches!(result, Err(DomainError::NegativePrice { .. })));
    }

    #[test]
    fn test_zero_price_allowed() {
        let result = Product::new(
            "Freebie",
            Sku::new("SKU-FREE").unwrap(),
            Money::zero(),
            10,
            CategoryId::new(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_adjust_quantity_decrements() {
        let mut product = widget(1000, 50);
        let remaining = product.adjust_quantity(-2).unwrap();
        assert_eq!(remaining, 48);
        assert_eq!(product.quantity_on_hand(), 48);
    }

    #[test]
    fn test_adjust_quantity_underflow_leaves_stock_unchanged() {
        let mut product = widget(1000, 5);
        let result = product.adjust_quantity(-6);
        assert!(matches!(
            result,
            Err(DomainError::StockUnderflow { on_hand: 5, delta: -6 })
        ));
        assert_eq!(product.quantity_on_hand(), 5);
    }

    #[test]
    fn test_adjust_quantity_to_exactly_zero() {
        let mut product = widget(1000, 5);
        assert_eq!(product.adjust_quantity(-5).unwrap(), 0);
    }

    #[test]
    fn test_adjust_quantity_increments() {
        let mut product = widget(1000, 5);
        assert_eq!(product.adjust_quantity(3).unwrap(), 8);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let product = widget(99999, 50);
        let json = serde_json::to_string(&product).unwrap();
        let deserialized: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, deserialized);
    }
}
