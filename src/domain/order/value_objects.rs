use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::Product;

// ============================================================================
// Order Value Objects
// ============================================================================

/// One requested (product, quantity) pair, as supplied by the caller.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// One priced line of an order.
///
/// `unit_price` is a snapshot: the product's price at the moment the order
/// was assembled, copied by value. Later changes to the live product price
/// never reach a stored line item.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LineItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl LineItem {
    /// Capture a product's identity, name and current price for an order.
    pub fn snapshot(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.unit_price,
        }
    }

    /// Exact decimal extension of this line: unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Order lifecycle status. Creation is the only transition this service
/// performs, so `Pending` is the only value it can ever produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "PENDING")]
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(OrderStatus::Pending),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
