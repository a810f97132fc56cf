use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::aggregate::Order;

// ============================================================================
// Order Presenter - External Response Shape
// ============================================================================
//
// Pure mapping from the persisted aggregate to the shape handed to whatever
// transport wraps this core. Product name and id are denormalized into each
// line, and the price exposed is the stored snapshot, never a live catalog
// price.
//
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: String,
    pub items: Vec<LineItemResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Map a persisted order to its response shape. Infallible: only the
/// aggregator and the store produce `Order` values, and both produce
/// structurally valid ones.
pub fn to_response(order: &Order) -> OrderResponse {
    let items = order
        .items
        .iter()
        .map(|item| LineItemResponse {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.unit_price,
        })
        .collect();

    OrderResponse {
        id: order.id,
        account_id: order.account_id,
        placed_at: order.placed_at,
        total_amount: order.total_amount,
        status: order.status.to_string(),
        items,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
