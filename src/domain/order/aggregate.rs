use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;
use super::value_objects::{LineItem, OrderItemRequest, OrderStatus};

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// An order and its line items form one aggregate: they are assembled
// together, persisted together, and read together. Two shapes exist:
//
// - `OrderDraft`: assembled in memory, carries no identifier. This is the
//   only shape the store accepts for persistence.
// - `Order`: the persisted aggregate. The identifier is assigned by the
//   store at commit time, so an id-less persisted order cannot exist.
//
// Orders are immutable after commit. There is no update or delete path.
//
// ============================================================================

/// An assembled, not-yet-persisted order graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub account_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub items: Vec<LineItem>,
}

/// A persisted order with its store-assigned identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub account_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub items: Vec<LineItem>,
}

impl OrderDraft {
    /// Assemble a draft from already-snapshotted line items.
    ///
    /// The total is the exact decimal sum of every line's extension.
    /// Item order is preserved as given.
    pub fn assemble(account_id: Uuid, items: Vec<LineItem>) -> Self {
        let total_amount = items.iter().map(LineItem::line_total).sum();
        Self {
            account_id,
            placed_at: Utc::now(),
            status: OrderStatus::Pending,
            total_amount,
            items,
        }
    }

    /// Validate the request shape before any product is resolved.
    pub fn validate_request(items: &[OrderItemRequest]) -> Result<(), OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        for item in items {
            if item.quantity <= 0 {
                return Err(OrderError::InvalidQuantity(item.quantity));
            }
        }

        Ok(())
    }

    /// Promote the draft to a persisted order. Only stores call this, with
    /// the identifier they just assigned.
    pub fn into_order(self, id: Uuid) -> Order {
        Order {
            id,
            account_id: self.account_id,
            placed_at: self.placed_at,
            status: self.status,
            total_amount: self.total_amount,
            items: self.items,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(name: &str, quantity: i32, price: Decimal) -> LineItem {
        LineItem {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            quantity,
            unit_price: price,
        }
    }

    #[test]
    fn test_assemble_sums_line_extensions_exactly() {
        let account_id = Uuid::new_v4();
        let draft = OrderDraft::assemble(
            account_id,
            vec![
                line("Widget", 2, dec!(1000.00)),
                line("Gadget", 3, dec!(0.10)),
            ],
        );

        assert_eq!(draft.account_id, account_id);
        assert_eq!(draft.status, OrderStatus::Pending);
        assert_eq!(draft.total_amount, dec!(2000.30));
        assert_eq!(draft.items.len(), 2);
    }

    #[test]
    fn test_assemble_preserves_item_order() {
        let items = vec![
            line("Third", 1, dec!(3.00)),
            line("First", 1, dec!(1.00)),
            line("Second", 1, dec!(2.00)),
        ];
        let names: Vec<String> = items.iter().map(|i| i.product_name.clone()).collect();

        let draft = OrderDraft::assemble(Uuid::new_v4(), items);
        let stored: Vec<String> = draft.items.iter().map(|i| i.product_name.clone()).collect();

        assert_eq!(stored, names);
    }

    #[test]
    fn test_empty_draft_totals_zero() {
        let draft = OrderDraft::assemble(Uuid::new_v4(), vec![]);
        assert_eq!(draft.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_validate_rejects_empty_request() {
        let err = OrderDraft::validate_request(&[]).unwrap_err();
        assert!(matches!(err, OrderError::EmptyItems));
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        for bad in [0, -1, -50] {
            let items = vec![OrderItemRequest {
                product_id: Uuid::new_v4(),
                quantity: bad,
            }];
            let err = OrderDraft::validate_request(&items).unwrap_err();
            assert!(matches!(err, OrderError::InvalidQuantity(q) if q == bad));
        }
    }

    #[test]
    fn test_into_order_keeps_all_fields() {
        let draft = OrderDraft::assemble(Uuid::new_v4(), vec![line("Widget", 2, dec!(5.25))]);
        let account_id = draft.account_id;
        let placed_at = draft.placed_at;
        let total = draft.total_amount;

        let id = Uuid::new_v4();
        let order = draft.into_order(id);

        assert_eq!(order.id, id);
        assert_eq!(order.account_id, account_id);
        assert_eq!(order.placed_at, placed_at);
        assert_eq!(order.total_amount, total);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
    }
}
