use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::metrics::Metrics;
use crate::store::{AccountStore, OrderStore, ProductStore};

use super::aggregate::OrderDraft;
use super::errors::OrderError;
use super::presenter::{to_response, OrderResponse};
use super::value_objects::{LineItem, OrderItemRequest};

// ============================================================================
// Order Service - Aggregation and Queries
// ============================================================================
//
// Orchestrates: request -> lookups -> snapshot -> draft -> atomic save.
//
// Failure policy: every error detected during aggregation aborts the
// operation before any write. A storage failure from the save itself
// surfaces unchanged; nothing retries here.
//
// ============================================================================

pub struct OrderService {
    accounts: Arc<dyn AccountStore>,
    products: Arc<dyn ProductStore>,
    orders: Arc<dyn OrderStore>,
    metrics: Arc<Metrics>,
}

impl OrderService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        products: Arc<dyn ProductStore>,
        orders: Arc<dyn OrderStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            accounts,
            products,
            orders,
            metrics,
        }
    }

    /// Create and persist one order for `account_id`.
    ///
    /// Returns the persisted order's external representation, with the
    /// store-assigned identifier and the snapshotted line prices.
    pub async fn create_order(
        &self,
        account_id: Uuid,
        items: Vec<OrderItemRequest>,
    ) -> Result<OrderResponse, OrderError> {
        let started = Instant::now();

        match self.aggregate_and_persist(account_id, items).await {
            Ok(response) => {
                self.metrics
                    .record_order_created(response.items.len(), started.elapsed().as_secs_f64());
                Ok(response)
            }
            Err(err) => {
                self.metrics.record_order_failed(err.reason());
                tracing::warn!(
                    account_id = %account_id,
                    error = %err,
                    "Order creation aborted"
                );
                Err(err)
            }
        }
    }

    async fn aggregate_and_persist(
        &self,
        account_id: Uuid,
        items: Vec<OrderItemRequest>,
    ) -> Result<OrderResponse, OrderError> {
        // Buyer must exist before any other work happens.
        if self.accounts.find_by_id(account_id).await?.is_none() {
            return Err(OrderError::AccountNotFound(account_id));
        }

        OrderDraft::validate_request(&items)?;

        // Resolve every product in caller order. Each line copies the price
        // seen at this lookup; the Product itself is dropped right away.
        let mut lines = Vec::with_capacity(items.len());
        for request in &items {
            let product = self
                .products
                .find_by_id(request.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(request.product_id))?;
            lines.push(LineItem::snapshot(&product, request.quantity));
        }

        let draft = OrderDraft::assemble(account_id, lines);
        let order = self.orders.save(draft).await?;

        tracing::info!(
            order_id = %order.id,
            account_id = %order.account_id,
            total_amount = %order.total_amount,
            item_count = order.items.len(),
            "Order persisted"
        );

        Ok(to_response(&order))
    }

    /// Every persisted order, in the store's stable enumeration order.
    pub async fn list_all(&self) -> Result<Vec<OrderResponse>, OrderError> {
        self.metrics.record_order_query("all");
        let orders = self.orders.find_all().await?;
        Ok(orders.iter().map(to_response).collect())
    }

    /// Orders owned by `account_id`. An unknown account or one without
    /// orders yields an empty list, not an error; existence is not
    /// re-validated at query time.
    pub async fn list_for_account(&self, account_id: Uuid) -> Result<Vec<OrderResponse>, OrderError> {
        self.metrics.record_order_query("account");
        let orders = self.orders.find_by_account(account_id).await?;
        Ok(orders.iter().map(to_response).collect())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{credential_digest, Account, Email};
    use crate::domain::product::Product;
    use crate::store::{MemoryAccountStore, MemoryOrderStore, MemoryProductStore};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Harness {
        accounts: Arc<MemoryAccountStore>,
        products: Arc<MemoryProductStore>,
        orders: Arc<MemoryOrderStore>,
        service: OrderService,
    }

    fn harness() -> Harness {
        let accounts = Arc::new(MemoryAccountStore::new());
        let products = Arc::new(MemoryProductStore::new());
        let orders = Arc::new(MemoryOrderStore::new());
        let metrics = Arc::new(Metrics::new().unwrap());

        let service = OrderService::new(
            accounts.clone(),
            products.clone(),
            orders.clone(),
            metrics,
        );

        Harness {
            accounts,
            products,
            orders,
            service,
        }
    }

    async fn seed_account(h: &Harness) -> Uuid {
        let account = Account {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: Email::new("ada@example.com"),
            password_hash: credential_digest("s3cret"),
            created_at: Utc::now(),
        };
        let id = account.id;
        h.accounts.insert(account).await.unwrap();
        id
    }

    async fn seed_product(h: &Harness, name: &str, price: Decimal) -> Uuid {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            unit_price: price,
            image_url: None,
        };
        let id = product.id;
        h.products.insert(product).await.unwrap();
        id
    }

    fn request(product_id: Uuid, quantity: i32) -> OrderItemRequest {
        OrderItemRequest {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_order_snapshots_price_and_computes_total() {
        let h = harness();
        let buyer = seed_account(&h).await;
        let widget = seed_product(&h, "Widget", dec!(1000.00)).await;

        let response = h
            .service
            .create_order(buyer, vec![request(widget, 2)])
            .await
            .unwrap();

        assert_eq!(response.account_id, buyer);
        assert_eq!(response.status, "PENDING");
        assert_eq!(response.total_amount, dec!(2000.00));
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].product_id, widget);
        assert_eq!(response.items[0].quantity, 2);
        assert_eq!(response.items[0].price, dec!(1000.00));
    }

    #[tokio::test]
    async fn test_total_is_exact_across_lines() {
        let h = harness();
        let buyer = seed_account(&h).await;
        let a = seed_product(&h, "A", dec!(0.10)).await;
        let b = seed_product(&h, "B", dec!(0.20)).await;

        let response = h
            .service
            .create_order(buyer, vec![request(a, 3), request(b, 1)])
            .await
            .unwrap();

        // 0.10*3 + 0.20 would drift under binary floats.
        assert_eq!(response.total_amount, dec!(0.50));
    }

    #[tokio::test]
    async fn test_line_order_follows_request_order() {
        let h = harness();
        let buyer = seed_account(&h).await;
        let zebra = seed_product(&h, "Zebra", dec!(1.00)).await;
        let apple = seed_product(&h, "Apple", dec!(2.00)).await;

        let response = h
            .service
            .create_order(buyer, vec![request(zebra, 1), request(apple, 1)])
            .await
            .unwrap();

        let names: Vec<_> = response.items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Apple"]);
    }

    #[tokio::test]
    async fn test_unknown_account_persists_nothing() {
        let h = harness();
        let widget = seed_product(&h, "Widget", dec!(10.00)).await;

        let missing = Uuid::new_v4();
        let err = h
            .service
            .create_order(missing, vec![request(widget, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::AccountNotFound(id) if id == missing));
        assert_eq!(h.orders.save_count(), 0);
    }

    #[tokio::test]
    async fn test_one_unknown_product_aborts_whole_order() {
        let h = harness();
        let buyer = seed_account(&h).await;
        let valid = seed_product(&h, "Widget", dec!(10.00)).await;
        let phantom = Uuid::new_v4();

        let err = h
            .service
            .create_order(buyer, vec![request(valid, 1), request(phantom, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::ProductNotFound(id) if id == phantom));
        assert_eq!(h.orders.save_count(), 0);
        assert!(h.service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_shapes_abort_before_any_save() {
        let h = harness();
        let buyer = seed_account(&h).await;
        let widget = seed_product(&h, "Widget", dec!(10.00)).await;

        let err = h.service.create_order(buyer, vec![]).await.unwrap_err();
        assert!(matches!(err, OrderError::EmptyItems));

        let err = h
            .service
            .create_order(buyer, vec![request(widget, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity(0)));

        assert_eq!(h.orders.save_count(), 0);
    }

    #[tokio::test]
    async fn test_later_price_change_leaves_order_frozen() {
        let h = harness();
        let buyer = seed_account(&h).await;
        let widget = seed_product(&h, "Widget", dec!(1000.00)).await;

        let created = h
            .service
            .create_order(buyer, vec![request(widget, 2)])
            .await
            .unwrap();

        // Live price doubles after the order was placed.
        let mut live = h.products.find_by_id(widget).await.unwrap().unwrap();
        live.unit_price = dec!(2000.00);
        assert!(h.products.update(live).await.unwrap());

        let listed = h.service.list_for_account(buyer).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].total_amount, dec!(2000.00));
        assert_eq!(listed[0].items[0].price, dec!(1000.00));
    }

    #[tokio::test]
    async fn test_list_for_account_filters_and_stays_stable() {
        let h = harness();
        let ada = seed_account(&h).await;
        let bob = seed_account(&h).await;
        let widget = seed_product(&h, "Widget", dec!(5.00)).await;

        let first = h.service.create_order(ada, vec![request(widget, 1)]).await.unwrap();
        h.service.create_order(bob, vec![request(widget, 2)]).await.unwrap();
        let third = h.service.create_order(ada, vec![request(widget, 3)]).await.unwrap();

        let once = h.service.list_for_account(ada).await.unwrap();
        let twice = h.service.list_for_account(ada).await.unwrap();

        let ids: Vec<_> = once.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![first.id, third.id]);
        assert_eq!(ids, twice.iter().map(|o| o.id).collect::<Vec<_>>());
        assert!(once.iter().all(|o| o.account_id == ada));
    }

    #[tokio::test]
    async fn test_list_for_orderless_account_is_empty_not_an_error() {
        let h = harness();
        let ada = seed_account(&h).await;

        assert!(h.service.list_for_account(ada).await.unwrap().is_empty());
        // Unknown accounts are not re-validated at query time either.
        assert!(h
            .service
            .list_for_account(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }
}
