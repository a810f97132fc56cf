use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::account::{Account, Email};
use crate::domain::order::{LineItem, Order, OrderDraft, OrderStatus};
use crate::domain::product::Product;

use super::{AccountStore, OrderStore, ProductStore, StorageError};

// ============================================================================
// Postgres Stores
// ============================================================================
//
// The order save is the one operation with a real consistency requirement:
// the header row and every line-item row commit inside a single transaction.
// If any insert fails the transaction rolls back and no trace of the order
// remains.
//
// ============================================================================

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: Email::new(row.email),
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, account: Account) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO accounts (id, name, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, account: Account) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE accounts SET name = $2, email = $3, password_hash = $4 WHERE id = $1",
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StorageError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Account::from))
    }

    async fn find_all(&self) -> Result<Vec<Account>, StorageError> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, created_at FROM accounts \
             ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }
}

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    unit_price: Decimal,
    image_url: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            unit_price: row.unit_price,
            image_url: row.image_url,
        }
    }
}

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn insert(&self, product: Product) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO products (id, name, description, unit_price, image_url) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(&product.image_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, description = $3, unit_price = $4, image_url = $5 \
             WHERE id = $1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(&product.image_url)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, unit_price, image_url FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, unit_price, image_url FROM products ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<Product>, StorageError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, unit_price, image_url FROM products \
             WHERE name ILIKE '%' || $1 || '%' ORDER BY name, id",
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, StorageError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, unit_price, image_url FROM products \
             WHERE unit_price BETWEEN $1 AND $2 ORDER BY unit_price, id",
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[derive(FromRow)]
struct OrderRow {
    id: Uuid,
    account_id: Uuid,
    placed_at: DateTime<Utc>,
    total_amount: Decimal,
    status: String,
}

#[derive(FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    product_id: Uuid,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the line items for a page of headers and zip them back together,
    /// preserving the header ordering and each order's line_index ordering.
    async fn attach_items(&self, headers: Vec<OrderRow>) -> Result<Vec<Order>, StorageError> {
        let ids: Vec<Uuid> = headers.iter().map(|header| header.id).collect();

        let mut grouped: HashMap<Uuid, Vec<LineItem>> = HashMap::new();
        if !ids.is_empty() {
            let rows: Vec<OrderItemRow> = sqlx::query_as(
                "SELECT order_id, product_id, product_name, quantity, unit_price \
                 FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, line_index",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

            for row in rows {
                grouped.entry(row.order_id).or_default().push(LineItem {
                    product_id: row.product_id,
                    product_name: row.product_name,
                    quantity: row.quantity,
                    unit_price: row.unit_price,
                });
            }
        }

        headers
            .into_iter()
            .map(|header| {
                let status = OrderStatus::parse(&header.status).ok_or_else(|| {
                    StorageError::Corrupt(format!("unknown order status: {}", header.status))
                })?;
                Ok(Order {
                    id: header.id,
                    account_id: header.account_id,
                    placed_at: header.placed_at,
                    status,
                    total_amount: header.total_amount,
                    items: grouped.remove(&header.id).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn save(&self, draft: OrderDraft) -> Result<Order, StorageError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO orders (id, account_id, placed_at, total_amount, status) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(draft.account_id)
        .bind(draft.placed_at)
        .bind(draft.total_amount)
        .bind(draft.status.as_str())
        .execute(&mut *tx)
        .await?;

        for (line_index, item) in draft.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_items \
                 (order_id, line_index, product_id, product_name, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(id)
            .bind(line_index as i32)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            order_id = %id,
            item_count = draft.items.len(),
            "Order graph committed"
        );

        Ok(draft.into_order(id))
    }

    async fn find_all(&self) -> Result<Vec<Order>, StorageError> {
        let headers: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, account_id, placed_at, total_amount, status FROM orders \
             ORDER BY placed_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        self.attach_items(headers).await
    }

    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<Order>, StorageError> {
        let headers: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, account_id, placed_at, total_amount, status FROM orders \
             WHERE account_id = $1 ORDER BY placed_at, id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        self.attach_items(headers).await
    }
}
