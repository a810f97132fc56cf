// ============================================================================
// Storage Layer - Abstract Store Capabilities
// ============================================================================
//
// The domain services consume these traits and never see a concrete
// database. Two implementations exist:
//
// - `postgres`: the durable one, backed by sqlx. An order graph commits in
//   a single transaction (header + line items, all or nothing).
// - `memory`: Mutex-guarded vectors with insertion order, for tests and for
//   running the binary without a database.
//
// StorageFailure propagation policy: errors surface to the caller unchanged
// and are never retried here. Retry is the caller's decision.
//
// ============================================================================

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::order::{Order, OrderDraft};
use crate::domain::product::Product;

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAccountStore, MemoryOrderStore, MemoryProductStore};
pub use postgres::{PgAccountStore, PgOrderStore, PgProductStore};

/// The persistence layer could not complete an operation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage failure: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Account records, keyed by their immutable identifier.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: Account) -> Result<(), StorageError>;

    /// Replace the stored record. Returns false when no such account exists.
    async fn update(&self, account: Account) -> Result<bool, StorageError>;

    /// Returns false when no such account exists.
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StorageError>;

    async fn find_all(&self) -> Result<Vec<Account>, StorageError>;
}

/// Catalog records. `find_by_id` reads the CURRENT price; callers that need
/// a durable price must copy it out immediately (see order assembly).
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: Product) -> Result<(), StorageError>;

    /// Replace the stored record. Returns false when no such product exists.
    async fn update(&self, product: Product) -> Result<bool, StorageError>;

    /// Returns false when no such product exists.
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError>;

    async fn find_all(&self) -> Result<Vec<Product>, StorageError>;

    /// Case-insensitive substring match on the product name.
    async fn search_by_name(&self, keyword: &str) -> Result<Vec<Product>, StorageError>;

    /// Inclusive price range filter.
    async fn find_by_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, StorageError>;
}

/// Order graphs. `save` assigns the identifier and commits the header and
/// every line item atomically; a failed save persists nothing.
///
/// Both finders enumerate in a stable order: for a fixed dataset, repeated
/// calls return the same sequence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn save(&self, draft: OrderDraft) -> Result<Order, StorageError>;

    async fn find_all(&self) -> Result<Vec<Order>, StorageError>;

    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<Order>, StorageError>;
}
