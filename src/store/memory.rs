use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::order::{Order, OrderDraft};
use crate::domain::product::Product;

use super::{AccountStore, OrderStore, ProductStore, StorageError};

// ============================================================================
// In-Memory Stores
// ============================================================================
//
// Insertion-ordered vectors behind std Mutexes. These back the unit tests
// and let the binary run without a configured database. Enumeration order
// is insertion order, which satisfies the stable-order guarantee.
//
// ============================================================================

#[derive(Default)]
pub struct MemoryAccountStore {
    rows: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<(), StorageError> {
        self.rows.lock().unwrap().push(account);
        Ok(())
    }

    async fn update(&self, account: Account) -> Result<bool, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|row| row.id == account.id) {
            Some(slot) => {
                *slot = account;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() != before)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StorageError> {
        Ok(self.rows.lock().unwrap().iter().find(|row| row.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Account>, StorageError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryProductStore {
    rows: Mutex<Vec<Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn insert(&self, product: Product) -> Result<(), StorageError> {
        self.rows.lock().unwrap().push(product);
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<bool, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|row| row.id == product.id) {
            Some(slot) => {
                *slot = product;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() != before)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        Ok(self.rows.lock().unwrap().iter().find(|row| row.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<Product>, StorageError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_by_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, StorageError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.unit_price >= min && row.unit_price <= max)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    rows: Mutex<Vec<Order>>,
    save_calls: AtomicUsize,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of save attempts observed. Tests use this to assert that
    /// aborted aggregations never reached the store.
    pub fn save_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn save(&self, draft: OrderDraft) -> Result<Order, StorageError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let order = draft.into_order(Uuid::new_v4());
        self.rows.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn find_all(&self) -> Result<Vec<Order>, StorageError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<Order>, StorageError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.account_id == account_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
