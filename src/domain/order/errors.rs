use uuid::Uuid;

use crate::store::StorageError;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl OrderError {
    /// Stable label for metrics, one per failure class.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::AccountNotFound(_) => "account_not_found",
            OrderError::ProductNotFound(_) => "product_not_found",
            OrderError::EmptyItems => "empty_items",
            OrderError::InvalidQuantity(_) => "invalid_quantity",
            OrderError::Storage(_) => "storage",
        }
    }
}
