use rust_decimal::Decimal;
use uuid::Uuid;

use crate::store::StorageError;

// ============================================================================
// Product Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Product price cannot be negative: {0}")]
    NegativePrice(Decimal),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
