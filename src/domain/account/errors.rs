use uuid::Uuid;

use crate::store::StorageError;

// ============================================================================
// Account Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Account name cannot be empty")]
    EmptyName,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
