use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::Email;

// ============================================================================
// Account Entity
// ============================================================================

/// A buyer account. The identifier is unique and immutable once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for create and update. Carries the raw credential;
/// it is digested before anything is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// External representation. Deliberately omits the credential digest.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.as_str().to_string(),
        }
    }
}
