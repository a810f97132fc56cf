use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::store::AccountStore;

use super::errors::AccountError;
use super::model::{Account, AccountInput, AccountResponse};
use super::value_objects::{credential_digest, Email};

// ============================================================================
// Account Service - Account Shell
// ============================================================================

pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: AccountInput) -> Result<AccountResponse, AccountError> {
        validate(&input)?;

        let account = Account {
            id: Uuid::new_v4(),
            name: input.name,
            email: Email::new(input.email),
            password_hash: credential_digest(&input.password),
            created_at: Utc::now(),
        };

        self.store.insert(account.clone()).await?;

        tracing::info!(account_id = %account.id, "Account created");
        Ok(AccountResponse::from(&account))
    }

    pub async fn get(&self, id: Uuid) -> Result<AccountResponse, AccountError> {
        let account = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;
        Ok(AccountResponse::from(&account))
    }

    pub async fn list(&self) -> Result<Vec<AccountResponse>, AccountError> {
        let accounts = self.store.find_all().await?;
        Ok(accounts.iter().map(AccountResponse::from).collect())
    }

    /// Replaces name, email and credential. The identifier and creation
    /// timestamp never change.
    pub async fn update(&self, id: Uuid, input: AccountInput) -> Result<AccountResponse, AccountError> {
        validate(&input)?;

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let account = Account {
            id,
            name: input.name,
            email: Email::new(input.email),
            password_hash: credential_digest(&input.password),
            created_at: existing.created_at,
        };

        if !self.store.update(account.clone()).await? {
            return Err(AccountError::NotFound(id));
        }

        tracing::info!(account_id = %id, "Account updated");
        Ok(AccountResponse::from(&account))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        if !self.store.delete(id).await? {
            return Err(AccountError::NotFound(id));
        }
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}

fn validate(input: &AccountInput) -> Result<(), AccountError> {
    if input.name.trim().is_empty() {
        return Err(AccountError::EmptyName);
    }
    if !input.email.contains('@') {
        return Err(AccountError::InvalidEmail(input.email.clone()));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
