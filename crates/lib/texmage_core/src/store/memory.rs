//! In-memory credential store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{CredentialStore, StoreError};
use crate::models::user::{DEFAULT_CREDIT_BALANCE, NewUser, UserRecord};

/// Process-local credential store. Users are keyed by id with a separate
/// email index that enforces uniqueness.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: DashMap<String, UserRecord>,
    emails: DashMap<String, String>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a user's balance. Returns `false` for unknown ids.
    pub fn set_balance(&self, user_id: &str, balance: i64) -> bool {
        match self.users.get_mut(user_id) {
            Some(mut user) => {
                user.credit_balance = balance;
                true
            }
            None => false,
        }
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let record = UserRecord {
                    id: Uuid::new_v4().to_string(),
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    credit_balance: DEFAULT_CREDIT_BALANCE,
                };
                self.users.insert(record.id.clone(), record.clone());
                slot.insert(record.id.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let Some(id) = self.emails.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn consume_credit(&self, user_id: &str) -> Result<Option<i64>, StoreError> {
        // get_mut holds the shard write lock for the check and the decrement.
        let Some(mut user) = self.users.get_mut(user_id) else {
            return Ok(None);
        };
        if user.credit_balance <= 0 {
            return Ok(None);
        }
        user.credit_balance -= 1;
        Ok(Some(user.credit_balance))
    }

    async fn ping(&self) -> bool {
        true
    }
}
