//! Credential store: persistence of user records and credit balances.
//!
//! [`CredentialStore`] is the seam between the account/generation services and
//! the backing database. [`postgres::PgCredentialStore`] is the production
//! backend; [`memory::InMemoryCredentialStore`] backs tests and local demos.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::user::{NewUser, UserRecord};

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Persistence operations on user records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user with the default credit balance.
    ///
    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken,
    /// including when a concurrent insert wins the race.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Exact, case-sensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Lookup by id. Unknown or malformed ids yield `None`.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Atomically decrement the balance by one if it is positive.
    ///
    /// Returns the new balance, or `None` when the user is unknown or already
    /// at zero. Never drives a balance negative.
    async fn consume_credit(&self, user_id: &str) -> Result<Option<i64>, StoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> bool;
}
