//! PostgreSQL credential store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, StoreError};
use crate::models::user::{NewUser, UserRecord};

type UserRow = (String, String, String, String, i64);

const USER_COLUMNS: &str = "id::text, name, email, password_hash, credit_balance";

fn into_record((id, name, email, password_hash, credit_balance): UserRow) -> UserRecord {
    UserRecord {
        id,
        name,
        email,
        password_hash,
        credit_balance,
    }
}

/// Credential store backed by the `users` table.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            _ => StoreError::from(e),
        })?;
        Ok(into_record(row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_record))
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let Ok(id) = Uuid::parse_str(user_id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_record))
    }

    async fn consume_credit(&self, user_id: &str) -> Result<Option<i64>, StoreError> {
        let Ok(id) = Uuid::parse_str(user_id) else {
            return Ok(None);
        };
        // Single conditional UPDATE: concurrent callers serialize on the row lock,
        // and the loser sees credit_balance = 0 and matches nothing.
        let balance = sqlx::query_scalar::<_, i64>(
            "UPDATE users SET credit_balance = credit_balance - 1 \
             WHERE id = $1 AND credit_balance > 0 \
             RETURNING credit_balance",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(balance)
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
