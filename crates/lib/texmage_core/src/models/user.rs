//! User records and their public projection.

use serde::{Deserialize, Serialize};

/// Credit granted to every new account.
pub const DEFAULT_CREDIT_BALANCE: i64 = 5;

/// A stored user, including the secret hash. Never serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub credit_balance: i64,
}

impl UserRecord {
    /// The client-safe view of this user.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Data needed to insert a user; the store assigns the id and starting balance.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public user projection returned by signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}
