//! Account service: registration, login and balance lookup.

use texmage_core::auth::jwt::issue_token;
use texmage_core::auth::password::{hash_password_with_cost, verify_password};
use texmage_core::models::user::NewUser;
use texmage_core::store::CredentialStore;
use texmage_core::validation::{LoginInput, SignupInput};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, CreditsResponse};

/// Register a new account and issue its first token.
///
/// The email must not exist yet (exact match). Only the bcrypt hash of the
/// password is stored.
pub async fn register(
    store: &dyn CredentialStore,
    input: SignupInput,
    jwt_secret: &[u8],
    bcrypt_cost: u32,
) -> AppResult<AuthResponse> {
    if store.find_by_email(&input.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_secret(input.password, bcrypt_cost).await?;
    let user = store
        .create_user(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "user registered");

    let token = issue_token(&user.id, &user.email, jwt_secret)?;
    Ok(AuthResponse {
        success: true,
        message: "User added successfully.".into(),
        token,
        user: user.public(),
    })
}

/// Authenticate with email + password.
///
/// Unknown email and wrong password fail identically.
pub async fn login(
    store: &dyn CredentialStore,
    input: LoginInput,
    jwt_secret: &[u8],
) -> AppResult<AuthResponse> {
    let Some(user) = store.find_by_email(&input.email).await? else {
        return Err(AppError::InvalidCredentials);
    };

    if !check_secret(input.password, user.password_hash.clone()).await? {
        return Err(AppError::InvalidCredentials);
    }
    info!(user_id = %user.id, "user logged in");

    let token = issue_token(&user.id, &user.email, jwt_secret)?;
    Ok(AuthResponse {
        success: true,
        message: "Login Successful".into(),
        token,
        user: user.public(),
    })
}

/// Current balance and display name for a user.
pub async fn credits(store: &dyn CredentialStore, user_id: &str) -> AppResult<CreditsResponse> {
    let user = store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
    Ok(CreditsResponse {
        success: true,
        credits: user.credit_balance,
        name: user.name,
    })
}

// bcrypt is CPU-bound; keep it off the async workers.
async fn hash_secret(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password_with_cost(&password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hash task: {e}")))?
        .map_err(AppError::from)
}

async fn check_secret(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task: {e}")))?
        .map_err(AppError::from)
}
