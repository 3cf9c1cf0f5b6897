//! Account request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use texmage_core::validation::{validate_login, validate_signup};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{AuthResponse, CreditsResponse, LoginRequest, SignupRequest};
use crate::services::accounts;

/// `POST /signup`: validate, create the account and issue a token.
pub async fn signup_handler(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(body) = payload?;
    let input = validate_signup(
        body.name.as_deref(),
        body.email.as_deref(),
        body.password.as_deref(),
    )?;
    let resp = accounts::register(
        state.store.as_ref(),
        input,
        state.config.jwt_secret.as_bytes(),
        state.config.bcrypt_cost,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(body) = payload?;
    let input = validate_login(body.email.as_deref(), body.password.as_deref())?;
    let resp = accounts::login(
        state.store.as_ref(),
        input,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(Json(resp))
}

/// `GET /credits`: balance and display name of the token's user.
pub async fn credits_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<CreditsResponse>> {
    let resp = accounts::credits(state.store.as_ref(), user.user_id()).await?;
    Ok(Json(resp))
}
