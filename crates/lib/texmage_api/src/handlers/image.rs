//! Image generation request handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{GenerateImageRequest, GenerateImageResponse};
use crate::services::generation;

/// `POST /image/generate-image`: spend one credit on a generated image.
pub async fn generate_image_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> AppResult<Json<GenerateImageResponse>> {
    let Json(body) = payload.map_err(|_| AppError::MissingInput)?;
    let resp = generation::generate_image(
        state.store.as_ref(),
        state.provider.as_ref(),
        user.user_id(),
        body.prompt.as_deref(),
    )
    .await?;
    Ok(Json(resp))
}
