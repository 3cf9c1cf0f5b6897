//! # texmage_api
//!
//! HTTP API library for Texmage.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use texmage_core::generation::ImageProvider;
use texmage_core::store::CredentialStore;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{accounts, health, image};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User records and credit balances.
    pub store: Arc<dyn CredentialStore>,
    /// External text-to-image provider.
    pub provider: Arc<dyn ImageProvider>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no token required)
    let public = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_SIGNUP, post(accounts::signup_handler))
        .route(routes::POST_LOGIN, post(accounts::login_handler));

    // Protected routes (token header required)
    let protected = Router::new()
        .route(routes::GET_CREDITS, get(accounts::credits_handler))
        .route(
            routes::POST_IMAGE_GENERATE,
            post(image::generate_image_handler),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
