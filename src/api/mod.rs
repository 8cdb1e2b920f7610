pub mod auth;
pub mod blogs;
pub mod common;
pub mod health;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::middleware::require_auth;
use crate::state::AppState;

/// Public endpoints: service probes, auth and blog reads.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/api/v1/register", post(auth::register))
        .route("/api/v1/login", post(auth::login))
        .route("/api/v1/all_blogs", get(blogs::list_blogs))
        .route("/api/v1/blog/:blog_id", get(blogs::get_blog))
}

/// Blog writes; every route requires a Bearer token.
pub fn protected_router(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/create_blog", post(blogs::create_blog))
        .route("/api/v1/update_blog/:blog_id", put(blogs::update_blog))
        .route("/api/v1/delete_blog/:blog_id", delete(blogs::delete_blog))
        .layer(from_fn_with_state(app_state, require_auth))
}

/// Creates the API router with all REST endpoints
pub fn create_api_router(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(public_router())
        .merge(protected_router(app_state))
}
