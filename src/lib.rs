//! Homepage backend: REST API and editor core for a single-owner profile
//! homepage.
//!
//! Visitors get the rendered page and the public config/image reads; the
//! owner authenticates with the shared password, drives an [`editor`] session
//! over the in-memory document, and persists the result wholesale through the
//! token-gated endpoints.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod editor;
pub mod errors;
pub mod models;
pub mod render;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Reads are public; the mutating handlers verify the bearer token
    // against the store before touching anything.
    let api_routes = Router::new()
        .route("/auth", post(api::authenticate))
        .route("/config", get(api::get_config).post(api::save_config))
        .route("/upload", post(api::upload_image))
        .route("/images/{filename}", get(api::get_image));

    Router::new()
        .route("/", get(api::profile_page))
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
