//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for creating, listing and downloading posts/attachments
//! - Multipart request parsing
//! - Response types
//! - The HTTP default-asset fetcher

pub mod assets;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use photoboard_core::post::{DefaultAsset, PostPolicy};
use photoboard_core::storage::StorageService;

use crate::assets::HttpAssetFetcher;

/// Upper bound on multipart request bodies (title plus a handful of images).
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Storage service for attachments.
    pub storage: Arc<StorageService>,
    /// Default asset fetcher.
    pub assets: Arc<HttpAssetFetcher>,
    /// Post creation policy.
    pub policy: PostPolicy,
    /// Remote default asset.
    pub default_asset: DefaultAsset,
    /// Base URL prefixed to attachment URLs (empty for relative URLs).
    pub public_base_url: String,
}

/// Creates the main application router.
///
/// `/api/*` carries the JSON API; everything else falls back to the static
/// demo page.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
