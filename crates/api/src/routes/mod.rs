//! API route definitions.

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

use photoboard_core::post::{PostError, PostService};
use photoboard_db::PostRepository;
use photoboard_shared::AppError;

use crate::AppState;
use crate::assets::HttpAssetFetcher;

pub mod attachments;
pub mod health;
pub mod posts;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(posts::routes())
        .merge(attachments::routes())
}

/// Builds a per-request post service from the application state.
pub(crate) fn post_service(state: &AppState) -> PostService<PostRepository, HttpAssetFetcher> {
    let repo = PostRepository::new((*state.db).clone());
    PostService::new(
        state.storage.clone(),
        Arc::new(repo),
        state.assets.clone(),
        state.policy,
        state.default_asset.clone(),
    )
}

/// Maps a non-validation post error onto the application error taxonomy.
pub(crate) fn to_app_error(err: PostError) -> AppError {
    match err {
        PostError::Validation(messages) => AppError::Validation(messages.join(", ")),
        PostError::AttachmentNotFound(id) => AppError::NotFound(format!("attachment {id}")),
        PostError::DefaultAssetFetch(msg) => AppError::ExternalService(msg),
        PostError::Storage(e) => AppError::Storage(e.to_string()),
        PostError::Repository(msg) => AppError::Database(msg),
    }
}

/// Renders an application error as a JSON response.
///
/// Server-side details stay in the logs; clients get the error code.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match err {
        AppError::NotFound(_) | AppError::Validation(_) => err.to_string(),
        _ => "An error occurred".to_string(),
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}
