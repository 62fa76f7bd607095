//! Attachment download route.
//!
//! Attachments are served through the API rather than via presigned URLs,
//! so resolved URLs are identical across storage providers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use photoboard_core::post::PostError;

use crate::AppState;
use crate::routes::{error_response, post_service, to_app_error};

/// Creates the attachment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/attachments/{id}", get(download_attachment))
}

/// GET `/attachments/{id}`
/// Stream the stored bytes of an attachment with its recorded MIME type.
async fn download_attachment(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let service = post_service(&state);

    let attachment = match service.get_attachment(id).await {
        Ok(attachment) => attachment,
        Err(PostError::AttachmentNotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "Attachment not found"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, attachment_id = %id, "Failed to look up attachment");
            return error_response(&to_app_error(e));
        }
    };

    match service.read_attachment_bytes(&attachment).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, attachment.mime_type.clone())],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, attachment_id = %id, "Failed to read attachment bytes");
            error_response(&to_app_error(e))
        }
    }
}
