//! Post creation and listing routes.

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use photoboard_core::post::{
    CreatePostInput, Post, PostError, UploadedFile, resolve_upload,
};

use crate::AppState;
use crate::routes::{error_response, post_service, to_app_error};

/// Creates the post routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/posts", post(create_post).get(list_posts))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Raw multipart fields of a create request.
#[derive(Debug, Default)]
struct PostForm {
    title: String,
    photo: Option<UploadedFile>,
    images: Vec<UploadedFile>,
}

/// Response for a post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Post ID.
    pub id: Uuid,
    /// Post title.
    pub title: String,
    /// Resolved URL of the single photo attachment, when present.
    pub photo_url: Option<String>,
    /// Resolved URLs of the gallery images, in upload order.
    pub image_urls: Vec<String>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

impl PostResponse {
    fn from_post(post: &Post, public_base_url: &str) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            photo_url: post
                .photo
                .as_ref()
                .map(|a| attachment_url(public_base_url, a.id)),
            image_urls: post
                .images
                .iter()
                .map(|a| attachment_url(public_base_url, a.id))
                .collect(),
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

/// Resolve the servable URL of an attachment.
fn attachment_url(public_base_url: &str, id: Uuid) -> String {
    format!("{}/api/attachments/{id}", public_base_url.trim_end_matches('/'))
}

// ============================================================================
// Multipart Parsing
// ============================================================================

/// Read the multipart form into its raw fields.
///
/// Accepts `title`, `photo` and `images[]` (bare `images` also works);
/// unknown fields are ignored. Empty file parts, as submitted by browsers
/// when no file was selected, count as absent.
async fn read_post_form(multipart: &mut Multipart) -> Result<PostForm, String> {
    let mut form = PostForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field.text().await.map_err(|e| e.to_string())?,
            "photo" => {
                if let Some(file) = read_file_field(field).await? {
                    form.photo = Some(file);
                }
            }
            "images" | "images[]" => {
                if let Some(file) = read_file_field(field).await? {
                    form.images.push(file);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Buffer a single file field; `None` for an empty part.
async fn read_file_field(field: Field<'_>) -> Result<Option<UploadedFile>, String> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(|e| e.to_string())?;

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile {
        file_name,
        content_type,
        bytes,
    }))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/posts`
/// Create a post from a multipart form.
async fn create_post(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_post_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            error!(error = %e, "Failed to read multipart form");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "malformed_multipart",
                    "message": "Could not read the multipart form"
                })),
            )
                .into_response();
        }
    };

    let upload = match resolve_upload(form.photo, form.images) {
        Ok(upload) => upload,
        // An ambiguous upload shape is reported like any other validation
        // failure.
        Err(message) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(vec![message])).into_response();
        }
    };

    let service = post_service(&state);
    match service
        .create(CreatePostInput {
            title: form.title,
            upload,
        })
        .await
    {
        Ok(created) => {
            info!(post_id = %created.id, title = %created.title, "Post created");
            (
                StatusCode::OK,
                Json(PostResponse::from_post(&created, &state.public_base_url)),
            )
                .into_response()
        }
        Err(PostError::Validation(messages)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(messages)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create post");
            error_response(&to_app_error(e))
        }
    }
}

/// GET `/posts`
/// List all posts, newest first.
async fn list_posts(State(state): State<AppState>) -> Response {
    let service = post_service(&state);

    match service.list().await {
        Ok(posts) => {
            let items: Vec<PostResponse> = posts
                .iter()
                .map(|p| PostResponse::from_post(p, &state.public_base_url))
                .collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list posts");
            error_response(&to_app_error(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use photoboard_core::post::{Attachment, AttachmentKind};

    fn attachment(id: Uuid, post_id: Uuid, kind: AttachmentKind, position: i32) -> Attachment {
        Attachment {
            id,
            post_id,
            kind,
            position,
            file_name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            file_size: 3,
            storage_key: format!("{post_id}/{id}/a.png"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attachment_url_relative_and_absolute() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(attachment_url("", id), format!("/api/attachments/{id}"));
        assert_eq!(
            attachment_url("https://photos.example.com/", id),
            format!("https://photos.example.com/api/attachments/{id}")
        );
    }

    #[test]
    fn test_post_response_serialization() {
        let post_id = Uuid::new_v4();
        let photo_id = Uuid::new_v4();
        let now = Utc::now();
        let post = Post {
            id: post_id,
            title: "Sunset".to_string(),
            photo: Some(attachment(photo_id, post_id, AttachmentKind::Photo, 0)),
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(PostResponse::from_post(&post, "")).unwrap();
        assert_eq!(json["title"], "Sunset");
        assert_eq!(json["photoUrl"], format!("/api/attachments/{photo_id}"));
        assert_eq!(json["imageUrls"], serde_json::json!([]));
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_post_response_without_photo() {
        let post_id = Uuid::new_v4();
        let now = Utc::now();
        let post = Post {
            id: post_id,
            title: "Trip".to_string(),
            photo: None,
            images: vec![
                attachment(Uuid::new_v4(), post_id, AttachmentKind::Image, 0),
                attachment(Uuid::new_v4(), post_id, AttachmentKind::Image, 1),
            ],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(PostResponse::from_post(&post, "")).unwrap();
        assert_eq!(json["photoUrl"], serde_json::Value::Null);
        assert_eq!(json["imageUrls"].as_array().unwrap().len(), 2);
    }
}
