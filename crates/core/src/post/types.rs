//! Post types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Attachment kind: the single cover photo or a gallery image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// The single photo attachment of a post.
    Photo,
    /// One of the ordered gallery images of a post.
    Image,
}

impl AttachmentKind {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Image => "image",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(Self::Photo),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// A single uploaded file, fully buffered at the request boundary.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as supplied by the client.
    pub file_name: String,
    /// MIME type as supplied by the client.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Bytes,
}

/// Upload shape of a create request, resolved once at the parsing boundary.
///
/// The single-photo and multi-image shapes are mutually exclusive per
/// request; `resolve_upload` rejects requests supplying both.
#[derive(Debug, Clone)]
pub enum UploadPayload {
    /// No file was supplied.
    None,
    /// A single `photo` file.
    Single(UploadedFile),
    /// One or more `images[]` files, in upload order.
    Multiple(Vec<UploadedFile>),
}

impl UploadPayload {
    /// Whether the payload carries no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// All files in the payload, in upload order.
    #[must_use]
    pub fn files(&self) -> Vec<&UploadedFile> {
        match self {
            Self::None => Vec::new(),
            Self::Single(file) => vec![file],
            Self::Multiple(files) => files.iter().collect(),
        }
    }
}

/// Post creation policy.
///
/// The source system vacillated between requiring exactly one photo,
/// allowing many images, and auto-attaching a remote default; this surface
/// makes each variant an explicit configuration choice.
#[derive(Debug, Clone, Copy)]
pub struct PostPolicy {
    /// A post must carry at least one photo or image.
    pub require_photo: bool,
    /// The multi-image upload shape is accepted.
    pub allow_multiple_images: bool,
    /// A missing photo is filled from the remote default asset.
    pub auto_fill_default_photo: bool,
}

impl Default for PostPolicy {
    fn default() -> Self {
        Self {
            require_photo: true,
            allow_multiple_images: true,
            auto_fill_default_photo: false,
        }
    }
}

/// The remote fallback image attached when no user-supplied image exists.
#[derive(Debug, Clone)]
pub struct DefaultAsset {
    /// URL the asset is fetched from.
    pub url: String,
    /// Filename recorded for the fetched attachment.
    pub file_name: String,
    /// MIME type recorded for the fetched attachment.
    pub mime_type: String,
}

/// Input for the create operation.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Post title.
    pub title: String,
    /// Resolved upload payload.
    pub upload: UploadPayload,
}

/// Attachment row to be persisted alongside a new post.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    /// Attachment ID.
    pub id: Uuid,
    /// Photo or gallery image.
    pub kind: AttachmentKind,
    /// Position within the gallery (0 for photos).
    pub position: i32,
    /// Original filename.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Object storage key the bytes were written under.
    pub storage_key: String,
}

/// Post to be persisted, with its attachments.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post ID.
    pub id: Uuid,
    /// Post title (already validated).
    pub title: String,
    /// Attachment rows, files already written to storage.
    pub attachments: Vec<NewAttachment>,
}

/// Attachment domain model.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning post.
    pub post_id: Uuid,
    /// Photo or gallery image.
    pub kind: AttachmentKind,
    /// Position within the gallery.
    pub position: i32,
    /// Original filename.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Object storage key.
    pub storage_key: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Post domain model.
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Post title.
    pub title: String,
    /// The single photo attachment, when present.
    pub photo: Option<Attachment>,
    /// Gallery images in position order.
    pub images: Vec<Attachment>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
