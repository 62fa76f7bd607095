//! Post domain: entity types, upload policy, validation, and the post service.
//!
//! The post service implements the two operations of the system:
//! - create: validate -> optional default-photo fill -> storage writes ->
//!   transactional insert
//! - list: newest-first retrieval with explicit ordering

mod error;
mod service;
mod types;
mod validation;

pub use error::PostError;
pub use service::{AssetFetcher, PostRepository, PostService};
pub use types::{
    Attachment, AttachmentKind, CreatePostInput, DefaultAsset, NewAttachment, NewPost, Post,
    PostPolicy, UploadPayload, UploadedFile,
};
pub use validation::{resolve_upload, validate};
