//! Storage service for attachments using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! Attachment bytes are written and read through the unified `Operator` API;
//! download URLs are served by the HTTP layer, so no presigning is involved
//! and the listing contract is identical across providers.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{ObjectMetadata, StorageService};
