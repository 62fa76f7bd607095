//! Shared configuration and error types for Photoboard.
//!
//! This crate provides common types used across all other crates:
//! - Layered configuration loading (files + environment)
//! - Application-wide error types with HTTP status mapping

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
