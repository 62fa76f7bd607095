//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Metadata about a stored object.
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    /// Storage key.
    pub storage_key: String,
    /// Object size in bytes.
    pub file_size: u64,
    /// Content type, when the provider records one.
    pub content_type: Option<String>,
}

/// Storage service for post attachments.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generate storage key for an attachment.
    ///
    /// Format: `{post_id}/{attachment_id}/{sanitized_filename}`
    #[must_use]
    pub fn generate_storage_key(post_id: Uuid, attachment_id: Uuid, file_name: &str) -> String {
        let sanitized = sanitize_filename(file_name);
        format!("{post_id}/{attachment_id}/{sanitized}")
    }

    /// Write object bytes under the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(&self, key: &str, data: Bytes) -> Result<(), StorageError> {
        let _meta = self
            .operator
            .write(key, data)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Read object bytes stored under the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be read.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let buffer = self.operator.read(key).await.map_err(StorageError::from)?;
        Ok(buffer.to_bytes())
    }

    /// Fetch metadata for a stored object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be accessed.
    pub async fn stat(&self, key: &str) -> Result<ObjectMetadata, StorageError> {
        let meta = self.operator.stat(key).await.map_err(StorageError::from)?;

        Ok(ObjectMetadata {
            storage_key: key.to_string(),
            file_size: meta.content_length(),
            content_type: meta.content_type().map(String::from),
        })
    }

    /// Delete an object from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if an object exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize filename for storage key.
///
/// Removes or replaces characters that could cause issues in storage paths.
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Sanitized filenames only contain safe characters.
    proptest! {
        #[test]
        fn prop_sanitized_filename_safe_chars(filename in ".*") {
            let sanitized = sanitize_filename(&filename);

            for c in sanitized.chars() {
                let is_safe = c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
                prop_assert!(is_safe, "Unexpected character in sanitized filename: {}", c);
            }
        }
    }

    // Storage keys always have the {post}/{attachment}/{filename} shape.
    proptest! {
        #[test]
        fn prop_storage_key_format(filename in "[a-zA-Z0-9_-]{1,50}\\.[a-z]{2,4}") {
            let post_id = Uuid::new_v4();
            let att_id = Uuid::new_v4();

            let key = StorageService::generate_storage_key(post_id, att_id, &filename);

            let parts: Vec<&str> = key.split('/').collect();
            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[0], post_id.to_string());
            prop_assert_eq!(parts[1], att_id.to_string());
            prop_assert_eq!(parts[2], filename);
        }
    }
}
