//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
    /// Post creation policy and default asset.
    #[serde(default)]
    pub posts: PostsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL prefixed to attachment URLs in responses.
    /// Empty means relative URLs, which work behind any proxy.
    #[serde(default)]
    pub public_base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Object storage settings.
///
/// Flat representation of the storage provider; the server binary maps this
/// onto the core storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Provider kind: "local", "s3" or "azure_blob".
    #[serde(default = "default_storage_provider")]
    pub provider: String,
    /// Root directory (local provider).
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Endpoint URL (s3 provider).
    #[serde(default)]
    pub endpoint: String,
    /// Bucket or container name (s3 / azure_blob providers).
    #[serde(default)]
    pub bucket: String,
    /// Access key ID (s3) or account name (azure_blob).
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key (s3) or account key (azure_blob).
    #[serde(default)]
    pub secret_access_key: String,
    /// Region (s3 provider).
    #[serde(default)]
    pub region: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_storage_provider() -> String {
    "local".to_string()
}

fn default_storage_root() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

/// Post creation policy and default asset configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PostsConfig {
    /// Whether a post must carry at least one photo or image.
    #[serde(default = "default_true")]
    pub require_photo: bool,
    /// Whether the multi-image upload shape is accepted.
    #[serde(default = "default_true")]
    pub allow_multiple_images: bool,
    /// Whether a missing photo is filled from the remote default asset.
    #[serde(default)]
    pub auto_fill_default_photo: bool,
    /// Remote default asset, used only when `auto_fill_default_photo` is on.
    #[serde(default)]
    pub default_asset: DefaultAssetConfig,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            require_photo: true,
            allow_multiple_images: true,
            auto_fill_default_photo: false,
            default_asset: DefaultAssetConfig::default(),
        }
    }
}

/// Remote default asset configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultAssetConfig {
    /// URL the default image is fetched from.
    #[serde(default = "default_asset_url")]
    pub url: String,
    /// Filename recorded for the fetched attachment.
    #[serde(default = "default_asset_file_name")]
    pub file_name: String,
    /// MIME type recorded for the fetched attachment.
    #[serde(default = "default_asset_mime_type")]
    pub mime_type: String,
}

impl Default for DefaultAssetConfig {
    fn default() -> Self {
        Self {
            url: default_asset_url(),
            file_name: default_asset_file_name(),
            mime_type: default_asset_mime_type(),
        }
    }
}

fn default_asset_url() -> String {
    "https://appacademy-open-assets.s3.us-west-1.amazonaws.com/fullstack/full-stack-project/assets/bench_placeholder.png".to_string()
}

fn default_asset_file_name() -> String {
    "default.jpg".to_string()
}

fn default_asset_mime_type() -> String {
    "image/jpeg".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PHOTOBOARD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
