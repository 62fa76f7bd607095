//! Photoboard API Server
//!
//! Main entry point for the Photoboard backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photoboard_api::assets::HttpAssetFetcher;
use photoboard_api::{AppState, create_router};
use photoboard_core::post::{DefaultAsset, PostPolicy};
use photoboard_core::storage::{StorageConfig, StorageProvider, StorageService};
use photoboard_db::connect;
use photoboard_shared::AppConfig;
use photoboard_shared::config::StorageSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create storage service
    let provider = storage_provider(&config.storage)?;
    let storage_config =
        StorageConfig::new(provider).with_max_file_size(config.storage.max_file_size);
    let storage = StorageService::from_config(storage_config)?;
    info!(provider = storage.provider_name(), "Storage configured");

    // Post policy and default asset
    let policy = PostPolicy {
        require_photo: config.posts.require_photo,
        allow_multiple_images: config.posts.allow_multiple_images,
        auto_fill_default_photo: config.posts.auto_fill_default_photo,
    };
    let default_asset = DefaultAsset {
        url: config.posts.default_asset.url.clone(),
        file_name: config.posts.default_asset.file_name.clone(),
        mime_type: config.posts.default_asset.mime_type.clone(),
    };
    info!(
        require_photo = policy.require_photo,
        allow_multiple_images = policy.allow_multiple_images,
        auto_fill_default_photo = policy.auto_fill_default_photo,
        "Post policy configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        storage: Arc::new(storage),
        assets: Arc::new(HttpAssetFetcher::new()),
        policy,
        default_asset,
        public_base_url: config.server.public_base_url.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Map the flat storage settings onto a provider configuration.
fn storage_provider(settings: &StorageSettings) -> anyhow::Result<StorageProvider> {
    match settings.provider.as_str() {
        "local" => Ok(StorageProvider::local_fs(&settings.root)),
        "s3" => Ok(StorageProvider::s3(
            &settings.endpoint,
            &settings.bucket,
            &settings.access_key_id,
            &settings.secret_access_key,
            &settings.region,
        )),
        // access_key_id doubles as the account name, bucket as the container.
        "azure_blob" => Ok(StorageProvider::azure_blob(
            &settings.access_key_id,
            &settings.secret_access_key,
            &settings.bucket,
        )),
        other => anyhow::bail!("unknown storage provider: {other}"),
    }
}
