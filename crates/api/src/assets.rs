//! HTTP fetcher for the remote default asset.

use bytes::Bytes;

use photoboard_core::post::{AssetFetcher, PostError};

/// Default asset fetcher backed by reqwest.
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Create a new fetcher with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpAssetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, PostError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PostError::default_asset_fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PostError::default_asset_fetch(format!(
                "unexpected status {} fetching {url}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| PostError::default_asset_fetch(e.to_string()))
    }
}
