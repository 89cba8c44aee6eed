use std::path::PathBuf;

use reqwest::Client as HttpClient;

use crate::{
    error::{PipelineError, PipelineResult},
    services::BlobStorage,
};

/// Local-directory shard store, mainly for dry runs and offline inspection.
///
/// Shard names may contain `/` separators; intermediate directories are
/// created as needed.
#[derive(Debug, Clone)]
pub struct FsBlobStorage {
    root: PathBuf,
}

impl FsBlobStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl BlobStorage for FsBlobStorage {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> PipelineResult<()> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let size = bytes.len();
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            blob = %name,
            bytes = size,
            path = %path.display(),
            "Shard written to local store"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "fs"
    }
}

/// HTTP object-store client; shards land at `{base_url}/{name}` via PUT.
#[derive(Debug, Clone)]
pub struct HttpBlobStorage {
    http_client: HttpClient,
    base_url: String,
}

impl HttpBlobStorage {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl BlobStorage for HttpBlobStorage {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> PipelineResult<()> {
        let url = format!("{}/{}", self.base_url, name);
        let size = bytes.len();

        let response = self.http_client.put(&url).body(bytes).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::StorageUnavailable(format!(
                "PUT {} returned status {}: {}",
                url, status, body
            )));
        }

        tracing::info!(blob = %name, bytes = size, "Shard uploaded");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
