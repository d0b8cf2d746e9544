use std::collections::HashMap;
use std::env;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub base_url: String,
    pub service_key: String,
    pub bucket: String,
}

impl StorageConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("STORAGE_URL")
            .map_err(|_| AppError::Config("STORAGE_URL is not set".to_string()))?;
        let service_key = env::var("STORAGE_SERVICE_KEY")
            .map_err(|_| AppError::Config("STORAGE_SERVICE_KEY is not set".to_string()))?;
        let bucket = env::var("STORAGE_BUCKET").unwrap_or_else(|_| "course-files".to_string());

        Ok(Self {
            base_url,
            service_key,
            bucket,
        })
    }
}

/// Object store keyed by path. Uploads upsert, so re-uploading to the same
/// path overwrites the previous blob.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), AppError>;
    async fn remove(&self, path: &str) -> Result<(), AppError>;
    fn public_url(&self, path: &str) -> String;
}

pub struct HttpStorageClient {
    client: Client,
    config: StorageConfig,
}

impl HttpStorageClient {
    pub fn new(config: StorageConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.bucket,
            path
        )
    }
}

#[async_trait]
impl StorageClient for HttpStorageClient {
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.object_url(path))
            .header("Authorization", format!("Bearer {}", self.config.service_key))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Upload rejected {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.object_url(path))
            .header("Authorization", format!("Bearer {}", self.config.service_key))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Delete request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Delete rejected {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.bucket,
            path
        )
    }
}

/// In-memory store used by tests and local runs without a storage backend.
#[derive(Default)]
pub struct MemoryStorageClient {
    blobs: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryStorageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(path).map(|(_, b)| b.clone())
    }
}

#[async_trait]
impl StorageClient for MemoryStorageClient {
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), AppError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), (content_type.to_string(), bytes.to_vec()));
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{}", path)
    }
}
