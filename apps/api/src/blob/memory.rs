use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use crate::blob::BlobStore;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub body: Bytes,
    pub content_type: String,
}

/// Keeps uploads in memory. URLs use the `memory://` scheme.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, AppError> {
        let blob = StoredBlob {
            body,
            content_type: content_type.to_string(),
        };
        debug!(
            "Holding {} bytes of {} under {key}",
            blob.body.len(),
            blob.content_type
        );
        self.blobs.write().await.insert(key.to_string(), blob);
        Ok(format!("memory://{key}"))
    }
}
