//! Blob store collaborator: avatars and resumes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;

pub mod memory;
pub mod s3;

pub use memory::InMemoryBlobStore;
pub use s3::S3BlobStore;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `body` under `key`, replacing any previous object, and returns a
    /// stable URL for it.
    async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, AppError>;
}

pub fn avatar_key(uid: &str) -> String {
    format!("avatars/{uid}")
}

pub fn resume_key(uid: &str, listing_id: uuid::Uuid, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("resumes/{uid}/{listing_id}/{safe}")
}
