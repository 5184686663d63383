//! Image store port - binary file persistence behind opaque references.

use async_trait::async_trait;

/// Image store trait - abstraction over uploaded-file storage backends.
///
/// A reference returned by [`store`](ImageStore::store) is an opaque locator
/// string (served as a relative URL) and is globally unique across the life
/// of the store.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the file bytes durably under a fresh collision-free reference
    /// and return that reference.
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String, ImageStoreError>;

    /// Remove the file behind `reference`. Deleting a reference whose file is
    /// already gone is a success (idempotent delete).
    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError>;
}

/// Image store operation errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("image write failed: {0}")]
    Write(String),

    #[error("image delete failed: {0}")]
    Delete(String),
}
