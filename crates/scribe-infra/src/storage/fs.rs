//! Filesystem-backed image store.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use scribe_core::ports::{ImageStore, ImageStoreError};

/// References are relative URLs under this prefix, matching the route the
/// API server mounts for static image serving.
const REFERENCE_PREFIX: &str = "/images/";

/// Strips any directory part from a client-supplied file name.
fn sanitized_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

/// Image store writing uploads to a local directory.
///
/// Stored files are named `{uuid}_{original_name}`, so references never
/// collide even when the same file is uploaded twice.
pub struct FsImageStore {
    upload_dir: PathBuf,
}

impl FsImageStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String, ImageStoreError> {
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitized_file_name(original_name));
        let path = self.upload_dir.join(&stored_name);

        fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| ImageStoreError::Write(e.to_string()))?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| ImageStoreError::Write(e.to_string()))?;

        tracing::debug!(file = %stored_name, size = bytes.len(), "Stored image");
        Ok(format!("{REFERENCE_PREFIX}{stored_name}"))
    }

    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError> {
        let file_name = reference.strip_prefix(REFERENCE_PREFIX).unwrap_or(reference);

        // Refuse anything that could point outside the upload directory.
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            return Err(ImageStoreError::Delete(format!(
                "invalid reference: {reference}"
            )));
        }

        match fs::remove_file(self.upload_dir.join(file_name)).await {
            Ok(()) => Ok(()),
            // Deleting a file that is already gone is a success.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ImageStoreError::Delete(e.to_string())),
        }
    }
}
