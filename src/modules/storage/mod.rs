//! Local filesystem storage for uploaded assets.
//!
//! Assets are written under a configured uploads directory with a generated
//! unique name (UUID plus the original extension) so concurrent uploads can
//! never collide. The database row keeps the generated name; the original
//! filename survives only as metadata for the Content-Disposition header.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

/// Metadata for an asset that has been written to disk
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// Generated unique name on disk, kept in `files.file_path`
    pub stored_name: String,
    /// Public-facing path (`/uploads/<stored_name>`)
    pub download_url: String,
    pub file_size: i64,
}

pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    /// Open the uploads directory, creating it if missing.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.uploads_dir)
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create uploads directory {}: {}",
                    config.uploads_dir.display(),
                    e
                ))
            })?;

        Ok(Self {
            root: config.uploads_dir.clone(),
        })
    }

    /// Write asset bytes under a generated unique name.
    pub async fn store(&self, data: Vec<u8>, original_name: &str) -> Result<StoredAsset> {
        let stored_name = unique_name(original_name);
        let path = self.root.join(&stored_name);
        let file_size = data.len() as i64;

        fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write asset: {}", e)))?;

        debug!("Asset written: {}", path.display());

        Ok(StoredAsset {
            download_url: format!("/uploads/{}", stored_name),
            stored_name,
            file_size,
        })
    }

    /// Open a stored asset for streaming. Returns `None` when the backing
    /// file is missing from disk (the row may still exist).
    pub async fn open(&self, stored_name: &str) -> Result<Option<fs::File>> {
        let path = self.root.join(basename(stored_name));
        match fs::File::open(&path).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to open asset {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Remove a stored asset. Missing files are not an error; the caller
    /// already decided the row should go.
    pub async fn delete(&self, stored_name: &str) -> Result<()> {
        let path = self.root.join(basename(stored_name));
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to delete asset {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Compensating deletion after a failed database write: logged, never
    /// retried, never surfaced to the client.
    pub async fn delete_best_effort(&self, stored_name: &str) {
        if let Err(e) = self.delete(stored_name).await {
            warn!("Failed to clean up orphaned asset {}: {}", stored_name, e);
        }
    }
}

/// Generate a collision-free disk name preserving the original extension.
fn unique_name(original_name: &str) -> String {
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}.{}", Uuid::new_v4(), ext),
        _ => Uuid::new_v4().to_string(),
    }
}

/// Strip any path components a stored name might carry; only the basename is
/// ever resolved against the uploads directory.
fn basename(stored_name: &str) -> &str {
    Path::new(stored_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(stored_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageConfig;

    fn temp_storage_config() -> StorageConfig {
        StorageConfig {
            uploads_dir: std::env::temp_dir().join(format!("filemarket-test-{}", Uuid::new_v4())),
        }
    }

    #[test]
    fn unique_name_keeps_extension() {
        let name = unique_name("resume-template.docx");
        assert!(name.ends_with(".docx"));
        assert_ne!(unique_name("a.pdf"), unique_name("a.pdf"));
    }

    #[test]
    fn unique_name_without_extension() {
        let name = unique_name("README");
        assert!(!name.contains('.'));
    }

    #[test]
    fn basename_strips_traversal() {
        assert_eq!(basename("../../etc/passwd"), "passwd");
        assert_eq!(basename("file.pdf"), "file.pdf");
    }

    #[tokio::test]
    async fn store_open_delete_round_trip() {
        let config = temp_storage_config();
        let storage = DiskStorage::new(&config).await.unwrap();

        let asset = storage
            .store(b"hello".to_vec(), "greeting.txt")
            .await
            .unwrap();
        assert_eq!(asset.file_size, 5);
        assert!(asset.download_url.starts_with("/uploads/"));

        assert!(storage.open(&asset.stored_name).await.unwrap().is_some());

        storage.delete(&asset.stored_name).await.unwrap();
        assert!(storage.open(&asset.stored_name).await.unwrap().is_none());

        // deleting again is not an error
        storage.delete(&asset.stored_name).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&config.uploads_dir).await;
    }
}
