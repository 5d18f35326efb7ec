//! Filesystem Blob Store
//!
//! Authoritative blob store keeping one file per key under a root directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};

// == Fs Blob Store ==
/// Directory-backed blob store.
///
/// Keys must already be validated; they are joined onto the root as
/// relative paths.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    /// Sequence for temporary upload file names
    upload_seq: AtomicU64,
}

impl FsBlobStore {
    // == Open ==
    /// Opens the store at `root`, creating the directory if it is missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        match fs::metadata(&root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(CacheError::InvalidConfig(format!(
                    "storage path {} is not a directory",
                    root.display()
                )));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %root.display(), "Storage directory does not exist; creating it");
                fs::create_dir_all(&root).await?;
            }
            Err(e) => return Err(e.into()),
        }

        info!(path = %root.display(), "Blob store opened");
        Ok(Self {
            root,
            upload_seq: AtomicU64::new(0),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Read ==
    /// Reads a whole blob. Returns None if no blob exists under `key`.
    pub async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.root.join(key);

        match fs::read(&path).await {
            Ok(data) => {
                debug!(key, size = data.len(), "Read blob from store");
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                // A key naming an intermediate directory is not a blob.
                if fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
                    return Ok(None);
                }
                Err(e.into())
            }
        }
    }

    // == Write ==
    /// Writes a blob, replacing any previous content.
    ///
    /// Data goes to a temporary sibling file first and is renamed into
    /// place, so readers never see a partial blob.
    pub async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let seq = self.upload_seq.fetch_add(1, Ordering::Relaxed);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = path.with_file_name(format!(".{}.{}.partial", file_name, seq));

        if let Err(e) = fs::write(&tmp_path, data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(key, size = data.len(), "Wrote blob to store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("blobs");

        let store = FsBlobStore::open(&root).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[tokio::test]
    async fn test_open_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let result = FsBlobStore::open(&file).await;
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        store.write("cards/7/avatar.png", b"image-bytes").await.unwrap();

        let data = store.read("cards/7/avatar.png").await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"image-bytes"[..]));
    }

    #[tokio::test]
    async fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        assert!(store.read("nope.png").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();
        store.write("cards/1.png", b"x").await.unwrap();

        assert!(store.read("cards").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_partials() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        store.write("a.bin", b"first").await.unwrap();
        store.write("a.bin", b"second").await.unwrap();

        assert_eq!(store.read("a.bin").await.unwrap().unwrap(), b"second");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }
}
