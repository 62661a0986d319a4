use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::{validate_key, ObjectStore, StorageError};

/// Filesystem-backed bucket: objects are files under `{media_dir}/{bucket}`.
#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
    max_object_bytes: usize,
}

impl LocalObjectStore {
    /// Create the bucket directory if missing.
    pub async fn new<P: Into<PathBuf>>(
        media_dir: P,
        bucket: &str,
        public_base_url: &str,
        max_object_bytes: usize,
    ) -> Result<Self, StorageError> {
        let media_dir = media_dir.into();
        let root = media_dir.join(bucket);
        fs::create_dir_all(&root).await.map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(Self {
            root,
            bucket: bucket.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_object_bytes,
        })
    }

    pub fn root(&self) -> &Path { &self.root }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn bucket(&self) -> &str { &self.bucket }

    fn max_object_bytes(&self) -> usize { self.max_object_bytes }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::InvalidKey(key.to_string()))?;
        fs::create_dir_all(parent).await.map_err(|e| StorageError::Io(e.to_string()))?;
        // 先写临时文件再 rename，避免读到半个文件
        let tmp = parent.join(format!(
            ".{}.tmp.{}",
            path.file_name().and_then(|s| s.to_str()).unwrap_or("object"),
            std::process::id()
        ));
        fs::write(&tmp, bytes).await.map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&tmp, &path).await.map_err(|e| StorageError::Io(e.to_string()))?;
        debug!(bucket = %self.bucket, %key, size = bytes.len(), "object stored");
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            let path = self.object_path(key)?;
            match fs::remove_file(&path).await {
                Ok(()) => debug!(bucket = %self.bucket, %key, "object removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(bucket = %self.bucket, %key, "object already gone")
                }
                Err(e) => return Err(StorageError::Io(e.to_string())),
            }
        }
        Ok(())
    }
}
