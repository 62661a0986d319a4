//! Object storage for uploaded images.
//!
//! Objects live in a single bucket and are addressed by `{folder}/{file}` keys.
//! Each object has a stable public URL `{public_base_url}/{bucket}/{key}`, so a
//! key can always be recovered from a URL stored in the database.

pub mod local;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

pub use local::LocalObjectStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(String),
}

/// An image received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;
    fn max_object_bytes(&self) -> usize;
    fn public_url(&self, key: &str) -> String;
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
    /// Removing a missing object is not an error.
    async fn remove(&self, keys: &[String]) -> Result<(), StorageError>;
}

const KEY_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `{folder}/{unix_millis}-{random}.{ext}`
pub fn object_key(folder: &str, file_name: &str, content_type: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..10)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect();
    format!("{}/{}-{}.{}", folder.trim_matches('/'), millis, suffix, file_extension(file_name, content_type))
}

/// Extension from the client file name, else from the mime subtype.
pub fn file_extension(file_name: &str, content_type: &str) -> String {
    let from_name = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return ext;
    }
    match content_type.split_once('/').map(|(_, sub)| sub) {
        Some("jpeg") => "jpg".into(),
        Some("svg+xml") => "svg".into(),
        Some(sub) if !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()) => sub.to_string(),
        _ => "bin".into(),
    }
}

/// Last two path segments of a public URL (`{folder}/{file}`).
pub fn key_from_public_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let file = segments.next()?;
    let folder = segments.next()?;
    Some(format!("{folder}/{file}"))
}

/// Rejects anything that could escape the bucket directory.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    if key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Image content type, non-empty, within the store's size limit.
pub fn check_image(upload: &ImageUpload, max_bytes: usize) -> Result<(), StorageError> {
    if !upload.content_type.starts_with("image/") {
        return Err(StorageError::Rejected(format!("unsupported content type '{}'", upload.content_type)));
    }
    if upload.bytes.is_empty() {
        return Err(StorageError::Rejected("empty file".into()));
    }
    if upload.bytes.len() > max_bytes {
        return Err(StorageError::Rejected(format!("file too large ({} > {} bytes)", upload.bytes.len(), max_bytes)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_has_folder_timestamp_and_extension() {
        let key = object_key("abc-123", "Photo.PNG", "image/png");
        let (folder, file) = key.split_once('/').unwrap();
        assert_eq!(folder, "abc-123");
        assert!(file.ends_with(".png"));
        let stem = file.trim_end_matches(".png");
        let (millis, rand) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rand.len(), 10);
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn extension_falls_back_to_mime() {
        assert_eq!(file_extension("blob", "image/jpeg"), "jpg");
        assert_eq!(file_extension("noext.", "image/webp"), "webp");
        assert_eq!(file_extension("x.tar.gz", "application/gzip"), "gz");
        assert_eq!(file_extension("", "weird"), "bin");
    }

    #[test]
    fn key_recovered_from_public_url() {
        assert_eq!(
            key_from_public_url("https://cdn.example.com/media/franchise-gallery-images/f1/17-abc.png").as_deref(),
            Some("f1/17-abc.png")
        );
        assert_eq!(key_from_public_url("/media/b/f1/x.jpg?v=2").as_deref(), Some("f1/x.jpg"));
        assert_eq!(key_from_public_url("x.jpg"), None);
    }

    #[test]
    fn traversal_keys_rejected() {
        for bad in ["", "/abs/x.png", "../x.png", "a/../../x", "a//b", "a\\b", "a/./b"] {
            assert!(validate_key(bad).is_err(), "{bad} should be rejected");
        }
        assert!(validate_key("folder/file.png").is_ok());
    }

    #[test]
    fn image_checks() {
        let ok = ImageUpload { file_name: "a.png".into(), content_type: "image/png".into(), bytes: vec![1, 2, 3] };
        assert!(check_image(&ok, 10).is_ok());
        assert!(check_image(&ok, 2).is_err());
        let pdf = ImageUpload { content_type: "application/pdf".into(), ..ok.clone() };
        assert!(check_image(&pdf, 10).is_err());
        let empty = ImageUpload { bytes: vec![], ..ok };
        assert!(check_image(&empty, 10).is_err());
    }
}
