//! Asset storage boundary.
//!
//! The editor only needs a URL back from an upload; which service produced
//! it is up to the provider.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Folder used when the caller gives none
pub const DEFAULT_UPLOAD_PATH: &str = "uploads";

/// Signed URL lifetime when the caller gives none, in seconds
pub const DEFAULT_SIGNED_URL_TTL: u64 = 3600;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("File {name} is {size} bytes, limit is {limit}")]
    TooLarge { name: String, size: usize, limit: usize },

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    fn extension(&self) -> Option<&str> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub url: String,
    pub path: String,
    pub key: String,
    pub size: usize,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub key: String,
    pub size: usize,
    pub url: String,
    pub last_modified: DateTime<Utc>,
}

pub trait StorageProvider {
    /// Store a file under `path` (or [`DEFAULT_UPLOAD_PATH`])
    fn upload(&mut self, file: UploadFile, path: Option<&str>) -> Result<UploadResult, StorageError>;

    fn delete(&mut self, key: &str) -> Result<(), StorageError>;

    /// Objects whose key starts with `prefix`, in key order
    fn list(&self, prefix: Option<&str>) -> Result<Vec<StoredObject>, StorageError>;

    fn get_url(&self, key: &str) -> String;

    fn get_signed_url(&self, key: &str, expires_in: Option<u64>) -> Result<String, StorageError>;
}

#[derive(Debug, Clone)]
struct MemoryObject {
    bytes: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Provider that keeps objects in memory, for tests and local previews
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    base_url: String,
    max_size: Option<usize>,
    objects: BTreeMap<String, MemoryObject>,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_size: None,
            objects: BTreeMap::new(),
        }
    }

    pub fn with_max_size(mut self, limit: usize) -> Self {
        self.max_size = Some(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.objects.get(key).map(|object| object.bytes.as_slice())
    }

    pub fn content_type(&self, key: &str) -> Option<&str> {
        self.objects.get(key).map(|object| object.content_type.as_str())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("memory://assets")
    }
}

impl StorageProvider for MemoryStorage {
    fn upload(&mut self, file: UploadFile, path: Option<&str>) -> Result<UploadResult, StorageError> {
        if file.bytes.is_empty() {
            return Err(StorageError::EmptyFile(file.name));
        }
        if let Some(limit) = self.max_size.filter(|limit| file.size() > *limit) {
            return Err(StorageError::TooLarge {
                size: file.size(),
                name: file.name,
                limit,
            });
        }

        let path = path
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_PATH)
            .to_string();
        let file_name = match file.extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase()),
            None => Uuid::new_v4().to_string(),
        };
        let key = format!("{}/{}", path, file_name);
        let size = file.size();

        self.objects.insert(
            key.clone(),
            MemoryObject {
                bytes: file.bytes,
                content_type: file.content_type.clone(),
                last_modified: Utc::now(),
            },
        );
        debug!(%key, size, "stored object");

        Ok(UploadResult {
            url: self.get_url(&key),
            path,
            key,
            size,
            content_type: file.content_type,
        })
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn list(&self, prefix: Option<&str>) -> Result<Vec<StoredObject>, StorageError> {
        let prefix = prefix.unwrap_or("");
        Ok(self
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| StoredObject {
                key: key.clone(),
                size: object.bytes.len(),
                url: self.get_url(key),
                last_modified: object.last_modified,
            })
            .collect())
    }

    fn get_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn get_signed_url(&self, key: &str, expires_in: Option<u64>) -> Result<String, StorageError> {
        if !self.objects.contains_key(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let ttl = expires_in.unwrap_or(DEFAULT_SIGNED_URL_TTL);
        let ttl = i64::try_from(ttl).map_err(|_| StorageError::Backend(format!("expiry out of range: {}", ttl)))?;
        let expires = Utc::now() + Duration::seconds(ttl);

        Ok(format!(
            "{}?expires={}&token={}",
            self.get_url(key),
            expires.timestamp(),
            Uuid::new_v4().simple()
        ))
    }
}
