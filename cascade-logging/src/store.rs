//! Blob-store capability contract
//!
//! Remote backends are consumed through a narrow capability: write bytes
//! to a named blob, read bytes from a named blob. Concrete storage clients
//! live outside this crate; the handler treats any [`StoreError`] as
//! recoverable (fallback on read, log-and-drop on write).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// Capability contract for a remote log backend
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `data` to the blob at `remote_path`, tagged with `tags`
    ///
    /// Overwrites any existing blob at the same path.
    async fn write_blob(
        &self,
        remote_path: &str,
        data: &[u8],
        tags: &HashMap<String, String>,
    ) -> Result<(), StoreError>;

    /// Reads the blob at `remote_path`
    async fn read_blob(&self, remote_path: &str) -> Result<Vec<u8>, StoreError>;
}

#[derive(Debug, Clone)]
struct StoredBlob {
    data: Vec<u8>,
    tags: HashMap<String, String>,
}

/// In-memory implementation of [`BlobStore`]
///
/// Uses Arc<Mutex<..>> for thread-safe access across tasks. Records write
/// counts and tags so callers can observe upload behavior.
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, StoredBlob>>>,
    write_count: Arc<Mutex<usize>>,
}

impl InMemoryBlobStore {
    /// Creates an empty in-memory blob store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored bytes for `remote_path`, if any
    pub fn blob(&self, remote_path: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(remote_path)
            .map(|blob| blob.data.clone())
    }

    /// Returns the tags recorded for `remote_path`, if any
    pub fn tags(&self, remote_path: &str) -> Option<HashMap<String, String>> {
        self.blobs
            .lock()
            .unwrap()
            .get(remote_path)
            .map(|blob| blob.tags.clone())
    }

    /// Number of writes performed against this store
    pub fn write_count(&self) -> usize {
        *self.write_count.lock().unwrap()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn write_blob(
        &self,
        remote_path: &str,
        data: &[u8],
        tags: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut blobs = self.blobs.lock().unwrap();
        blobs.insert(
            remote_path.to_string(),
            StoredBlob {
                data: data.to_vec(),
                tags: tags.clone(),
            },
        );
        *self.write_count.lock().unwrap() += 1;
        Ok(())
    }

    async fn read_blob(&self, remote_path: &str) -> Result<Vec<u8>, StoreError> {
        let blobs = self.blobs.lock().unwrap();
        blobs
            .get(remote_path)
            .map(|blob| blob.data.clone())
            .ok_or_else(|| StoreError::NotFound(remote_path.to_string()))
    }
}
