use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::StoreError;

/// BlobUploader is the opaque file-upload collaborator: content is pushed to
/// a path-addressed location and a URL for it comes back. The engine never
/// inspects the payload.
pub trait BlobUploader: Send + Sync {
    /// Upload a file and return the URL it can be fetched from.
    fn upload(&self, filename: &str, data: &[u8]) -> Result<String, StoreError>;
}

/// In-memory uploader for tests. Returned URLs use the `blob:` scheme.
#[derive(Default)]
pub struct MemoryBlobUploader {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().unwrap().is_empty()
    }
}

impl BlobUploader for MemoryBlobUploader {
    fn upload(&self, filename: &str, data: &[u8]) -> Result<String, StoreError> {
        debug!("uploading blob {} ({} bytes)", filename, data.len());
        let mut files = self.files.write().unwrap();
        files.insert(filename.to_string(), data.to_vec());
        Ok(format!("blob:{filename}"))
    }
}
