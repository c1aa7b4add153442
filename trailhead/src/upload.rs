use std::collections::HashMap;

use crate::errors::PlatformError;

/// Contract of the external blob store: bytes in, durable URL out.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    async fn upload(&mut self, bytes: &[u8], path: &str) -> Result<String, PlatformError>;
}

/// In-memory blob store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: HashMap<String, Vec<u8>>,
    fail_next_upload: bool,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn fail_next_upload(&mut self) {
        self.fail_next_upload = true;
    }

    pub fn stored(&self, path: &str) -> Option<&[u8]> {
        self.objects.get(path).map(Vec::as_slice)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn upload(&mut self, bytes: &[u8], path: &str) -> Result<String, PlatformError> {
        if self.fail_next_upload {
            self.fail_next_upload = false;
            return Err(PlatformError::Upload {
                message: "injected upload failure".into(),
            });
        }
        self.objects.insert(path.to_string(), bytes.to_vec());
        Ok(format!("{}/{}", self.base_url, path))
    }
}
