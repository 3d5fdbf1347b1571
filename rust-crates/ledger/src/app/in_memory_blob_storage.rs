use crate::app::blob_storage::BlobStorage;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};

/// Blob storage backed by a shared map. Clones see each other's writes,
/// which makes it handy for standing in for several open sessions.
#[derive(Clone, Default)]
pub struct InMemoryBlobStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_blob(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.insert(key, value);
        storage
    }

    pub fn blobs(&self) -> Arc<Mutex<HashMap<String, String>>> {
        self.blobs.clone()
    }

    fn insert(&self, key: &str, value: &str) {
        let mut guard = self
            .blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(key.to_string(), value.to_string());
    }
}

impl BlobStorage for InMemoryBlobStorage {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        let guard = self
            .blobs
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory blob storage lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.insert(key, value);
        Ok(())
    }
}
