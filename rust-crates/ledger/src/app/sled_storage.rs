// Sled-backed blob storage for the entry list and the legacy layouts.
use crate::{
    app::blob_storage::BlobStorage,
    config::StorageKeys,
};
use anyhow::Context;
use sled::{
    Config,
    Db,
    Event,
    Subscriber,
    Tree,
};
use std::path::Path;

const BLOB_TREE: &str = "ledger_blobs";

#[derive(Clone)]
pub struct SledBlobStorage {
    tree: Tree,
}

impl SledBlobStorage {
    pub fn new(db: &Db) -> crate::Result<Self> {
        let tree = db.open_tree(BLOB_TREE).context("open ledger_blobs tree")?;
        Ok(Self { tree })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let config = Config::default().path(path);
        let db = config.open().context("open sled database")?;
        Self::new(&db)
    }

    /// Every key currently stored, in byte order.
    pub fn keys(&self) -> crate::Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in self.tree.iter() {
            let (key, _) = entry.context("iterate ledger blobs")?;
            let key = std::str::from_utf8(key.as_ref())
                .context("ledger blob key is not valid UTF-8")?;
            keys.push(key.to_string());
        }
        Ok(keys)
    }

    /// Change signal for other sessions sharing this database: yields each
    /// known key as soon as any handle writes or removes it.
    pub fn watch(&self, keys: &StorageKeys) -> BlobChanges {
        BlobChanges {
            subscriber: self.tree.watch_prefix(Vec::<u8>::new()),
            keys: keys.clone(),
        }
    }
}

impl BlobStorage for SledBlobStorage {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        let value = match self.tree.get(key.as_bytes())? {
            Some(value) => value,
            None => return Ok(None),
        };
        let text = String::from_utf8(value.to_vec())
            .with_context(|| format!("blob under {key} is not valid UTF-8"))?;
        Ok(Some(text))
    }

    fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.tree
            .insert(key.as_bytes(), value.as_bytes())
            .with_context(|| format!("persist blob under {key}"))?;
        self.tree
            .flush()
            .with_context(|| format!("flush blob under {key}"))?;
        Ok(())
    }
}

/// Blocking iterator over writes to recognized keys. Consumers reload the
/// ledger on every item; writes to unrelated keys are skipped.
pub struct BlobChanges {
    subscriber: Subscriber,
    keys: StorageKeys,
}

impl Iterator for BlobChanges {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.subscriber.next()?;
            let key = match &event {
                Event::Insert { key, .. } | Event::Remove { key } => key,
            };
            let Ok(key) = std::str::from_utf8(key.as_ref()) else {
                continue;
            };
            if self.keys.contains(key) {
                return Some(key.to_string());
            }
        }
    }
}
