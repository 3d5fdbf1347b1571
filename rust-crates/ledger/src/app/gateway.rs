use crate::{
    app::blob_storage::BlobStorage,
    config::{
        LedgerConfig,
        StorageKeys,
    },
    entry::{
        BetEntry,
        Clock,
    },
    legacy::LEGACY_OWNER,
    schema::{
        Parsed,
        SchemaAdapter,
        default_adapters,
    },
};
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

/// Where a successful load came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSource {
    pub key: String,
    pub schema: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Loaded {
    pub entries: Vec<BetEntry>,
    /// `None` when no key held a readable blob.
    pub source: Option<LoadSource>,
}

#[derive(Serialize)]
struct PersistedEntries<'a> {
    entries: &'a [BetEntry],
}

/// Reads the entry list from the first key that holds a usable blob and
/// writes it back under the canonical key only.
pub struct StorageGateway<Storage> {
    storage: Storage,
    keys: StorageKeys,
    adapters: Vec<Box<dyn SchemaAdapter>>,
}

impl<Storage: BlobStorage> StorageGateway<Storage> {
    pub fn new(storage: Storage, keys: StorageKeys) -> Self {
        Self::with_adapters(storage, keys, default_adapters(LEGACY_OWNER))
    }

    pub fn from_config(storage: Storage, config: &LedgerConfig) -> Self {
        Self::with_adapters(
            storage,
            config.storage_keys.clone(),
            default_adapters(&config.legacy_owner),
        )
    }

    pub fn with_adapters(
        storage: Storage,
        keys: StorageKeys,
        adapters: Vec<Box<dyn SchemaAdapter>>,
    ) -> Self {
        Self {
            storage,
            keys,
            adapters,
        }
    }

    pub fn load(&self, clock: &dyn Clock) -> Vec<BetEntry> {
        self.load_with_source(clock).entries
    }

    /// Never fails: unreadable keys, undecodable blobs and unknown shapes are
    /// logged and skipped. Reading has no side effects, so this can run as
    /// often as change signals arrive.
    pub fn load_with_source(&self, clock: &dyn Clock) -> Loaded {
        if !self.storage.is_available() {
            tracing::debug!("no backing store; starting from an empty ledger");
            return Loaded::default();
        }

        for key in self.keys.priority() {
            let raw = match self.storage.get(key) {
                Ok(Some(raw)) if !raw.is_empty() => raw,
                Ok(_) => {
                    tracing::debug!("no blob under {key}");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("failed to read {key}: {e:#}");
                    continue;
                }
            };
            let decoded: Value = match serde_json::from_str(&raw) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::warn!("blob under {key} is not valid JSON: {e}");
                    continue;
                }
            };
            if let Some(loaded) = self.adapt(key, &decoded, clock) {
                return loaded;
            }
        }

        tracing::debug!("no recognized blob under any known key");
        Loaded::default()
    }

    fn adapt(&self, key: &str, decoded: &Value, clock: &dyn Clock) -> Option<Loaded> {
        for adapter in &self.adapters {
            match adapter.adapt(decoded, clock) {
                Parsed::Recognized(entries) => {
                    if key != self.keys.canonical {
                        tracing::info!(
                            "read {} entries from {key} via {} schema",
                            entries.len(),
                            adapter.name()
                        );
                    }
                    return Some(Loaded {
                        entries,
                        source: Some(LoadSource {
                            key: key.to_string(),
                            schema: adapter.name(),
                        }),
                    });
                }
                Parsed::Unrecognized => continue,
                Parsed::Corrupt(reason) => {
                    tracing::warn!("skipping {key}: {reason}");
                    return None;
                }
            }
        }
        tracing::debug!("blob under {key} matches no known schema");
        None
    }

    /// Writes `{"entries": [...]}` under the canonical key. Legacy keys are
    /// never written. A no-op without a backing store.
    pub fn save(&mut self, entries: &[BetEntry]) -> crate::Result<()> {
        if !self.storage.is_available() {
            return Ok(());
        }
        let json = serde_json::to_string(&PersistedEntries { entries })
            .context("serialize entry list")?;
        self.storage
            .set(&self.keys.canonical, &json)
            .with_context(|| format!("write entry list to {}", self.keys.canonical))?;
        tracing::debug!("saved {} entries to {}", entries.len(), self.keys.canonical);
        Ok(())
    }
}
