use crate::legacy::LEGACY_OWNER;
use anyhow::Context;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fs,
    path::Path,
};

pub const CANONICAL_STORAGE_KEY: &str = "up-down-bets-v1";

/// Older layouts, newest schema first.
pub const LEGACY_STORAGE_KEYS: [&str; 4] = [
    "up-down-sheet-v4",
    "up-down-sheet-v3",
    "up-down-sheet-v2",
    "up-down-sheet-mockup-v1",
];

/// Keys the gateway knows about. Writes only ever go to `canonical`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    pub canonical: String,
    #[serde(default)]
    pub legacy: Vec<String>,
}

impl StorageKeys {
    pub fn new(canonical: impl Into<String>, legacy: Vec<String>) -> Self {
        Self {
            canonical: canonical.into(),
            legacy,
        }
    }

    /// Read order: canonical first, then legacy keys in the configured order.
    pub fn priority(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str())
            .chain(self.legacy.iter().map(String::as_str))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.priority().any(|known| known == key)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(
            CANONICAL_STORAGE_KEY,
            LEGACY_STORAGE_KEYS.iter().map(|key| key.to_string()).collect(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub storage_keys: StorageKeys,
    #[serde(default = "default_legacy_owner")]
    pub legacy_owner: String,
}

fn default_legacy_owner() -> String {
    LEGACY_OWNER.to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_keys: StorageKeys::default(),
            legacy_owner: default_legacy_owner(),
        }
    }
}

impl LedgerConfig {
    /// Reads a JSON config file; fields left out keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .with_context(|| format!("read ledger config at {}", path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("parse ledger config at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn storage_keys__priority_starts_with_canonical() {
        // given
        let keys = StorageKeys::default();

        // when
        let order: Vec<&str> = keys.priority().collect();

        // then
        assert_eq!(
            order,
            vec![
                "up-down-bets-v1",
                "up-down-sheet-v4",
                "up-down-sheet-v3",
                "up-down-sheet-v2",
                "up-down-sheet-mockup-v1",
            ]
        );
        assert!(keys.contains("up-down-sheet-v2"));
        assert!(!keys.contains("something-else"));
    }

    #[test]
    fn from_file__missing_fields_fall_back_to_defaults() {
        // given
        let dir = TempDir::new("ledger_config").unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"storage_keys": {"canonical": "bets-v2"}}"#).unwrap();

        // when
        let config = LedgerConfig::from_file(&path).unwrap();

        // then
        assert_eq!(config.storage_keys, StorageKeys::new("bets-v2", Vec::new()));
        assert_eq!(config.legacy_owner, LEGACY_OWNER);
    }

    #[test]
    fn from_file__invalid_json_is_an_error() {
        // given
        let dir = TempDir::new("ledger_config_invalid").unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"not json").unwrap();

        // when
        let result = LedgerConfig::from_file(&path);

        // then
        assert!(result.is_err());
    }
}
