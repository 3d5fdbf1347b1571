use crate::app::blob_storage::BlobStorage;

/// Stands in when no persistence exists. Reads find nothing and writes are
/// dropped, so the ledger runs purely in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl BlobStorage for UnavailableStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> crate::Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> crate::Result<()> {
        Ok(())
    }
}
