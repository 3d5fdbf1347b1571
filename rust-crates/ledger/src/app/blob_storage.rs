/// Key-value blob store the ledger persists into.
///
/// Values are opaque strings; the gateway decides what goes in them.
pub trait BlobStorage {
    /// `false` when there is no backing store at all. The gateway then reads
    /// nothing and writes nothing.
    fn is_available(&self) -> bool {
        true
    }

    /// retrieve the raw blob stored under `key`, if any
    fn get(&self, key: &str) -> crate::Result<Option<String>>;

    /// write or overwrite the blob stored under `key`
    fn set(&mut self, key: &str, value: &str) -> crate::Result<()>;
}
