//! Tagged parse results for the persisted blob shapes we know how to read.
//!
//! Each known shape gets one [`SchemaAdapter`]. The storage gateway tries the
//! adapters in order on every decoded blob and stops at the first one that
//! does not answer [`Parsed::Unrecognized`].

use crate::{
    entry::{
        BetEntry,
        Clock,
    },
    legacy,
    normalize,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Recognized(Vec<BetEntry>),
    /// Not this adapter's shape; the next adapter may still claim the blob.
    Unrecognized,
    /// This adapter's shape, but unusable. The whole blob is skipped.
    Corrupt(String),
}

pub trait SchemaAdapter {
    fn name(&self) -> &'static str;

    fn adapt(&self, decoded: &Value, clock: &dyn Clock) -> Parsed;
}

/// Returns `decoded[field]` when `decoded` is an object carrying that field,
/// otherwise the decoded value itself.
fn unwrap_field<'a>(decoded: &'a Value, field: &str) -> (&'a Value, bool) {
    match decoded.as_object().and_then(|object| object.get(field)) {
        Some(inner) => (inner, true),
        None => (decoded, false),
    }
}

/// Current `{"entries": [...]}` layout, or a bare entry array.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryListSchema;

impl SchemaAdapter for EntryListSchema {
    fn name(&self) -> &'static str {
        "entry-list"
    }

    fn adapt(&self, decoded: &Value, clock: &dyn Clock) -> Parsed {
        let (candidate, wrapped) = unwrap_field(decoded, "entries");
        match normalize::normalize_entries(candidate, clock) {
            // A bare 50-element array with no entry-shaped element is far more
            // likely a legacy grid; leave it to the grid adapter.
            Some(entries)
                if !wrapped && entries.is_empty() && looks_like_grid(candidate) =>
            {
                Parsed::Unrecognized
            }
            Some(entries) => Parsed::Recognized(entries),
            None if wrapped => Parsed::Corrupt(format!(
                "'entries' field holds {} instead of an array",
                json_kind(candidate)
            )),
            None => Parsed::Unrecognized,
        }
    }
}

/// Fixed 50-row grid, either `{"rows": [...]}` or the bare row array.
#[derive(Debug, Clone)]
pub struct LegacyGridSchema {
    owner: String,
}

impl LegacyGridSchema {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

impl Default for LegacyGridSchema {
    fn default() -> Self {
        Self::new(legacy::LEGACY_OWNER)
    }
}

impl SchemaAdapter for LegacyGridSchema {
    fn name(&self) -> &'static str {
        "legacy-grid"
    }

    fn adapt(&self, decoded: &Value, clock: &dyn Clock) -> Parsed {
        let (candidate, _) = unwrap_field(decoded, "rows");
        match legacy::parse_grid(candidate) {
            Some(rows) => Parsed::Recognized(legacy::migrate_rows(
                &rows,
                &self.owner,
                &clock.timestamp(),
            )),
            None => Parsed::Unrecognized,
        }
    }
}

/// Known schemas, newest first.
pub fn default_adapters(legacy_owner: &str) -> Vec<Box<dyn SchemaAdapter>> {
    vec![
        Box::new(EntryListSchema),
        Box::new(LegacyGridSchema::new(legacy_owner)),
    ]
}

fn looks_like_grid(candidate: &Value) -> bool {
    candidate
        .as_array()
        .is_some_and(|rows| rows.len() == legacy::GRID_ROWS)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
