use crate::{
    entry::{
        BetEntry,
        BetNumber,
        BetType,
        Clock,
        normalize_name,
    },
    parse::{
        to_int_in_range,
        to_non_negative_int,
    },
};
use serde_json::{
    Map,
    Value,
};

/// Reads `value` as a list of entry records.
///
/// Returns `None` unless `value` is an array. Elements that are not objects,
/// have an empty name, a number outside `00..=99`, or a non-positive amount
/// are dropped one by one; the rest are rewritten into canonical form.
pub fn normalize_entries(value: &Value, clock: &dyn Clock) -> Option<Vec<BetEntry>> {
    let records = value.as_array()?;
    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let Some(source) = record.as_object() else {
            tracing::debug!("dropping non-object entry record at index {index}");
            continue;
        };
        match normalize_record(source, index, clock) {
            Some(entry) => entries.push(entry),
            None => tracing::debug!("dropping invalid entry record at index {index}"),
        }
    }
    if entries.len() < records.len() {
        tracing::info!(
            "kept {} of {} entry records after normalization",
            entries.len(),
            records.len()
        );
    }
    Some(entries)
}

fn normalize_record(
    source: &Map<String, Value>,
    index: usize,
    clock: &dyn Clock,
) -> Option<BetEntry> {
    let field = |name: &str| source.get(name).unwrap_or(&Value::Null);

    let customer_name = normalize_name(&text_of(field("customerName")));
    if customer_name.is_empty() {
        return None;
    }
    let number = to_int_in_range(field("number"), 0, u64::from(BetNumber::MAX))
        .and_then(|n| u8::try_from(n).ok())
        .and_then(BetNumber::new)?;
    let amount = to_non_negative_int(field("amount"));
    if amount == 0 {
        return None;
    }
    let bet_type = match field("type").as_str() {
        Some("bottom") => BetType::Bottom,
        _ => BetType::Top,
    };
    let id = match field("id") {
        Value::Null => format!("entry-{index}-{}", clock.now().timestamp_millis()),
        other => text_of(other),
    };
    let created_at = match field("createdAt").as_str() {
        Some(stamp) if !stamp.is_empty() => stamp.to_string(),
        _ => clock.timestamp(),
    };

    Some(BetEntry {
        id,
        customer_name,
        number,
        amount,
        bet_type,
        created_at,
    })
}

/// String form of a loosely typed field; strings are taken verbatim.
fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
