//! One-way migration from the old accumulation grid.
//!
//! The grid had exactly [`GRID_ROWS`] rows. Row `i` held running totals for
//! number `i` (left columns) and number `i + 50` (right columns), with no
//! record of who placed them.

use crate::{
    entry::{
        BetEntry,
        BetNumber,
        BetType,
    },
    parse::to_non_negative_int,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

pub const GRID_ROWS: usize = 50;

/// Customer name given to every migrated entry.
pub const LEGACY_OWNER: &str = "Legacy Data";

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyGridRow {
    pub left_top: u64,
    pub left_bottom: u64,
    pub right_top: u64,
    pub right_bottom: u64,
}

impl LegacyGridRow {
    fn from_value(row: &Value) -> Self {
        let field = |name: &str| {
            row.as_object()
                .and_then(|object| object.get(name))
                .map(to_non_negative_int)
                .unwrap_or(0)
        };
        Self {
            left_top: field("leftTop"),
            left_bottom: field("leftBottom"),
            right_top: field("rightTop"),
            right_bottom: field("rightBottom"),
        }
    }

    /// `(number, type, amount)` for each bucket, left before right, top before
    /// bottom.
    fn buckets(&self, index: u8) -> [(u8, BetType, u64); 4] {
        let right = index + GRID_ROWS as u8;
        [
            (index, BetType::Top, self.left_top),
            (index, BetType::Bottom, self.left_bottom),
            (right, BetType::Top, self.right_top),
            (right, BetType::Bottom, self.right_bottom),
        ]
    }
}

/// Reads `value` as the 50-row grid. Missing or malformed fields count as 0,
/// a non-object row counts as an all-zero row. Anything other than an array
/// of exactly 50 elements is rejected.
pub fn parse_grid(value: &Value) -> Option<Vec<LegacyGridRow>> {
    let rows = value.as_array()?;
    if rows.len() != GRID_ROWS {
        return None;
    }
    Some(rows.iter().map(LegacyGridRow::from_value).collect())
}

/// Turns each non-zero bucket into one entry.
///
/// Ids are `legacy-<unpadded number>-<type>`, so migrating the same grid
/// twice yields the same ids in the same order.
pub fn migrate_rows(
    rows: &[LegacyGridRow],
    owner: &str,
    created_at: &str,
) -> Vec<BetEntry> {
    let mut entries = Vec::new();
    for (index, row) in rows.iter().take(GRID_ROWS).enumerate() {
        let index = index as u8;
        for (number, bet_type, amount) in row.buckets(index) {
            if amount == 0 {
                continue;
            }
            let Some(number) = BetNumber::new(number) else {
                continue;
            };
            entries.push(BetEntry {
                id: format!("legacy-{}-{bet_type}", number.value()),
                customer_name: owner.to_string(),
                number,
                amount,
                bet_type,
                created_at: created_at.to_string(),
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use serde_json::json;

    const STAMP: &str = "2026-10-17T08:00:00.000Z";

    fn grid(rows: &[(usize, Value)]) -> Value {
        let mut grid = vec![json!({}); GRID_ROWS];
        for (index, row) in rows {
            grid[*index] = row.clone();
        }
        Value::Array(grid)
    }

    #[test]
    fn parse_grid__requires_exactly_fifty_rows() {
        assert!(parse_grid(&json!([])).is_none());
        assert!(parse_grid(&Value::Array(vec![json!({}); 49])).is_none());
        assert!(parse_grid(&json!({"rows": []})).is_none());
        assert!(parse_grid(&grid(&[])).is_some());
    }

    #[test]
    fn parse_grid__coerces_malformed_fields_to_zero() {
        // given
        let value = grid(&[
            (0, json!({"leftTop": "1,500", "leftBottom": -3, "rightTop": null})),
            (1, json!("not a row")),
        ]);

        // when
        let rows = parse_grid(&value).unwrap();

        // then
        assert_eq!(
            rows[0],
            LegacyGridRow {
                left_top: 1500,
                ..LegacyGridRow::default()
            }
        );
        assert_eq!(rows[1], LegacyGridRow::default());
    }

    #[test]
    fn migrate_rows__zero_bucket_creates_no_entry() {
        // given
        let rows = parse_grid(&grid(&[(4, json!({"leftTop": 0, "leftBottom": 30}))]))
            .unwrap();

        // when
        let entries = migrate_rows(&rows, LEGACY_OWNER, STAMP);

        // then
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.number.to_string(), "04");
        assert_eq!(entry.bet_type, BetType::Bottom);
        assert_eq!(entry.amount, 30);
        assert_eq!(entry.customer_name, LEGACY_OWNER);
        assert_eq!(entry.created_at, STAMP);
    }

    #[test]
    fn migrate_rows__right_columns_map_to_upper_half() {
        // given
        let rows = parse_grid(&grid(&[(
            7,
            json!({"leftTop": 10, "leftBottom": 20, "rightTop": 30, "rightBottom": 40}),
        )]))
        .unwrap();

        // when
        let entries = migrate_rows(&rows, LEGACY_OWNER, STAMP);

        // then
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.id.as_str(), e.number.to_string(), e.bet_type, e.amount))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("legacy-7-top", "07".to_string(), BetType::Top, 10),
                ("legacy-7-bottom", "07".to_string(), BetType::Bottom, 20),
                ("legacy-57-top", "57".to_string(), BetType::Top, 30),
                ("legacy-57-bottom", "57".to_string(), BetType::Bottom, 40),
            ]
        );
    }

    #[test]
    fn migrate_rows__same_grid_twice_yields_identical_entries() {
        // given
        let rows = parse_grid(&grid(&[
            (0, json!({"leftTop": 5})),
            (49, json!({"rightBottom": 9})),
        ]))
        .unwrap();

        // when
        let first = migrate_rows(&rows, LEGACY_OWNER, STAMP);
        let second = migrate_rows(&rows, LEGACY_OWNER, STAMP);

        // then
        assert_eq!(first, second);
        assert_eq!(second[1].id, "legacy-99-bottom");
    }
}
