//! Turning a filled-in bet form into new entries.
//!
//! A form is accepted as a whole or not at all: the first invalid row rejects
//! the submission and nothing is created.

use crate::{
    entry::{
        BetEntry,
        BetNumber,
        BetType,
        Clock,
        format_timestamp,
        new_entry_id,
        normalize_name,
    },
    parse::{
        digits_only,
        str_to_int_in_range,
        str_to_non_negative_int,
    },
};
use thiserror::Error;

pub const MAX_NAME_CHARS: usize = 80;
pub const MAX_NUMBER_DIGITS: usize = 2;
pub const MAX_AMOUNT_DIGITS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("customer name is required")]
    EmptyCustomerName,
    #[error("{side} row {row} needs both a number and an amount")]
    IncompleteRow { side: BetType, row: usize },
    #[error("{side} row {row}: number must be between {min:02} and {max:02}")]
    NumberOutOfRange {
        side: BetType,
        row: usize,
        min: u8,
        max: u8,
    },
    #[error("{side} row {row}: amount must be greater than 0")]
    NonPositiveAmount { side: BetType, row: usize },
    #[error("enter at least one top or bottom bet")]
    NoBets,
}

/// One line of the form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BetDraft {
    pub number: String,
    pub amount: String,
}

impl BetDraft {
    /// Keeps digits only and cuts each field to the width the form allows.
    pub fn from_input(number: &str, amount: &str) -> Self {
        Self {
            number: digits_only(number).chars().take(MAX_NUMBER_DIGITS).collect(),
            amount: digits_only(amount).chars().take(MAX_AMOUNT_DIGITS).collect(),
        }
    }

    fn is_blank(&self) -> bool {
        self.number.is_empty() && self.amount.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BetForm {
    pub customer_name: String,
    pub top_bets: Vec<BetDraft>,
    pub bottom_bets: Vec<BetDraft>,
}

impl BetForm {
    pub fn with_customer_name(name: &str) -> Self {
        Self {
            customer_name: name.chars().take(MAX_NAME_CHARS).collect(),
            ..Self::default()
        }
    }

    pub fn top(mut self, number: &str, amount: &str) -> Self {
        self.top_bets.push(BetDraft::from_input(number, amount));
        self
    }

    pub fn bottom(mut self, number: &str, amount: &str) -> Self {
        self.bottom_bets.push(BetDraft::from_input(number, amount));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDraft {
    pub number: BetNumber,
    pub amount: u64,
    pub bet_type: BetType,
}

/// A validated form: normalized name plus every non-blank row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub customer_name: String,
    pub bets: Vec<ParsedDraft>,
}

fn parse_drafts(
    drafts: &[BetDraft],
    side: BetType,
) -> Result<Vec<ParsedDraft>, ValidationError> {
    let (min, max) = side.range();
    let mut parsed = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.iter().enumerate() {
        let row = index + 1;
        if draft.is_blank() {
            continue;
        }
        if draft.number.is_empty() || draft.amount.is_empty() {
            return Err(ValidationError::IncompleteRow { side, row });
        }
        let number = str_to_int_in_range(&draft.number, u64::from(min), u64::from(max))
            .and_then(|n| u8::try_from(n).ok())
            .and_then(BetNumber::new)
            .ok_or(ValidationError::NumberOutOfRange {
                side,
                row,
                min,
                max,
            })?;
        let amount = str_to_non_negative_int(&draft.amount);
        if amount == 0 {
            return Err(ValidationError::NonPositiveAmount { side, row });
        }
        parsed.push(ParsedDraft {
            number,
            amount,
            bet_type: side,
        });
    }
    Ok(parsed)
}

pub fn validate_form(form: &BetForm) -> Result<ValidatedForm, ValidationError> {
    let customer_name = normalize_name(&form.customer_name);
    if customer_name.is_empty() {
        return Err(ValidationError::EmptyCustomerName);
    }
    let mut bets = parse_drafts(&form.top_bets, BetType::Top)?;
    bets.extend(parse_drafts(&form.bottom_bets, BetType::Bottom)?);
    if bets.is_empty() {
        return Err(ValidationError::NoBets);
    }
    Ok(ValidatedForm {
        customer_name,
        bets,
    })
}

/// Validates `form` and stamps one entry per row, all sharing the same
/// creation time. Top rows come first, then bottom rows, in form order.
pub fn create_entries(
    form: &BetForm,
    clock: &dyn Clock,
) -> Result<Vec<BetEntry>, ValidationError> {
    let validated = validate_form(form)?;
    let now = clock.now();
    let created_at = format_timestamp(now);
    Ok(validated
        .bets
        .into_iter()
        .map(|bet| BetEntry {
            id: new_entry_id(now),
            customer_name: validated.customer_name.clone(),
            number: bet.number,
            amount: bet.amount,
            bet_type: bet.bet_type,
            created_at: created_at.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::entry::FixedClock;
    use chrono::{
        TimeZone,
        Utc,
    };
    use std::collections::HashSet;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap())
    }

    #[test]
    fn from_input__keeps_digits_and_truncates() {
        let draft = BetDraft::from_input("1a23", "1,234,567,890,1");
        assert_eq!(draft.number, "12");
        assert_eq!(draft.amount, "123456789");
    }

    #[test]
    fn with_customer_name__cuts_to_eighty_chars() {
        let form = BetForm::with_customer_name(&"ก".repeat(100));
        assert_eq!(form.customer_name.chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn validate_form__rejects_blank_customer() {
        let form = BetForm::with_customer_name("   ").top("07", "100");
        assert_eq!(validate_form(&form), Err(ValidationError::EmptyCustomerName));
    }

    #[test]
    fn validate_form__top_number_in_bottom_range_is_rejected() {
        // given
        let form = BetForm::with_customer_name("Somchai").top("55", "100");

        // when
        let result = validate_form(&form);

        // then
        assert_eq!(
            result,
            Err(ValidationError::NumberOutOfRange {
                side: BetType::Top,
                row: 1,
                min: 0,
                max: 49,
            })
        );
    }

    #[test]
    fn validate_form__bottom_number_in_top_range_is_rejected() {
        // given
        let form = BetForm::with_customer_name("Somchai")
            .top("07", "100")
            .bottom("", "")
            .bottom("12", "5");

        // when
        let result = validate_form(&form);

        // then
        assert_eq!(
            result,
            Err(ValidationError::NumberOutOfRange {
                side: BetType::Bottom,
                row: 2,
                min: 50,
                max: 99,
            })
        );
    }

    #[test]
    fn validate_form__half_filled_row_is_rejected() {
        let form = BetForm::with_customer_name("A").top("07", "");
        assert_eq!(
            validate_form(&form),
            Err(ValidationError::IncompleteRow {
                side: BetType::Top,
                row: 1,
            })
        );
    }

    #[test]
    fn validate_form__zero_amount_is_rejected() {
        let form = BetForm::with_customer_name("A").bottom("60", "000");
        assert_eq!(
            validate_form(&form),
            Err(ValidationError::NonPositiveAmount {
                side: BetType::Bottom,
                row: 1,
            })
        );
    }

    #[test]
    fn validate_form__only_blank_rows_is_rejected() {
        let form = BetForm::with_customer_name("A").top("", "").bottom("", "");
        assert_eq!(validate_form(&form), Err(ValidationError::NoBets));
    }

    #[test]
    fn create_entries__stamps_batch_with_shared_time_and_fresh_ids() {
        // given
        let form = BetForm::with_customer_name("  Som   chai ")
            .bottom("75", "20")
            .top("7", "100")
            .top("", "")
            .top("49", "5");

        // when
        let entries = create_entries(&form, &clock()).unwrap();

        // then
        let rows: Vec<(String, u64, BetType)> = entries
            .iter()
            .map(|e| (e.number.to_string(), e.amount, e.bet_type))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("07".to_string(), 100, BetType::Top),
                ("49".to_string(), 5, BetType::Top),
                ("75".to_string(), 20, BetType::Bottom),
            ]
        );
        assert!(entries.iter().all(|e| e.customer_name == "Som chai"));
        assert!(
            entries
                .iter()
                .all(|e| e.created_at == "2026-10-17T08:00:00.000Z")
        );
        let ids: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), entries.len());
    }

    #[test]
    fn validation_error__message_names_the_range() {
        let error = ValidationError::NumberOutOfRange {
            side: BetType::Bottom,
            row: 3,
            min: 50,
            max: 99,
        };
        assert_eq!(
            error.to_string(),
            "bottom row 3: number must be between 50 and 99"
        );
    }
}
