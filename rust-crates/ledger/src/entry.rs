use crate::parse::zero_pad2;
use chrono::{
    DateTime,
    SecondsFormat,
    Utc,
};
use rand::{
    Rng,
    distr::Alphanumeric,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Top,
    Bottom,
}

impl BetType {
    /// Numbers the entry form accepts for this half of the board.
    pub fn range(self) -> (u8, u8) {
        match self {
            BetType::Top => (0, 49),
            BetType::Bottom => (50, 99),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BetType::Top => "top",
            BetType::Bottom => "bottom",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A two-digit board number in `00..=99`. Orders numerically and renders
/// zero-padded.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct BetNumber(u8);

impl BetNumber {
    pub const MAX: u8 = 99;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for BetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", zero_pad2(u64::from(self.0)))
    }
}

impl TryFrom<String> for BetNumber {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse::<u8>()
            .ok()
            .and_then(BetNumber::new)
            .ok_or_else(|| format!("invalid bet number '{raw}'"))
    }
}

impl From<BetNumber> for String {
    fn from(number: BetNumber) -> Self {
        number.to_string()
    }
}

/// One customer's wager on one number for one half. Never edited after
/// creation; corrections are new entries.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetEntry {
    pub id: String,
    pub customer_name: String,
    pub number: BetNumber,
    pub amount: u64,
    #[serde(rename = "type")]
    pub bet_type: BetType,
    pub created_at: String,
}

impl BetEntry {
    /// Key used when counting distinct people.
    pub fn customer_key(&self) -> String {
        customer_key(&self.customer_name)
    }
}

/// Collapses whitespace runs to a single space and trims the ends.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn customer_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Source of "now" for entry stamps and generated ids.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fresh identifier for a newly created entry: `<unix-millis>-<8 base36 chars>`.
pub fn new_entry_id(instant: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .filter(|c| !c.is_ascii_uppercase())
        .take(8)
        .map(char::from)
        .collect();
    format!("{}-{}", instant.timestamp_millis(), suffix)
}
