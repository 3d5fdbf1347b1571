//! Read-side projections over the entry list. Everything here is recomputed
//! from scratch on each call and never assumes the list is in any order.

use crate::entry::{
    BetEntry,
    BetNumber,
    BetType,
    customer_key,
};
use serde::Serialize;
use std::collections::{
    BTreeMap,
    BTreeSet,
    HashMap,
    HashSet,
};

/// How many numbers the dashboard shows per side.
pub const DEFAULT_LEADER_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetSummary {
    pub top_total: u128,
    pub bottom_total: u128,
    pub total_amount: u128,
    pub total_entries: usize,
    pub unique_people: usize,
    pub active_numbers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSummary {
    pub number: BetNumber,
    pub people_count: usize,
    pub bet_count: usize,
    pub total_amount: u128,
    pub top_amount: u128,
    pub bottom_amount: u128,
    /// Newest first.
    pub entries: Vec<BetEntry>,
}

impl NumberSummary {
    pub fn amount_for(&self, bet_type: BetType) -> u128 {
        match bet_type {
            BetType::Top => self.top_amount,
            BetType::Bottom => self.bottom_amount,
        }
    }

    /// Per-customer subtotals on this number, largest stake first.
    pub fn by_customer(&self) -> Vec<CustomerStake> {
        let mut stakes: Vec<CustomerStake> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        // entries are newest first, so the first name seen is the latest spelling
        for entry in &self.entries {
            let position = *positions.entry(entry.customer_key()).or_insert_with(|| {
                stakes.push(CustomerStake {
                    customer_name: entry.customer_name.clone(),
                    ..CustomerStake::default()
                });
                stakes.len() - 1
            });
            let stake = &mut stakes[position];
            stake.bet_count += 1;
            add_amount(
                &mut stake.top_amount,
                &mut stake.bottom_amount,
                entry.bet_type,
                entry.amount,
            );
            stake.total_amount += u128::from(entry.amount);
        }
        stakes.sort_by(|a, b| {
            b.total_amount.cmp(&a.total_amount).then_with(|| {
                customer_key(&a.customer_name).cmp(&customer_key(&b.customer_name))
            })
        });
        stakes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStake {
    pub customer_name: String,
    pub bet_count: usize,
    pub total_amount: u128,
    pub top_amount: u128,
    pub bottom_amount: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub customer_name: String,
    pub bet_count: usize,
    pub total_amount: u128,
    pub top_amount: u128,
    pub bottom_amount: u128,
    /// Distinct numbers this customer has bet on, ascending.
    pub numbers: Vec<BetNumber>,
    /// Newest first.
    pub entries: Vec<BetEntry>,
}

fn add_amount(top: &mut u128, bottom: &mut u128, bet_type: BetType, amount: u64) {
    match bet_type {
        BetType::Top => *top += u128::from(amount),
        BetType::Bottom => *bottom += u128::from(amount),
    }
}

fn newest_first(entries: &mut [BetEntry]) {
    // stable, so equal stamps keep their list order
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub fn build_bet_summary(entries: &[BetEntry]) -> BetSummary {
    let mut summary = BetSummary {
        total_entries: entries.len(),
        ..BetSummary::default()
    };
    let mut people = HashSet::new();
    let mut numbers = HashSet::new();
    for entry in entries {
        add_amount(
            &mut summary.top_total,
            &mut summary.bottom_total,
            entry.bet_type,
            entry.amount,
        );
        people.insert(entry.customer_key());
        numbers.insert(entry.number);
    }
    summary.total_amount = summary.top_total + summary.bottom_total;
    summary.unique_people = people.len();
    summary.active_numbers = numbers.len();
    summary
}

/// One summary per number that has at least one entry, ascending by number.
pub fn build_number_summaries(entries: &[BetEntry]) -> Vec<NumberSummary> {
    let mut groups: BTreeMap<BetNumber, Vec<BetEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.number).or_default().push(entry.clone());
    }

    groups
        .into_iter()
        .map(|(number, mut group)| {
            let mut top_amount = 0;
            let mut bottom_amount = 0;
            for entry in &group {
                add_amount(&mut top_amount, &mut bottom_amount, entry.bet_type, entry.amount);
            }
            let people_count = group
                .iter()
                .map(BetEntry::customer_key)
                .collect::<HashSet<_>>()
                .len();
            newest_first(&mut group);
            NumberSummary {
                number,
                people_count,
                bet_count: group.len(),
                total_amount: top_amount + bottom_amount,
                top_amount,
                bottom_amount,
                entries: group,
            }
        })
        .collect()
}

/// Numbers with a positive amount on `bet_type`, largest first. Ties keep
/// ascending number order.
pub fn leaders(
    summaries: &[NumberSummary],
    bet_type: BetType,
    limit: usize,
) -> Vec<NumberSummary> {
    let mut ranked: Vec<NumberSummary> = summaries
        .iter()
        .filter(|summary| summary.amount_for(bet_type) > 0)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.amount_for(bet_type)
            .cmp(&a.amount_for(bet_type))
            .then_with(|| a.number.cmp(&b.number))
    });
    ranked.truncate(limit);
    ranked
}

/// Groups entries by customer, biggest spender first.
pub fn build_customer_summaries(entries: &[BetEntry]) -> Vec<CustomerSummary> {
    let mut groups: HashMap<String, Vec<BetEntry>> = HashMap::new();
    for entry in entries {
        groups
            .entry(entry.customer_key())
            .or_default()
            .push(entry.clone());
    }

    let mut summaries: Vec<(String, CustomerSummary)> = groups
        .into_iter()
        .map(|(key, mut group)| {
            newest_first(&mut group);
            let mut top_amount = 0;
            let mut bottom_amount = 0;
            let mut numbers = BTreeSet::new();
            for entry in &group {
                add_amount(&mut top_amount, &mut bottom_amount, entry.bet_type, entry.amount);
                numbers.insert(entry.number);
            }
            let customer_name = group
                .first()
                .map(|entry| entry.customer_name.clone())
                .unwrap_or_default();
            let summary = CustomerSummary {
                customer_name,
                bet_count: group.len(),
                total_amount: top_amount + bottom_amount,
                top_amount,
                bottom_amount,
                numbers: numbers.into_iter().collect(),
                entries: group,
            };
            (key, summary)
        })
        .collect();
    summaries.sort_by(|(key_a, a), (key_b, b)| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| key_a.cmp(key_b))
    });
    summaries.into_iter().map(|(_, summary)| summary).collect()
}
