use bet_ledger::{
    app::Receipt,
    entry::BetType,
    summary::{
        BetSummary,
        CustomerSummary,
        NumberSummary,
    },
};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct LeadersDto {
    pub top: Vec<NumberSummary>,
    pub bottom: Vec<NumberSummary>,
}

/// `1234567` as `1,234,567`.
pub fn amount(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index).is_multiple_of(3) {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

pub fn receipt(receipt: &Receipt) -> String {
    format!(
        "Recorded {} bets for {} ({} total)",
        receipt.entries.len(),
        receipt.customer_name,
        amount(receipt.total_amount)
    )
}

pub fn bet_summary(summary: &BetSummary) -> String {
    format!(
        "customers       {}\n\
         entries         {}\n\
         active numbers  {}\n\
         top total       {}\n\
         bottom total    {}\n\
         total           {}",
        summary.unique_people,
        summary.total_entries,
        summary.active_numbers,
        amount(summary.top_total),
        amount(summary.bottom_total),
        amount(summary.total_amount),
    )
}

pub fn number_summaries(summaries: &[NumberSummary]) -> String {
    if summaries.is_empty() {
        return "no bets recorded".to_string();
    }
    let mut out = String::new();
    for summary in summaries {
        let _ = writeln!(
            out,
            "{}  people {:>3}  bets {:>3}  top {:>12}  bottom {:>12}  total {:>12}",
            summary.number,
            summary.people_count,
            summary.bet_count,
            amount(summary.top_amount),
            amount(summary.bottom_amount),
            amount(summary.total_amount),
        );
        for stake in summary.by_customer() {
            let _ = writeln!(
                out,
                "      {:<24} {:>3} bets  {:>12}",
                stake.customer_name,
                stake.bet_count,
                amount(stake.total_amount),
            );
        }
    }
    out.trim_end().to_string()
}

pub fn leaders(side: BetType, summaries: &[NumberSummary]) -> String {
    let mut out = format!("{side} leaders");
    if summaries.is_empty() {
        out.push_str("\n  none");
        return out;
    }
    for (rank, summary) in summaries.iter().enumerate() {
        let _ = write!(
            out,
            "\n  {:>2}. {}  {:>12}  ({} people)",
            rank + 1,
            summary.number,
            amount(summary.amount_for(side)),
            summary.people_count,
        );
    }
    out
}

pub fn customers(customers: &[CustomerSummary]) -> String {
    if customers.is_empty() {
        return "no customers yet".to_string();
    }
    let mut out = String::new();
    for customer in customers {
        let numbers: Vec<String> =
            customer.numbers.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            out,
            "{:<24} bets {:>3}  top {:>12}  bottom {:>12}  total {:>12}  numbers {}",
            customer.customer_name,
            customer.bet_count,
            amount(customer.top_amount),
            amount(customer.bottom_amount),
            amount(customer.total_amount),
            numbers.join(" "),
        );
    }
    out.trim_end().to_string()
}
