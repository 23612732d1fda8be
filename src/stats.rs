//! Aggregations over the transaction list.
//!
//! Everything here is a pure function of the transactions and an explicit
//! `today`; nothing reads the clock.

use crate::models::{Transaction, TransactionKind};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::fmt;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month used as the bucket key. Displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    /// 1..=12
    month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn shift(self, delta: i32) -> Self {
        let total = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: total.div_euclid(12),
            month: total.rem_euclid(12) as u32 + 1,
        }
    }

    /// Display label such as `Jan 2024`. Never used as a key.
    pub fn label(self) -> String {
        format!(
            "{} {}",
            MONTH_ABBREVIATIONS[(self.month - 1) as usize],
            self.year
        )
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyExpense {
    pub month: YearMonth,
    pub amount: f64,
}

pub fn total_by_kind(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.kind == kind)
        .map(|tx| tx.amount)
        .sum()
}

pub fn total_income(transactions: &[Transaction]) -> f64 {
    total_by_kind(transactions, TransactionKind::Income)
}

pub fn total_expenses(transactions: &[Transaction]) -> f64 {
    total_by_kind(transactions, TransactionKind::Expense)
}

pub fn net_balance(transactions: &[Transaction]) -> f64 {
    total_income(transactions) - total_expenses(transactions)
}

pub fn current_month_expenses(transactions: &[Transaction], today: NaiveDate) -> f64 {
    let month = YearMonth::of(today);
    transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense && YearMonth::of(tx.date) == month)
        .map(|tx| tx.amount)
        .sum()
}

/// Expense totals for the `window` months ending with `today`'s month,
/// oldest first. Months without expenses report zero.
pub fn monthly_series(
    transactions: &[Transaction],
    today: NaiveDate,
    window: usize,
) -> Vec<MonthlyExpense> {
    let mut buckets: HashMap<YearMonth, f64> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
    {
        *buckets.entry(YearMonth::of(tx.date)).or_insert(0.0) += tx.amount;
    }

    let end = YearMonth::of(today);
    (0..window)
        .rev()
        .map(|back| {
            let month = end.shift(-(back as i32));
            MonthlyExpense {
                month,
                amount: buckets.get(&month).copied().unwrap_or(0.0),
            }
        })
        .collect()
}

pub fn average(series: &[MonthlyExpense]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().map(|m| m.amount).sum::<f64>() / series.len() as f64
}

/// The four headline figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    pub month_expenses: f64,
}

impl Summary {
    pub fn compute(transactions: &[Transaction], today: NaiveDate) -> Self {
        Self {
            total_income: total_income(transactions),
            total_expenses: total_expenses(transactions),
            net_balance: net_balance(transactions),
            month_expenses: current_month_expenses(transactions, today),
        }
    }
}
