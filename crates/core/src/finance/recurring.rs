//! Monthly cash-flow projection for recurring transactions.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{RecurringTransaction, TransactionKind};

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    #[serde(alias = "bi-weekly", alias = "fortnightly")]
    Biweekly,
    Monthly,
    Quarterly,
    #[serde(alias = "annual", alias = "annually")]
    Yearly,
}

impl Frequency {
    /// Number of occurrences in an average month.
    pub fn monthly_factor(&self) -> f64 {
        match self {
            Frequency::Daily => 30.0,
            Frequency::Weekly => 52.0 / 12.0,
            Frequency::Biweekly => 26.0 / 12.0,
            Frequency::Monthly => 1.0,
            Frequency::Quarterly => 1.0 / 3.0,
            Frequency::Yearly => 1.0 / 12.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// Projected recurring cash flow for one month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Returns the monthly equivalent of a recurring transaction's amount.
pub fn monthly_amount(item: &RecurringTransaction) -> f64 {
    item.amount * item.frequency.monthly_factor()
}

/// Projects monthly income, expenses and net from the active items.
pub fn project_monthly(items: &[RecurringTransaction]) -> MonthlyProjection {
    let (income, expenses) = items
        .iter()
        .filter(|item| item.active)
        .fold((0.0, 0.0), |(income, expenses), item| match item.kind {
            TransactionKind::Income => (income + monthly_amount(item), expenses),
            TransactionKind::Expense => (income, expenses + monthly_amount(item)),
        });

    MonthlyProjection {
        income,
        expenses,
        net: income - expenses,
    }
}

/// Returns the date one period after `date`.
///
/// Month-based frequencies clamp to the last day of shorter months
/// (Jan 31 + 1 month = Feb 28/29).
pub fn next_occurrence(date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => date.checked_add_days(Days::new(1)),
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Biweekly => date.checked_add_days(Days::new(14)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Quarterly => date.checked_add_months(Months::new(3)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    }
}
