use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Frequency;
use crate::period::Timestamped;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Plural resource name used by the backend routes and list envelopes.
    pub fn plural(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expenses",
            TransactionKind::Income => "incomes",
        }
    }
}

/// An expense or income record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: Option<String>,
    pub category_id: Option<String>,
    /// Raw creation timestamp as sent by the backend.
    pub created_at: Option<String>,
}

impl Transaction {
    /// Creates a new expense.
    pub fn expense(id: impl Into<String>, amount: f64, created_at: impl Into<String>) -> Self {
        Self::new(TransactionKind::Expense, id, amount, created_at)
    }

    /// Creates a new income.
    pub fn income(id: impl Into<String>, amount: f64, created_at: impl Into<String>) -> Self {
        Self::new(TransactionKind::Income, id, amount, created_at)
    }

    fn new(
        kind: TransactionKind,
        id: impl Into<String>,
        amount: f64,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            description: None,
            category_id: None,
            created_at: Some(created_at.into()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }
}

impl Timestamped for Transaction {
    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// A spending or income category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: Option<TransactionKind>,
    pub color: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: None,
            color: None,
        }
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// A spending limit for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category_id: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub period: Option<String>,
}

impl Budget {
    /// Amount left before the limit is reached (negative when exceeded).
    pub fn remaining(&self) -> f64 {
        self.amount - self.spent
    }
}

/// A savings target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl SavingsGoal {
    /// Progress toward the target, clamped to 0.0..=1.0.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 1.0;
        }
        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }
}

/// A transaction template the backend materializes on a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    pub frequency: Frequency,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub next_date: Option<NaiveDate>,
}

fn default_active() -> bool {
    true
}

impl RecurringTransaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionKind,
        amount: f64,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            description: None,
            category_id: None,
            frequency,
            active: true,
            next_date: None,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
