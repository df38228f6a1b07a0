//! Recurring transaction CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use finanzas_core::finance::Frequency;

use super::KindArg;

/// Recurring transaction commands.
#[derive(Debug, Parser)]
pub struct RecurringCommand {
    #[command(subcommand)]
    pub action: RecurringAction,
}

/// CLI frequency (with clap ValueEnum).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl From<FrequencyArg> for Frequency {
    fn from(f: FrequencyArg) -> Self {
        match f {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Biweekly => Frequency::Biweekly,
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Quarterly => Frequency::Quarterly,
            FrequencyArg::Yearly => Frequency::Yearly,
        }
    }
}

/// Available recurring transaction actions.
#[derive(Debug, Subcommand)]
pub enum RecurringAction {
    /// List recurring transactions.
    List,
    /// Create a recurring transaction.
    Create {
        /// Expense or income.
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Amount per occurrence, greater than zero.
        #[arg(long)]
        amount: f64,
        /// How often it repeats.
        #[arg(long, value_enum)]
        frequency: FrequencyArg,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// Category ID.
        #[arg(long)]
        category_id: Option<String>,
        /// First occurrence (YYYY-MM-DD).
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// Delete a recurring transaction by ID.
    Delete {
        /// Recurring transaction ID.
        id: String,
    },
    /// Materialize the next occurrence now.
    Execute {
        /// Recurring transaction ID.
        id: String,
    },
    /// Monthly cash flow of the active recurring transactions.
    Projection,
}
