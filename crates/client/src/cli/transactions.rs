//! Expense and income CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Expense or income management commands.
#[derive(Debug, Parser)]
pub struct TransactionsCommand {
    #[command(subcommand)]
    pub action: TransactionsAction,
}

/// Available expense and income actions.
#[derive(Debug, Subcommand)]
pub enum TransactionsAction {
    /// List records, optionally limited to a period.
    List {
        /// Only records from this year.
        #[arg(long)]
        year: Option<i32>,
        /// Only records from this month (1-12) of `--year`.
        #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Record a new expense or income.
    Create {
        /// Amount, greater than zero.
        #[arg(long)]
        amount: f64,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// Category ID.
        #[arg(long)]
        category_id: Option<String>,
        /// Date (YYYY-MM-DD). Defaults to today on the server.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a record by ID.
    Delete {
        /// Record ID.
        id: String,
    },
}
