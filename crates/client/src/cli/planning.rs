//! Budget and savings goal CLI commands.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
pub struct BudgetsCommand {
    #[command(subcommand)]
    pub action: BudgetsAction,
}

#[derive(Debug, Subcommand)]
pub enum BudgetsAction {
    /// List budgets and how much of each is left.
    List,
}

#[derive(Debug, Parser)]
pub struct GoalsCommand {
    #[command(subcommand)]
    pub action: GoalsAction,
}

#[derive(Debug, Subcommand)]
pub enum GoalsAction {
    /// List savings goals and their progress.
    List,
}
