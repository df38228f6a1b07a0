//! Category CLI commands.

use clap::{Parser, Subcommand};

use super::KindArg;

/// Category management commands.
#[derive(Debug, Parser)]
pub struct CategoriesCommand {
    #[command(subcommand)]
    pub action: CategoriesAction,
}

/// Available category actions.
#[derive(Debug, Subcommand)]
pub enum CategoriesAction {
    /// List all categories.
    List,
    /// Create a new category.
    Create {
        /// Category name.
        #[arg(long)]
        name: String,
        /// Whether the category applies to expenses or incomes.
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Optional accent color.
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category by ID.
    Delete {
        /// Category ID.
        id: String,
    },
}
