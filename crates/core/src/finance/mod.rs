//! Finance domain records, backend schema adapters and pure aggregations.

mod adapters;
mod dashboard;
mod error;
mod recurring;
mod types;

pub use adapters::{
    adapt_budgets, adapt_categories, adapt_category, adapt_category_usage, adapt_recurring,
    adapt_savings_goals, adapt_summary, adapt_transaction, adapt_transaction_analytics,
    adapt_transactions, SchemaVersion,
};
pub use dashboard::{
    aggregate_dashboard, CategoryTotal, CategoryUsage, Dashboard, DashboardSource,
    DashboardSummary, MonthTotal, TransactionAnalytics, UNCATEGORIZED,
};
pub use error::{AdapterError, Result};
pub use recurring::{monthly_amount, next_occurrence, project_monthly, Frequency, MonthlyProjection};
pub use types::{Budget, Category, RecurringTransaction, SavingsGoal, Transaction, TransactionKind};
