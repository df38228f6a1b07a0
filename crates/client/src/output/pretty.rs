//! Pretty output formatting.
//!
//! Monetary values go through [`PeriodResolver::format_balance`] so
//! `--hide-balances` masks them consistently.

use finanzas_core::finance::{
    Budget, Category, CategoryTotal, Dashboard, DashboardSource, MonthlyProjection,
    RecurringTransaction, SavingsGoal, Transaction, TransactionKind,
};
use finanzas_core::period::PeriodResolver;

use crate::client::{Insights, InsightsSource};
use crate::config::{Environment, EnvironmentSource, Service, ServiceUrls};

const RULE_WIDTH: usize = 40;

fn header(title: &str, count: usize) -> String {
    let mut output = format!("{} ({})\n", title, count);
    output.push_str(&"-".repeat(RULE_WIDTH));
    output
}

fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "expense",
        TransactionKind::Income => "income",
    }
}

fn format_category_totals(
    output: &mut String,
    title: &str,
    rows: &[CategoryTotal],
    resolver: &PeriodResolver,
) {
    output.push_str(&format!("\n\n{}", title));
    if rows.is_empty() {
        output.push_str("\n  (none)");
        return;
    }
    for row in rows {
        output.push_str(&format!(
            "\n  {:<24} {:>14}",
            row.category_name,
            resolver.format_balance(row.total)
        ));
    }
}

/// Format the dashboard for the resolver's selected period.
pub fn format_dashboard(dashboard: &Dashboard, resolver: &PeriodResolver) -> String {
    let summary = &dashboard.summary;
    let mut output = resolver.get_period_title();
    output.push('\n');
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push_str(&format!(
        "\n  Income:   {:>14}\n  Expenses: {:>14}\n  Balance:  {:>14}",
        resolver.format_balance(summary.total_income),
        resolver.format_balance(summary.total_expenses),
        resolver.format_balance(summary.balance),
    ));
    if let (Some(expenses), Some(incomes)) = (summary.expense_count, summary.income_count) {
        output.push_str(&format!("\n  {} expenses, {} incomes", expenses, incomes));
    }

    format_category_totals(
        &mut output,
        "Expenses by category",
        &dashboard.expenses.by_category,
        resolver,
    );
    format_category_totals(
        &mut output,
        "Incomes by category",
        &dashboard.incomes.by_category,
        resolver,
    );

    if !dashboard.expenses.by_month.is_empty() {
        output.push_str("\n\nExpenses by month");
        for month in &dashboard.expenses.by_month {
            output.push_str(&format!(
                "\n  {:<24} {:>14}",
                month.month.to_string(),
                resolver.format_balance(month.total)
            ));
        }
    }

    if dashboard.source == DashboardSource::Legacy {
        output.push_str("\n\n(aggregated locally from raw lists)");
    }
    output
}

/// Format a transaction for display.
pub fn format_transaction(transaction: &Transaction, resolver: &PeriodResolver) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}",
        resolver.format_balance(transaction.amount),
        kind_label(transaction.kind),
        transaction.id
    );
    if let Some(desc) = &transaction.description {
        output.push_str(&format!("\n  Description: {}", desc));
    }
    if let Some(category) = &transaction.category_id {
        output.push_str(&format!("\n  Category: {}", category));
    }
    if let Some(created_at) = &transaction.created_at {
        output.push_str(&format!("\n  Date: {}", created_at));
    }
    output
}

/// Format expenses or incomes for display.
pub fn format_transactions(
    kind: TransactionKind,
    transactions: &[&Transaction],
    resolver: &PeriodResolver,
) -> String {
    if transactions.is_empty() {
        return format!("No {} found.", kind.plural());
    }
    let mut output = header(&kind.plural().to_uppercase(), transactions.len());
    for transaction in transactions {
        output.push_str(&format!("\n{}", format_transaction(transaction, resolver)));
        output.push('\n');
    }
    let total: f64 = transactions.iter().map(|t| t.amount).sum();
    output.push_str(&format!("Total: {}", resolver.format_balance(total)));
    output
}

/// Format a category for display.
pub fn format_category(category: &Category) -> String {
    let mut output = format!("{}\n  ID: {}", category.name, category.id);
    if let Some(kind) = category.kind {
        output.push_str(&format!("\n  Type: {}", kind_label(kind)));
    }
    if let Some(color) = &category.color {
        output.push_str(&format!("\n  Color: {}", color));
    }
    output
}

/// Format categories for display.
pub fn format_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }
    let mut output = header("CATEGORIES", categories.len());
    for category in categories {
        output.push_str(&format!("\n{}", format_category(category)));
        output.push('\n');
    }
    output
}

/// Format a recurring transaction for display.
pub fn format_recurring_item(item: &RecurringTransaction, resolver: &PeriodResolver) -> String {
    let mut output = format!(
        "{} {} [{}]\n  ID: {}",
        resolver.format_balance(item.amount),
        item.frequency.as_str(),
        kind_label(item.kind),
        item.id
    );
    if let Some(desc) = &item.description {
        output.push_str(&format!("\n  Description: {}", desc));
    }
    if let Some(next) = item.next_date {
        output.push_str(&format!("\n  Next: {}", next));
    }
    if !item.active {
        output.push_str("\n  Paused");
    }
    output
}

/// Format recurring transactions for display.
pub fn format_recurring(items: &[RecurringTransaction], resolver: &PeriodResolver) -> String {
    if items.is_empty() {
        return "No recurring transactions found.".to_string();
    }
    let mut output = header("RECURRING", items.len());
    for item in items {
        output.push_str(&format!("\n{}", format_recurring_item(item, resolver)));
        output.push('\n');
    }
    output
}

/// Format the monthly recurring cash flow.
pub fn format_projection(projection: &MonthlyProjection, resolver: &PeriodResolver) -> String {
    format!(
        "Monthly recurring\n{}\n  Income:   {:>14}\n  Expenses: {:>14}\n  Net:      {:>14}",
        "-".repeat(RULE_WIDTH),
        resolver.format_balance(projection.income),
        resolver.format_balance(projection.expenses),
        resolver.format_balance(projection.net),
    )
}

/// Format budgets for display.
pub fn format_budgets(budgets: &[Budget], resolver: &PeriodResolver) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }
    let mut output = header("BUDGETS", budgets.len());
    for budget in budgets {
        output.push_str(&format!(
            "\n{} of {}\n  ID: {}\n  Remaining: {}",
            resolver.format_balance(budget.spent),
            resolver.format_balance(budget.amount),
            budget.id,
            resolver.format_balance(budget.remaining()),
        ));
        if let Some(category) = &budget.category_id {
            output.push_str(&format!("\n  Category: {}", category));
        }
        output.push('\n');
    }
    output
}

/// Format savings goals for display.
pub fn format_goals(goals: &[SavingsGoal], resolver: &PeriodResolver) -> String {
    if goals.is_empty() {
        return "No savings goals found.".to_string();
    }
    let mut output = header("GOALS", goals.len());
    for goal in goals {
        output.push_str(&format!(
            "\n{} ({:.0}%)\n  ID: {}\n  Saved: {} of {}",
            goal.name,
            goal.progress() * 100.0,
            goal.id,
            resolver.format_balance(goal.current_amount),
            resolver.format_balance(goal.target_amount),
        ));
        if let Some(deadline) = goal.deadline {
            output.push_str(&format!("\n  Deadline: {}", deadline));
        }
        output.push('\n');
    }
    output
}

/// Format insights for display.
pub fn format_insights(insights: &Insights) -> String {
    let mut output = insights.summary.clone();
    for tip in &insights.tips {
        output.push_str(&format!("\n  - {}", tip));
    }
    if insights.source == InsightsSource::Fallback {
        output.push_str("\n(AI service unavailable)");
    }
    output
}

/// Format the periods with data and the current selection.
pub fn format_periods(resolver: &PeriodResolver) -> String {
    let mut output = format!("Selected: {}", resolver.get_period_title());
    output.push('\n');
    output.push_str(&"-".repeat(RULE_WIDTH));
    for year in resolver.available_years() {
        let months: Vec<String> = resolver
            .available_months()
            .iter()
            .filter(|ym| ym.year() == *year)
            .map(|ym| format!("{:02}", ym.month()))
            .collect();
        output.push_str(&format!("\n{}: {}", year, months.join(" ")));
    }
    output
}

/// Format the resolved environment and its service URLs.
pub fn format_environment(
    environment: Environment,
    source: EnvironmentSource,
    urls: &ServiceUrls,
) -> String {
    let source = match source {
        EnvironmentSource::Explicit => "explicit",
        EnvironmentSource::Forced => "forced",
        EnvironmentSource::Detected => "detected",
    };
    let mut output = format!("{} ({})\n", environment, source);
    output.push_str(&"-".repeat(RULE_WIDTH));
    for service in Service::ALL {
        output.push_str(&format!("\n  {:<14} {}", service.as_str(), urls.get(service)));
    }
    output
}
