use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{Category, Transaction};
use crate::period::{filter_by_period, Period, Timestamped, YearMonth};

/// Label used for transactions without a known category.
pub const UNCATEGORIZED: &str = "Sin categoría";

/// Headline totals for the selected period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub expense_count: Option<u64>,
    pub income_count: Option<u64>,
}

/// Total amount attributed to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Option<String>,
    pub category_name: String,
    pub total: f64,
}

/// Total amount for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: YearMonth,
    pub total: f64,
}

/// Breakdown of expenses or incomes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionAnalytics {
    /// Sorted by total, largest first.
    pub by_category: Vec<CategoryTotal>,
    /// Sorted chronologically.
    pub by_month: Vec<MonthTotal>,
}

/// How much a category is used across both transaction kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub category_id: Option<String>,
    pub category_name: String,
    pub transaction_count: u64,
    pub total: f64,
}

/// Which load path produced a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSource {
    /// Backend-side aggregation endpoints.
    Optimized,
    /// Raw lists aggregated client-side.
    Legacy,
}

/// Normalized dashboard data, independent of the backend schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub expenses: TransactionAnalytics,
    pub incomes: TransactionAnalytics,
    pub category_usage: Vec<CategoryUsage>,
    pub categories: Vec<Category>,
    pub source: DashboardSource,
}

/// Builds a dashboard from raw lists, filtering by period client-side.
pub fn aggregate_dashboard(
    expenses: &[Transaction],
    incomes: &[Transaction],
    categories: &[Category],
    period: &Period,
) -> Dashboard {
    let names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let expenses = filter_by_period(expenses, period);
    let incomes = filter_by_period(incomes, period);

    let total_expenses: f64 = expenses.iter().map(|t| t.amount).sum();
    let total_income: f64 = incomes.iter().map(|t| t.amount).sum();

    let usage = {
        let mut all = expenses.clone();
        all.extend(incomes.iter().copied());
        category_usage(&all, &names)
    };

    Dashboard {
        summary: DashboardSummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            expense_count: Some(expenses.len() as u64),
            income_count: Some(incomes.len() as u64),
        },
        expenses: analytics(&expenses, &names),
        incomes: analytics(&incomes, &names),
        category_usage: usage,
        categories: categories.to_vec(),
        source: DashboardSource::Legacy,
    }
}

fn category_name(names: &HashMap<&str, &str>, id: Option<&str>) -> String {
    id.and_then(|id| names.get(id))
        .map(|name| name.to_string())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn analytics(records: &[&Transaction], names: &HashMap<&str, &str>) -> TransactionAnalytics {
    let mut by_category: BTreeMap<Option<&str>, f64> = BTreeMap::new();
    let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for record in records {
        *by_category
            .entry(record.category_id.as_deref())
            .or_default() += record.amount;
        if let Some(date) = record.created_date() {
            *by_month.entry(YearMonth::from_date(date)).or_default() += record.amount;
        }
    }

    let mut by_category: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(id, total)| CategoryTotal {
            category_id: id.map(str::to_string),
            category_name: category_name(names, id),
            total,
        })
        .collect();
    by_category.sort_by(|a, b| b.total.total_cmp(&a.total));

    TransactionAnalytics {
        by_category,
        by_month: by_month
            .into_iter()
            .map(|(month, total)| MonthTotal { month, total })
            .collect(),
    }
}

fn category_usage(records: &[&Transaction], names: &HashMap<&str, &str>) -> Vec<CategoryUsage> {
    let mut usage: BTreeMap<Option<&str>, (u64, f64)> = BTreeMap::new();
    for record in records {
        let slot = usage.entry(record.category_id.as_deref()).or_default();
        slot.0 += 1;
        slot.1 += record.amount;
    }

    let mut usage: Vec<CategoryUsage> = usage
        .into_iter()
        .map(|(id, (count, total))| CategoryUsage {
            category_id: id.map(str::to_string),
            category_name: category_name(names, id),
            transaction_count: count,
            total,
        })
        .collect();
    usage.sort_by(|a, b| b.transaction_count.cmp(&a.transaction_count));
    usage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn fixtures() -> (Vec<Transaction>, Vec<Transaction>, Vec<Category>) {
        let expenses = vec![
            Transaction::expense("e1", 100.0, "2024-01-05").with_category("food"),
            Transaction::expense("e2", 50.5, "2024-01-20").with_category("food"),
            Transaction::expense("e3", 25.25, "2024-02-01").with_category("transport"),
            Transaction::expense("e4", 10.0, "2023-12-31"),
            Transaction::expense("e5", 999.0, "not-a-date").with_category("food"),
        ];
        let incomes = vec![
            Transaction::income("i1", 2000.0, "2024-01-01").with_category("salary"),
            Transaction::income("i2", 300.0, "2024-02-15"),
        ];
        let categories = vec![
            Category::new("food", "Comida"),
            Category::new("transport", "Transporte"),
            Category::new("salary", "Salario"),
        ];
        (expenses, incomes, categories)
    }

    #[test]
    fn test_month_filter() {
        let (expenses, incomes, categories) = fixtures();
        let dashboard =
            aggregate_dashboard(&expenses, &incomes, &categories, &Period::Month(ym(2024, 1)));

        assert_eq!(dashboard.source, DashboardSource::Legacy);
        assert_eq!(dashboard.summary.total_expenses, 150.5);
        assert_eq!(dashboard.summary.total_income, 2000.0);
        assert_eq!(dashboard.summary.balance, 1849.5);
        assert_eq!(dashboard.summary.expense_count, Some(2));
        assert_eq!(dashboard.summary.income_count, Some(1));

        assert_eq!(dashboard.expenses.by_category.len(), 1);
        assert_eq!(dashboard.expenses.by_category[0].category_name, "Comida");
        assert_eq!(
            dashboard.expenses.by_month,
            vec![MonthTotal {
                month: ym(2024, 1),
                total: 150.5
            }]
        );
    }

    #[test]
    fn test_year_filter_and_uncategorized() {
        let (expenses, incomes, categories) = fixtures();
        let dashboard =
            aggregate_dashboard(&expenses, &incomes, &categories, &Period::Year(2023));

        assert_eq!(dashboard.summary.total_expenses, 10.0);
        assert_eq!(dashboard.summary.total_income, 0.0);
        assert_eq!(dashboard.expenses.by_category[0].category_name, UNCATEGORIZED);
        assert_eq!(dashboard.expenses.by_category[0].category_id, None);
    }

    #[test]
    fn test_all_periods_includes_undated_records() {
        let (expenses, incomes, categories) = fixtures();
        let dashboard = aggregate_dashboard(&expenses, &incomes, &categories, &Period::All);

        assert_eq!(dashboard.summary.expense_count, Some(5));
        // Undated records count toward totals but not toward any month
        let month_total: f64 = dashboard.expenses.by_month.iter().map(|m| m.total).sum();
        assert_eq!(month_total, 185.75);
        assert_eq!(dashboard.expenses.by_category[0].category_name, "Comida");
        assert_eq!(dashboard.expenses.by_category[0].total, 1149.5);
    }

    #[test]
    fn test_category_usage_counts_both_kinds() {
        let (expenses, incomes, categories) = fixtures();
        let dashboard = aggregate_dashboard(&expenses, &incomes, &categories, &Period::Year(2024));

        let uncategorized = dashboard
            .category_usage
            .iter()
            .find(|u| u.category_id.is_none())
            .unwrap();
        assert_eq!(uncategorized.transaction_count, 1);
        assert_eq!(uncategorized.total, 300.0);

        let food = dashboard
            .category_usage
            .iter()
            .find(|u| u.category_id.as_deref() == Some("food"))
            .unwrap();
        assert_eq!(food.transaction_count, 2);
        assert_eq!(dashboard.category_usage[0].category_name, "Comida");
    }
}
