use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of resource a mutation touched.
///
/// Tags outside the known set are kept verbatim in `Other` so they can be
/// broadcast unchanged; they invalidate the whole cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Expense,
    Income,
    Category,
    Budget,
    SavingsGoal,
    RecurringTransaction,
    Other(String),
}

impl ResourceType {
    /// Returns the wire tag for this resource type.
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Expense => "expense",
            ResourceType::Income => "income",
            ResourceType::Category => "category",
            ResourceType::Budget => "budget",
            ResourceType::SavingsGoal => "savings_goal",
            ResourceType::RecurringTransaction => "recurring_transaction",
            ResourceType::Other(tag) => tag,
        }
    }

    /// Returns true if this is one of the known resource tags.
    pub fn is_known(&self) -> bool {
        !matches!(self, ResourceType::Other(_))
    }
}

impl From<&str> for ResourceType {
    fn from(tag: &str) -> Self {
        match tag {
            "expense" => ResourceType::Expense,
            "income" => ResourceType::Income,
            "category" => ResourceType::Category,
            "budget" => ResourceType::Budget,
            "savings_goal" => ResourceType::SavingsGoal,
            "recurring_transaction" => ResourceType::RecurringTransaction,
            other => ResourceType::Other(other.to_string()),
        }
    }
}

impl From<String> for ResourceType {
    fn from(tag: String) -> Self {
        ResourceType::from(tag.as_str())
    }
}

impl From<ResourceType> for String {
    fn from(resource: ResourceType) -> Self {
        resource.as_str().to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a mutation of a given resource type must purge from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationScope {
    /// Drop every entry whose key contains one of these substrings.
    Patterns(&'static [&'static str]),
    /// Drop the entire cache.
    All,
}

const EXPENSE_PATTERNS: &[&str] = &["expenses", "analytics_expenses", "dashboard"];
const INCOME_PATTERNS: &[&str] = &["incomes", "analytics_incomes", "dashboard"];
const CATEGORY_PATTERNS: &[&str] = &["categories", "analytics_categories", "dashboard"];
const BUDGET_PATTERNS: &[&str] = &["budgets", "dashboard"];
const SAVINGS_GOAL_PATTERNS: &[&str] = &["savings_goals", "dashboard"];
// Executing a recurring transaction materializes either an expense or an income.
const RECURRING_PATTERNS: &[&str] = &[
    "recurring_transactions",
    "expenses",
    "incomes",
    "analytics_expenses",
    "analytics_incomes",
    "dashboard",
];

/// Returns the invalidation scope for a mutated resource type.
///
/// # Examples
///
/// ```
/// use finanzas_core::cache::{invalidation_scope, InvalidationScope, ResourceType};
///
/// assert_eq!(
///     invalidation_scope(&ResourceType::Expense),
///     InvalidationScope::Patterns(&["expenses", "analytics_expenses", "dashboard"])
/// );
/// assert_eq!(
///     invalidation_scope(&ResourceType::from("gamification")),
///     InvalidationScope::All
/// );
/// ```
pub fn invalidation_scope(resource: &ResourceType) -> InvalidationScope {
    match resource {
        ResourceType::Expense => InvalidationScope::Patterns(EXPENSE_PATTERNS),
        ResourceType::Income => InvalidationScope::Patterns(INCOME_PATTERNS),
        ResourceType::Category => InvalidationScope::Patterns(CATEGORY_PATTERNS),
        ResourceType::Budget => InvalidationScope::Patterns(BUDGET_PATTERNS),
        ResourceType::SavingsGoal => InvalidationScope::Patterns(SAVINGS_GOAL_PATTERNS),
        ResourceType::RecurringTransaction => InvalidationScope::Patterns(RECURRING_PATTERNS),
        ResourceType::Other(_) => InvalidationScope::All,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{cache_key, endpoints, key_matches};
    use serde_json::json;

    fn scope_matches(resource: &ResourceType, key: &str) -> bool {
        match invalidation_scope(resource) {
            InvalidationScope::All => true,
            InvalidationScope::Patterns(patterns) => patterns.iter().any(|p| key_matches(p, key)),
        }
    }

    #[test]
    fn test_tag_roundtrip() {
        for tag in [
            "expense",
            "income",
            "category",
            "budget",
            "savings_goal",
            "recurring_transaction",
        ] {
            let resource = ResourceType::from(tag);
            assert!(resource.is_known());
            assert_eq!(resource.as_str(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_preserved() {
        let resource = ResourceType::from("achievement");
        assert_eq!(resource, ResourceType::Other("achievement".to_string()));
        assert!(!resource.is_known());
        assert_eq!(resource.to_string(), "achievement");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&ResourceType::SavingsGoal).unwrap();
        assert_eq!(json, "\"savings_goal\"");
        let parsed: ResourceType = serde_json::from_str("\"recurring_transaction\"").unwrap();
        assert_eq!(parsed, ResourceType::RecurringTransaction);
    }

    #[test]
    fn test_expense_scope_leaves_incomes_alone() {
        let expense = ResourceType::Expense;
        assert!(scope_matches(&expense, &cache_key(endpoints::EXPENSES_LIST, &json!({}))));
        assert!(scope_matches(
            &expense,
            &cache_key(endpoints::DASHBOARD_SUMMARY, &json!({"year": 2024}))
        ));
        assert!(!scope_matches(&expense, &cache_key(endpoints::INCOMES_LIST, &json!({}))));
        assert!(!scope_matches(
            &expense,
            &cache_key(endpoints::CATEGORIES_LIST, &json!({}))
        ));
    }

    #[test]
    fn test_recurring_scope_covers_both_transaction_families() {
        let recurring = ResourceType::RecurringTransaction;
        for endpoint in [
            endpoints::EXPENSES_LIST,
            endpoints::INCOMES_LIST,
            endpoints::ANALYTICS_EXPENSES,
            endpoints::ANALYTICS_INCOMES,
            endpoints::DASHBOARD_SUMMARY,
            endpoints::RECURRING_LIST,
        ] {
            assert!(
                scope_matches(&recurring, &cache_key(endpoint, &json!({}))),
                "{endpoint} should be invalidated"
            );
        }
        assert!(!scope_matches(
            &recurring,
            &cache_key(endpoints::BUDGETS_LIST, &json!({}))
        ));
    }

    #[test]
    fn test_unknown_scope_is_everything() {
        assert_eq!(
            invalidation_scope(&ResourceType::Other("streak".to_string())),
            InvalidationScope::All
        );
    }
}
