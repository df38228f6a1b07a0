//! Pure matching functions for cache invalidation.
//!
//! Invalidation patterns are plain substrings, not globs: a key matches when
//! it contains the pattern anywhere.

/// Checks if a cache key matches an invalidation pattern.
///
/// # Examples
///
/// ```
/// use finanzas_core::cache::key_matches;
///
/// assert!(key_matches("expenses", "expenses_list_{}"));
/// assert!(key_matches("expenses", "analytics_expenses_{\"year\":2024}"));
/// assert!(!key_matches("expenses", "incomes_list_{}"));
/// ```
pub fn key_matches(pattern: &str, key: &str) -> bool {
    key.contains(pattern)
}

/// Returns the keys that match a pattern, preserving input order.
pub fn matching_keys<'a, I>(keys: I, pattern: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    keys.into_iter()
        .filter(|key| key_matches(pattern, key))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_anywhere() {
        assert!(key_matches("dashboard", "dashboard_summary_{}"));
        assert!(key_matches("summary", "dashboard_summary_{}"));
        assert!(key_matches("{}", "dashboard_summary_{}"));
    }

    #[test]
    fn test_no_match() {
        assert!(!key_matches("expenses", "incomes_list_{}"));
        assert!(!key_matches("budgets", "savings_goals_list_{}"));
    }

    #[test]
    fn test_no_wildcard_semantics() {
        // '*' is a literal character here
        assert!(!key_matches("expenses*", "expenses_list_{}"));
        assert!(!key_matches("*", "expenses_list_{}"));
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        assert!(key_matches("", "anything"));
        assert!(key_matches("", ""));
    }

    #[test]
    fn test_matching_keys() {
        let keys = vec![
            "expenses_list_{}".to_string(),
            "incomes_list_{}".to_string(),
            "analytics_expenses_{\"year\":2024}".to_string(),
        ];
        let matched = matching_keys(&keys, "expenses");
        assert_eq!(
            matched,
            vec![
                "expenses_list_{}".to_string(),
                "analytics_expenses_{\"year\":2024}".to_string()
            ]
        );
    }
}
