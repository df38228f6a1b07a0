use serde_json::Value;

/// Endpoint identifiers used as cache key prefixes.
///
/// Invalidation works by substring, so every identifier embeds the name of
/// the resource family it belongs to (`expenses`, `incomes`, ...).
pub mod endpoints {
    pub const EXPENSES_LIST: &str = "expenses_list";
    pub const INCOMES_LIST: &str = "incomes_list";
    pub const CATEGORIES_LIST: &str = "categories_list";
    pub const CATEGORIES_DROPDOWN: &str = "categories_dropdown";
    pub const BUDGETS_LIST: &str = "budgets_list";
    pub const SAVINGS_GOALS_LIST: &str = "savings_goals_list";
    pub const RECURRING_LIST: &str = "recurring_transactions_list";
    pub const DASHBOARD_SUMMARY: &str = "dashboard_summary";
    pub const ANALYTICS_EXPENSES: &str = "analytics_expenses";
    pub const ANALYTICS_INCOMES: &str = "analytics_incomes";
    pub const ANALYTICS_CATEGORIES: &str = "analytics_categories";
}

/// File name of the shared slot other processes watch for change notifications.
pub const CHANGE_SLOT_FILE: &str = "data-changed.json";

/// Returns the cache key for an endpoint and its query parameters.
///
/// Object keys are sorted at every nesting level, so two parameter objects
/// with the same entries always produce the same key regardless of the
/// order they were built in.
///
/// # Examples
///
/// ```
/// use finanzas_core::cache::cache_key;
/// use serde_json::json;
///
/// let a = cache_key("expenses_list", &json!({"year": 2024, "month": 1}));
/// let b = cache_key("expenses_list", &json!({"month": 1, "year": 2024}));
/// assert_eq!(a, b);
/// assert_eq!(cache_key("expenses_list", &json!({})), "expenses_list_{}");
/// ```
pub fn cache_key(endpoint_id: &str, params: &Value) -> String {
    format!("{}_{}", endpoint_id, canonical_params(params))
}

/// Serializes a JSON value with object keys in sorted order.
///
/// `null` is rendered as `{}` so that "no parameters" and "empty
/// parameters" share a key.
pub fn canonical_params(params: &Value) -> String {
    let mut out = String::new();
    match params {
        Value::Null => out.push_str("{}"),
        other => write_canonical(other, &mut out),
    }
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn test_empty_params() {
        assert_eq!(cache_key("incomes_list", &json!({})), "incomes_list_{}");
        assert_eq!(cache_key("incomes_list", &Value::Null), "incomes_list_{}");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut first = Map::new();
        first.insert("year".to_string(), json!(2024));
        first.insert("month".to_string(), json!(3));
        first.insert("category".to_string(), json!("food"));

        let mut second = Map::new();
        second.insert("category".to_string(), json!("food"));
        second.insert("month".to_string(), json!(3));
        second.insert("year".to_string(), json!(2024));

        assert_eq!(
            cache_key("analytics_expenses", &Value::Object(first)),
            cache_key("analytics_expenses", &Value::Object(second))
        );
    }

    #[test]
    fn test_different_values_produce_different_keys() {
        let a = cache_key("dashboard_summary", &json!({"year": 2024, "month": 1}));
        let b = cache_key("dashboard_summary", &json!({"year": 2024, "month": 2}));
        let c = cache_key("dashboard_summary", &json!({"year": "2024", "month": 1}));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_different_endpoints_produce_different_keys() {
        let params = json!({"year": 2024});
        assert_ne!(
            cache_key("analytics_expenses", &params),
            cache_key("analytics_incomes", &params)
        );
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let key = cache_key("x", &json!({"b": {"z": 1, "a": [ {"d": 1, "c": 2} ]}, "a": null}));
        assert_eq!(key, r#"x_{"a":null,"b":{"a":[{"c":2,"d":1}],"z":1}}"#);
    }

    #[test]
    fn test_string_values_are_escaped() {
        let key = cache_key("x", &json!({"q": "a\"b"}));
        assert_eq!(key, r#"x_{"q":"a\"b"}"#);
    }

    #[test]
    fn test_endpoint_ids_contain_their_family() {
        assert!(endpoints::EXPENSES_LIST.contains("expenses"));
        assert!(endpoints::ANALYTICS_EXPENSES.contains("analytics_expenses"));
        assert!(endpoints::INCOMES_LIST.contains("incomes"));
        assert!(endpoints::CATEGORIES_DROPDOWN.contains("categories"));
        assert!(endpoints::RECURRING_LIST.contains("recurring_transactions"));
        assert!(endpoints::DASHBOARD_SUMMARY.contains("dashboard"));
    }
}
