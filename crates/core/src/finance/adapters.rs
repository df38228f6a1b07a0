//! Backend payload adapters.
//!
//! The finance backend has served two wire schemas over time: the current
//! snake_case one and a legacy PascalCase one (`CategoryID`, `TotalIncome`,
//! ...). Each entity has one explicit mapping per version. The version is
//! detected from a marker field; a payload matching neither is rejected with
//! [`AdapterError::UnknownSchema`] instead of being defaulted field by field.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{
    AdapterError, Budget, Category, CategoryTotal, CategoryUsage, DashboardSummary, MonthTotal,
    RecurringTransaction, Result, SavingsGoal, Transaction, TransactionAnalytics, TransactionKind,
};
use crate::period::YearMonth;

/// Wire schema generation of a backend payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// snake_case field names.
    Current,
    /// PascalCase field names with `ID` suffixes.
    Legacy,
}

impl SchemaVersion {
    /// Detects the schema of an object from one marker field per version.
    fn detect(
        entity: &'static str,
        object: &Map<String, Value>,
        current: &[&str],
        legacy: &[&str],
    ) -> Result<Self> {
        if current.iter().any(|field| object.contains_key(*field)) {
            Ok(SchemaVersion::Current)
        } else if legacy.iter().any(|field| object.contains_key(*field)) {
            Ok(SchemaVersion::Legacy)
        } else {
            let mut fields: Vec<&str> = object.keys().map(String::as_str).collect();
            fields.sort_unstable();
            Err(AdapterError::UnknownSchema {
                entity,
                fields: fields.join(", "),
            })
        }
    }
}

/// Identifiers arrive as numbers from some endpoints and strings from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

/// Amounts arrive as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Number(f64),
    Text(String),
}

impl WireAmount {
    fn into_f64(self, entity: &'static str) -> Result<f64> {
        match self {
            WireAmount::Number(n) => Ok(n),
            WireAmount::Text(s) => s.trim().parse().map_err(|_| AdapterError::Malformed {
                entity,
                message: format!("invalid amount {s:?}"),
            }),
        }
    }
}

fn optional_amount(entity: &'static str, amount: Option<WireAmount>) -> Result<Option<f64>> {
    amount.map(|a| a.into_f64(entity)).transpose()
}

fn parse_kind(entity: &'static str, kind: Option<String>) -> Result<Option<TransactionKind>> {
    match kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("") => Ok(None),
        Some("expense") | Some("expenses") | Some("gasto") => Ok(Some(TransactionKind::Expense)),
        Some("income") | Some("incomes") | Some("ingreso") => Ok(Some(TransactionKind::Income)),
        Some(other) => Err(AdapterError::Malformed {
            entity,
            message: format!("unknown transaction type {other:?}"),
        }),
    }
}

fn as_object<'a>(entity: &'static str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or(AdapterError::UnexpectedShape {
        entity,
        expected: "an object",
    })
}

fn decode<T: DeserializeOwned>(entity: &'static str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| AdapterError::Malformed {
        entity,
        message: e.to_string(),
    })
}

/// Unwraps a list payload: a bare array, or an object carrying the array
/// under `data` or under the resource's plural name.
fn list_items<'a>(entity: &'static str, value: &'a Value, key: &str) -> Result<&'a [Value]> {
    let list = match value {
        Value::Array(items) => Some(items),
        Value::Object(object) => object
            .get("data")
            .or_else(|| object.get(key))
            .and_then(Value::as_array),
        _ => None,
    };
    list.map(Vec::as_slice).ok_or(AdapterError::UnexpectedShape {
        entity,
        expected: "a list",
    })
}

// Categories

#[derive(Deserialize)]
struct CategoryCurrent {
    category_id: WireId,
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CategoryLegacy {
    #[serde(rename = "CategoryID")]
    category_id: WireId,
    name: String,
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

/// Adapts a single category object.
pub fn adapt_category(value: &Value) -> Result<Category> {
    const ENTITY: &str = "category";
    let object = as_object(ENTITY, value)?;
    let (id, name, kind, color) =
        match SchemaVersion::detect(ENTITY, object, &["category_id"], &["CategoryID"])? {
            SchemaVersion::Current => {
                let c: CategoryCurrent = decode(ENTITY, value)?;
                (c.category_id, c.name, c.kind, c.color)
            }
            SchemaVersion::Legacy => {
                let c: CategoryLegacy = decode(ENTITY, value)?;
                (c.category_id, c.name, c.kind, c.color)
            }
        };

    Ok(Category {
        id: id.into(),
        name,
        kind: parse_kind(ENTITY, kind)?,
        color,
    })
}

/// Adapts a category list payload.
pub fn adapt_categories(value: &Value) -> Result<Vec<Category>> {
    list_items("categories", value, "categories")?
        .iter()
        .map(adapt_category)
        .collect()
}

// Expenses and incomes

#[derive(Deserialize)]
struct TransactionCurrent {
    id: WireId,
    amount: WireAmount,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category_id: Option<WireId>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TransactionLegacy {
    #[serde(rename = "ExpenseID", alias = "IncomeID")]
    id: WireId,
    amount: WireAmount,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "CategoryID", default)]
    category_id: Option<WireId>,
    #[serde(default)]
    created_at: Option<String>,
}

fn legacy_id_field(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "ExpenseID",
        TransactionKind::Income => "IncomeID",
    }
}

/// Adapts a single expense or income object.
pub fn adapt_transaction(value: &Value, kind: TransactionKind) -> Result<Transaction> {
    let entity = kind.plural();
    let object = as_object(entity, value)?;
    let raw = match SchemaVersion::detect(entity, object, &["id"], &[legacy_id_field(kind)])? {
        SchemaVersion::Current => {
            let t: TransactionCurrent = decode(entity, value)?;
            (t.id, t.amount, t.description, t.category_id, t.created_at)
        }
        SchemaVersion::Legacy => {
            let t: TransactionLegacy = decode(entity, value)?;
            (t.id, t.amount, t.description, t.category_id, t.created_at)
        }
    };
    let (id, amount, description, category_id, created_at) = raw;

    Ok(Transaction {
        id: id.into(),
        kind,
        amount: amount.into_f64(entity)?,
        description,
        category_id: category_id.map(String::from),
        created_at,
    })
}

/// Adapts an expense or income list payload.
pub fn adapt_transactions(value: &Value, kind: TransactionKind) -> Result<Vec<Transaction>> {
    list_items(kind.plural(), value, kind.plural())?
        .iter()
        .map(|item| adapt_transaction(item, kind))
        .collect()
}

// Dashboard summary

#[derive(Deserialize)]
struct SummaryCurrent {
    total_income: WireAmount,
    total_expenses: WireAmount,
    #[serde(default)]
    balance: Option<WireAmount>,
    #[serde(default)]
    expense_count: Option<u64>,
    #[serde(default)]
    income_count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SummaryLegacy {
    total_income: WireAmount,
    total_expenses: WireAmount,
    #[serde(default)]
    balance: Option<WireAmount>,
}

/// Adapts the dashboard summary. A missing balance is derived from the totals.
pub fn adapt_summary(value: &Value) -> Result<DashboardSummary> {
    const ENTITY: &str = "dashboard summary";
    let object = as_object(ENTITY, value)?;
    let (income, expenses, balance, expense_count, income_count) =
        match SchemaVersion::detect(ENTITY, object, &["total_income"], &["TotalIncome"])? {
            SchemaVersion::Current => {
                let s: SummaryCurrent = decode(ENTITY, value)?;
                (
                    s.total_income,
                    s.total_expenses,
                    s.balance,
                    s.expense_count,
                    s.income_count,
                )
            }
            SchemaVersion::Legacy => {
                let s: SummaryLegacy = decode(ENTITY, value)?;
                (s.total_income, s.total_expenses, s.balance, None, None)
            }
        };

    let total_income = income.into_f64(ENTITY)?;
    let total_expenses = expenses.into_f64(ENTITY)?;
    let balance = optional_amount(ENTITY, balance)?.unwrap_or(total_income - total_expenses);

    Ok(DashboardSummary {
        total_income,
        total_expenses,
        balance,
        expense_count,
        income_count,
    })
}

// Analytics

#[derive(Deserialize)]
struct CategoryTotalCurrent {
    #[serde(default)]
    category_id: Option<WireId>,
    category_name: String,
    total: WireAmount,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CategoryTotalLegacy {
    #[serde(rename = "CategoryID", default)]
    category_id: Option<WireId>,
    category_name: String,
    total: WireAmount,
}

#[derive(Deserialize)]
struct MonthTotalCurrent {
    month: YearMonth,
    total: WireAmount,
}

#[derive(Deserialize)]
struct AnalyticsCurrent {
    by_category: Vec<CategoryTotalCurrent>,
    #[serde(default)]
    by_month: Vec<MonthTotalCurrent>,
}

fn category_total(
    entity: &'static str,
    id: Option<WireId>,
    name: String,
    total: WireAmount,
) -> Result<CategoryTotal> {
    Ok(CategoryTotal {
        category_id: id.map(String::from),
        category_name: name,
        total: total.into_f64(entity)?,
    })
}

/// Adapts an expense or income analytics payload.
///
/// The current schema is an object with `by_category` and `by_month`; the
/// legacy schema is a list of per-category rows without a monthly breakdown.
pub fn adapt_transaction_analytics(
    value: &Value,
    kind: TransactionKind,
) -> Result<TransactionAnalytics> {
    let entity = match kind {
        TransactionKind::Expense => "expense analytics",
        TransactionKind::Income => "income analytics",
    };

    let mut analytics = match value {
        Value::Object(object) if object.contains_key("by_category") => {
            let a: AnalyticsCurrent = decode(entity, value)?;
            TransactionAnalytics {
                by_category: a
                    .by_category
                    .into_iter()
                    .map(|row| category_total(entity, row.category_id, row.category_name, row.total))
                    .collect::<Result<_>>()?,
                by_month: a
                    .by_month
                    .into_iter()
                    .map(|row| -> Result<MonthTotal> {
                        Ok(MonthTotal {
                            month: row.month,
                            total: row.total.into_f64(entity)?,
                        })
                    })
                    .collect::<Result<_>>()?,
            }
        }
        _ => {
            let rows = list_items(entity, value, kind.plural())?;
            let mut by_category = Vec::with_capacity(rows.len());
            for row in rows {
                let object = as_object(entity, row)?;
                SchemaVersion::detect(entity, object, &[], &["CategoryName"])?;
                let r: CategoryTotalLegacy = decode(entity, row)?;
                by_category.push(category_total(entity, r.category_id, r.category_name, r.total)?);
            }
            TransactionAnalytics {
                by_category,
                by_month: Vec::new(),
            }
        }
    };

    analytics
        .by_category
        .sort_by(|a, b| b.total.total_cmp(&a.total));
    analytics.by_month.sort_by_key(|m| m.month);
    Ok(analytics)
}

#[derive(Deserialize)]
struct UsageCurrent {
    #[serde(default)]
    category_id: Option<WireId>,
    category_name: String,
    transaction_count: u64,
    total: WireAmount,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UsageLegacy {
    #[serde(rename = "CategoryID", default)]
    category_id: Option<WireId>,
    category_name: String,
    transaction_count: u64,
    total: WireAmount,
}

/// Adapts the category analytics payload into usage rows.
pub fn adapt_category_usage(value: &Value) -> Result<Vec<CategoryUsage>> {
    const ENTITY: &str = "category analytics";
    list_items(ENTITY, value, "categories")?
        .iter()
        .map(|row| -> Result<CategoryUsage> {
            let object = as_object(ENTITY, row)?;
            let (id, name, count, total) =
                match SchemaVersion::detect(ENTITY, object, &["category_name"], &["CategoryName"])?
                {
                    SchemaVersion::Current => {
                        let u: UsageCurrent = decode(ENTITY, row)?;
                        (u.category_id, u.category_name, u.transaction_count, u.total)
                    }
                    SchemaVersion::Legacy => {
                        let u: UsageLegacy = decode(ENTITY, row)?;
                        (u.category_id, u.category_name, u.transaction_count, u.total)
                    }
                };
            Ok(CategoryUsage {
                category_id: id.map(String::from),
                category_name: name,
                transaction_count: count,
                total: total.into_f64(ENTITY)?,
            })
        })
        .collect()
}

// Planning resources only exist in the current schema.

pub fn adapt_budgets(value: &Value) -> Result<Vec<Budget>> {
    list_items("budgets", value, "budgets")?
        .iter()
        .map(|item| decode("budget", item))
        .collect()
}

pub fn adapt_savings_goals(value: &Value) -> Result<Vec<SavingsGoal>> {
    list_items("savings goals", value, "savings_goals")?
        .iter()
        .map(|item| decode("savings goal", item))
        .collect()
}

pub fn adapt_recurring(value: &Value) -> Result<Vec<RecurringTransaction>> {
    list_items("recurring transactions", value, "recurring_transactions")?
        .iter()
        .map(|item| decode("recurring transaction", item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::Frequency;
    use serde_json::json;

    #[test]
    fn test_category_both_schemas() {
        let current = adapt_category(&json!({
            "category_id": 7,
            "name": "Comida",
            "type": "expense",
            "color": "#ff0000"
        }))
        .unwrap();
        let legacy = adapt_category(&json!({
            "CategoryID": "7",
            "Name": "Comida",
            "Type": "Expense",
            "Color": "#ff0000"
        }))
        .unwrap();

        assert_eq!(current, legacy);
        assert_eq!(current.id, "7");
        assert_eq!(current.kind, Some(TransactionKind::Expense));
    }

    #[test]
    fn test_unknown_category_schema_is_rejected() {
        let err = adapt_category(&json!({"catId": 1, "label": "x"})).unwrap_err();
        assert_eq!(
            err,
            AdapterError::UnknownSchema {
                entity: "category",
                fields: "catId, label".to_string(),
            }
        );
    }

    #[test]
    fn test_category_with_marker_but_missing_name_is_malformed() {
        let err = adapt_category(&json!({"category_id": 1})).unwrap_err();
        assert!(matches!(err, AdapterError::Malformed { entity: "category", .. }));
    }

    #[test]
    fn test_categories_envelopes() {
        let bare = json!([{"category_id": 1, "name": "A"}]);
        let data = json!({"data": [{"category_id": 1, "name": "A"}]});
        let named = json!({"categories": [{"CategoryID": 1, "Name": "A"}]});

        assert_eq!(adapt_categories(&bare).unwrap().len(), 1);
        assert_eq!(adapt_categories(&data).unwrap().len(), 1);
        assert_eq!(adapt_categories(&named).unwrap()[0].name, "A");
        assert_eq!(
            adapt_categories(&json!({"items": []})).unwrap_err(),
            AdapterError::UnexpectedShape {
                entity: "categories",
                expected: "a list",
            }
        );
    }

    #[test]
    fn test_transactions_both_schemas() {
        let current = adapt_transaction(
            &json!({
                "id": 1,
                "amount": "12.50",
                "description": "Pan",
                "category_id": 3,
                "created_at": "2024-01-10T08:00:00Z"
            }),
            TransactionKind::Expense,
        )
        .unwrap();
        let legacy = adapt_transaction(
            &json!({
                "ExpenseID": 1,
                "Amount": 12.5,
                "Description": "Pan",
                "CategoryID": "3",
                "CreatedAt": "2024-01-10T08:00:00Z"
            }),
            TransactionKind::Expense,
        )
        .unwrap();

        assert_eq!(current, legacy);
        assert_eq!(current.amount, 12.5);
        assert_eq!(current.category_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_legacy_income_requires_income_id() {
        let income = adapt_transaction(
            &json!({"IncomeID": 9, "Amount": 100}),
            TransactionKind::Income,
        )
        .unwrap();
        assert_eq!(income.id, "9");
        assert_eq!(income.kind, TransactionKind::Income);

        let err = adapt_transaction(
            &json!({"ExpenseID": 9, "Amount": 100}),
            TransactionKind::Income,
        )
        .unwrap_err();
        assert!(matches!(err, AdapterError::UnknownSchema { entity: "incomes", .. }));
    }

    #[test]
    fn test_invalid_amount_is_malformed() {
        let err = adapt_transaction(
            &json!({"id": 1, "amount": "doce"}),
            TransactionKind::Expense,
        )
        .unwrap_err();
        assert!(matches!(err, AdapterError::Malformed { entity: "expenses", .. }));
    }

    #[test]
    fn test_transactions_list() {
        let payload = json!({"incomes": [
            {"id": 1, "amount": 10},
            {"IncomeID": 2, "Amount": 20}
        ]});
        let incomes = adapt_transactions(&payload, TransactionKind::Income).unwrap();
        assert_eq!(incomes.len(), 2);
        assert_eq!(incomes[1].id, "2");
    }

    #[test]
    fn test_summary_both_schemas() {
        let current = adapt_summary(&json!({
            "total_income": 1000,
            "total_expenses": 250.5,
            "expense_count": 3,
            "income_count": 1
        }))
        .unwrap();
        assert_eq!(current.balance, 749.5);
        assert_eq!(current.expense_count, Some(3));

        let legacy = adapt_summary(&json!({
            "TotalIncome": "1000",
            "TotalExpenses": "250.5",
            "Balance": 700
        }))
        .unwrap();
        assert_eq!(legacy.balance, 700.0);
        assert_eq!(legacy.expense_count, None);

        assert!(matches!(
            adapt_summary(&json!({"income": 1})),
            Err(AdapterError::UnknownSchema { .. })
        ));
        assert!(matches!(
            adapt_summary(&json!([1, 2])),
            Err(AdapterError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_analytics_current_schema_is_sorted() {
        let analytics = adapt_transaction_analytics(
            &json!({
                "by_category": [
                    {"category_id": 1, "category_name": "Comida", "total": 50},
                    {"category_name": "Sin categoría", "total": 75}
                ],
                "by_month": [
                    {"month": "2024-02", "total": 100},
                    {"month": "2024-01", "total": 25}
                ]
            }),
            TransactionKind::Expense,
        )
        .unwrap();

        assert_eq!(analytics.by_category[0].total, 75.0);
        assert_eq!(analytics.by_category[0].category_id, None);
        assert_eq!(analytics.by_month[0].month.to_string(), "2024-01");
    }

    #[test]
    fn test_analytics_legacy_rows() {
        let analytics = adapt_transaction_analytics(
            &json!([
                {"CategoryID": 1, "CategoryName": "Salario", "Total": "3000"},
                {"CategoryID": 2, "CategoryName": "Extra", "Total": 5000}
            ]),
            TransactionKind::Income,
        )
        .unwrap();
        assert_eq!(analytics.by_category[0].category_name, "Extra");
        assert!(analytics.by_month.is_empty());

        let err = adapt_transaction_analytics(
            &json!([{"name": "Salario", "sum": 1}]),
            TransactionKind::Income,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AdapterError::UnknownSchema {
                entity: "income analytics",
                ..
            }
        ));
    }

    #[test]
    fn test_category_usage_both_schemas() {
        let usage = adapt_category_usage(&json!([
            {"category_id": 1, "category_name": "Comida", "transaction_count": 4, "total": 80},
            {"CategoryID": 2, "CategoryName": "Casa", "TransactionCount": 1, "Total": "900"}
        ]))
        .unwrap();
        assert_eq!(usage[0].transaction_count, 4);
        assert_eq!(usage[1].category_id.as_deref(), Some("2"));
        assert_eq!(usage[1].total, 900.0);
    }

    #[test]
    fn test_planning_resources() {
        let budgets = adapt_budgets(&json!({"budgets": [
            {"id": "b1", "category_id": "food", "amount": 300, "spent": 120}
        ]}))
        .unwrap();
        assert_eq!(budgets[0].remaining(), 180.0);

        let goals = adapt_savings_goals(&json!([
            {"id": "g1", "name": "Viaje", "target_amount": 1000, "deadline": "2025-06-30"}
        ]))
        .unwrap();
        assert_eq!(goals[0].current_amount, 0.0);

        let recurring = adapt_recurring(&json!({"data": [
            {"id": "r1", "type": "expense", "amount": 50, "frequency": "weekly"}
        ]}))
        .unwrap();
        assert_eq!(recurring[0].frequency, Frequency::Weekly);

        assert!(matches!(
            adapt_budgets(&json!([{"id": "b1"}])),
            Err(AdapterError::Malformed { entity: "budget", .. })
        ));
    }
}
