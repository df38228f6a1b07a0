//! Typed reads through the cache.
//!
//! Raw backend payloads are cached; schema adapters run on every read so a
//! cached legacy payload and a fresh current one yield the same records. A
//! payload no adapter understands is evicted, so the next read refetches it.

use std::future::Future;

use chrono::{Local, NaiveDate};
use serde_json::{json, Value};

use finanzas_core::cache::{endpoints, Cache, ChangePubSub};
use finanzas_core::finance::{
    adapt_budgets, adapt_categories, adapt_category_usage, adapt_recurring, adapt_savings_goals,
    adapt_summary, adapt_transaction_analytics, adapt_transactions, aggregate_dashboard, Budget,
    Category, Dashboard, DashboardSource, RecurringTransaction, SavingsGoal, Transaction,
    Result as AdapterResult, TransactionKind,
};
use finanzas_core::period::{FilterParams, PeriodResolver};

use super::{CachedDataGateway, Result};
use crate::client::FinanceApi;
use crate::error::Result as ClientResult;

fn list_endpoint(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => endpoints::EXPENSES_LIST,
        TransactionKind::Income => endpoints::INCOMES_LIST,
    }
}

fn analytics_endpoint(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => endpoints::ANALYTICS_EXPENSES,
        TransactionKind::Income => endpoints::ANALYTICS_INCOMES,
    }
}

impl<C, P> CachedDataGateway<C, P>
where
    C: Cache + 'static,
    P: ChangePubSub + 'static,
{
    /// Loads the dashboard for a period.
    ///
    /// With `use_optimized_path` the five aggregation endpoints are fetched
    /// concurrently. If any of them fails, or a payload cannot be adapted,
    /// the dashboard is rebuilt from the raw expense, income and category
    /// lists instead. Errors of the legacy path propagate.
    pub async fn load_dashboard_data<A>(
        &self,
        api: &A,
        params: &FilterParams,
        use_optimized_path: bool,
    ) -> Result<Dashboard>
    where
        A: FinanceApi + ?Sized,
    {
        if use_optimized_path {
            match self.load_optimized_dashboard(api, params).await {
                Ok(dashboard) => return Ok(dashboard),
                Err(err) => tracing::warn!(
                    error = %err,
                    "Optimized dashboard load failed, falling back to raw lists"
                ),
            }
        }
        self.load_legacy_dashboard(api, params).await
    }

    async fn load_optimized_dashboard<A>(&self, api: &A, params: &FilterParams) -> Result<Dashboard>
    where
        A: FinanceApi + ?Sized,
    {
        let query = params.to_value();
        let empty = json!({});

        let (summary, expenses, incomes, usage, categories): (Value, Value, Value, Value, Value) =
            tokio::try_join!(
                self.get_or_load(endpoints::DASHBOARD_SUMMARY, &query, || {
                    api.dashboard_summary(params)
                }),
                self.get_or_load(analytics_endpoint(TransactionKind::Expense), &query, || {
                    api.transaction_analytics(TransactionKind::Expense, params)
                }),
                self.get_or_load(analytics_endpoint(TransactionKind::Income), &query, || {
                    api.transaction_analytics(TransactionKind::Income, params)
                }),
                self.get_or_load(endpoints::ANALYTICS_CATEGORIES, &query, || {
                    api.category_analytics(params)
                }),
                self.get_or_load(endpoints::CATEGORIES_DROPDOWN, &empty, || {
                    api.categories_dropdown()
                }),
            )?;

        Ok(Dashboard {
            summary: self
                .adapt_cached(endpoints::DASHBOARD_SUMMARY, &query, &summary, adapt_summary)
                .await?,
            expenses: self
                .adapt_cached(
                    analytics_endpoint(TransactionKind::Expense),
                    &query,
                    &expenses,
                    |raw| adapt_transaction_analytics(raw, TransactionKind::Expense),
                )
                .await?,
            incomes: self
                .adapt_cached(
                    analytics_endpoint(TransactionKind::Income),
                    &query,
                    &incomes,
                    |raw| adapt_transaction_analytics(raw, TransactionKind::Income),
                )
                .await?,
            category_usage: self
                .adapt_cached(endpoints::ANALYTICS_CATEGORIES, &query, &usage, adapt_category_usage)
                .await?,
            categories: self
                .adapt_cached(endpoints::CATEGORIES_DROPDOWN, &empty, &categories, adapt_categories)
                .await?,
            source: DashboardSource::Optimized,
        })
    }

    /// Runs `adapt` over a cached payload, evicting the payload if it fails.
    async fn adapt_cached<T>(
        &self,
        endpoint_id: &str,
        params: &Value,
        raw: &Value,
        adapt: impl FnOnce(&Value) -> AdapterResult<T>,
    ) -> Result<T> {
        match adapt(raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                let key = self.get_cache_key(endpoint_id, params);
                tracing::warn!(%key, error = %err, "Evicting payload with unknown schema");
                if let Err(err) = self.cache.delete(&key).await {
                    tracing::warn!(%key, error = %err, "Failed to evict payload");
                }
                Err(err.into())
            }
        }
    }

    /// Loads a list endpoint through the cache and adapts it.
    async fn load_list<T, F, Fut>(
        &self,
        endpoint_id: &str,
        loader: F,
        adapt: impl FnOnce(&Value) -> AdapterResult<T>,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Value>>,
    {
        let params = json!({});
        let raw: Value = self.get_or_load(endpoint_id, &params, loader).await?;
        self.adapt_cached(endpoint_id, &params, &raw, adapt).await
    }

    /// Reloads expenses and incomes and refreshes the resolver's periods.
    ///
    /// A list that fails to load counts as empty, so the current month is
    /// still offered.
    pub async fn refresh_available_periods<A>(&self, api: &A, resolver: &mut PeriodResolver)
    where
        A: FinanceApi + ?Sized,
    {
        self.refresh_available_periods_at(api, resolver, Local::now().date_naive())
            .await;
    }

    pub async fn refresh_available_periods_at<A>(
        &self,
        api: &A,
        resolver: &mut PeriodResolver,
        today: NaiveDate,
    ) where
        A: FinanceApi + ?Sized,
    {
        let expenses = self.load_transactions_or_empty(api, TransactionKind::Expense).await;
        let incomes = self.load_transactions_or_empty(api, TransactionKind::Income).await;
        resolver.update_available_data_at(&expenses, &incomes, today);
    }

    async fn load_transactions_or_empty<A>(&self, api: &A, kind: TransactionKind) -> Vec<Transaction>
    where
        A: FinanceApi + ?Sized,
    {
        self.load_transactions(api, kind).await.unwrap_or_else(|err| {
            tracing::error!(error = %err, kind = kind.plural(), "Failed to load transactions");
            Vec::new()
        })
    }

    async fn load_legacy_dashboard<A>(&self, api: &A, params: &FilterParams) -> Result<Dashboard>
    where
        A: FinanceApi + ?Sized,
    {
        let expenses = self.load_transactions(api, TransactionKind::Expense).await?;
        let incomes = self.load_transactions(api, TransactionKind::Income).await?;
        let categories = self.load_categories(api).await?;
        Ok(aggregate_dashboard(
            &expenses,
            &incomes,
            &categories,
            &params.period(),
        ))
    }

    /// Every expense or income, unfiltered.
    pub async fn load_transactions<A>(&self, api: &A, kind: TransactionKind) -> Result<Vec<Transaction>>
    where
        A: FinanceApi + ?Sized,
    {
        self.load_list(
            list_endpoint(kind),
            || api.list_transactions(kind),
            |raw| adapt_transactions(raw, kind),
        )
        .await
    }

    pub async fn load_categories<A>(&self, api: &A) -> Result<Vec<Category>>
    where
        A: FinanceApi + ?Sized,
    {
        self.load_list(endpoints::CATEGORIES_LIST, || api.list_categories(), adapt_categories)
            .await
    }

    pub async fn load_budgets<A>(&self, api: &A) -> Result<Vec<Budget>>
    where
        A: FinanceApi + ?Sized,
    {
        self.load_list(endpoints::BUDGETS_LIST, || api.list_budgets(), adapt_budgets)
            .await
    }

    pub async fn load_savings_goals<A>(&self, api: &A) -> Result<Vec<SavingsGoal>>
    where
        A: FinanceApi + ?Sized,
    {
        self.load_list(
            endpoints::SAVINGS_GOALS_LIST,
            || api.list_savings_goals(),
            adapt_savings_goals,
        )
        .await
    }

    pub async fn load_recurring<A>(&self, api: &A) -> Result<Vec<RecurringTransaction>>
    where
        A: FinanceApi + ?Sized,
    {
        self.load_list(endpoints::RECURRING_LIST, || api.list_recurring(), adapt_recurring)
            .await
    }
}
