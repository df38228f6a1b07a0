//! Read surface of the backend used through the cache gateway.

use async_trait::async_trait;
use serde_json::Value;

use finanzas_core::finance::TransactionKind;
use finanzas_core::period::FilterParams;

use super::FinanzasClient;
use crate::error::Result;

/// Raw JSON reads of every endpoint the dashboard and list commands use.
///
/// Payloads are returned untouched; schema adapters run after caching.
#[async_trait]
pub trait FinanceApi: Send + Sync {
    /// Full expense or income list.
    async fn list_transactions(&self, kind: TransactionKind) -> Result<Value>;

    async fn list_categories(&self) -> Result<Value>;

    /// Compact category list for pickers.
    async fn categories_dropdown(&self) -> Result<Value>;

    async fn dashboard_summary(&self, params: &FilterParams) -> Result<Value>;

    /// Backend-aggregated expense or income breakdown.
    async fn transaction_analytics(
        &self,
        kind: TransactionKind,
        params: &FilterParams,
    ) -> Result<Value>;

    async fn category_analytics(&self, params: &FilterParams) -> Result<Value>;

    async fn list_budgets(&self) -> Result<Value>;

    async fn list_savings_goals(&self) -> Result<Value>;

    async fn list_recurring(&self) -> Result<Value>;
}

#[async_trait]
impl FinanceApi for FinanzasClient {
    async fn list_transactions(&self, kind: TransactionKind) -> Result<Value> {
        FinanzasClient::list_transactions(self, kind).await
    }

    async fn list_categories(&self) -> Result<Value> {
        FinanzasClient::list_categories(self).await
    }

    async fn categories_dropdown(&self) -> Result<Value> {
        FinanzasClient::categories_dropdown(self).await
    }

    async fn dashboard_summary(&self, params: &FilterParams) -> Result<Value> {
        FinanzasClient::dashboard_summary(self, params).await
    }

    async fn transaction_analytics(
        &self,
        kind: TransactionKind,
        params: &FilterParams,
    ) -> Result<Value> {
        FinanzasClient::transaction_analytics(self, kind, params).await
    }

    async fn category_analytics(&self, params: &FilterParams) -> Result<Value> {
        FinanzasClient::category_analytics(self, params).await
    }

    async fn list_budgets(&self) -> Result<Value> {
        FinanzasClient::list_budgets(self).await
    }

    async fn list_savings_goals(&self) -> Result<Value> {
        FinanzasClient::list_savings_goals(self).await
    }

    async fn list_recurring(&self) -> Result<Value> {
        FinanzasClient::list_recurring(self).await
    }
}
