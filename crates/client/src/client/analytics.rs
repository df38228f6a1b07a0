//! Dashboard and analytics API operations.

use serde_json::Value;

use finanzas_core::finance::TransactionKind;
use finanzas_core::period::FilterParams;

use super::FinanzasClient;
use crate::config::Service;
use crate::error::Result;

impl FinanzasClient {
    /// Totals for the given period.
    pub async fn dashboard_summary(&self, params: &FilterParams) -> Result<Value> {
        self.get_json(Service::Dashboard, "/dashboard/summary", params)
            .await
    }

    /// Expense or income breakdown by category and month.
    pub async fn transaction_analytics(
        &self,
        kind: TransactionKind,
        params: &FilterParams,
    ) -> Result<Value> {
        self.get_json(
            Service::Dashboard,
            &format!("/analytics/{}", kind.plural()),
            params,
        )
        .await
    }

    /// Per-category transaction counts and totals.
    pub async fn category_analytics(&self, params: &FilterParams) -> Result<Value> {
        self.get_json(Service::Dashboard, "/analytics/categories", params)
            .await
    }
}
