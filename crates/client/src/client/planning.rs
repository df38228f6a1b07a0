//! Budget and savings goal API operations.

use serde_json::Value;

use super::{FinanzasClient, NO_QUERY};
use crate::config::Service;
use crate::error::Result;

impl FinanzasClient {
    /// List budgets.
    pub async fn list_budgets(&self) -> Result<Value> {
        self.get_json(Service::Budgets, "/budgets", NO_QUERY).await
    }

    /// List savings goals.
    pub async fn list_savings_goals(&self) -> Result<Value> {
        self.get_json(Service::SavingsGoals, "/savings-goals", NO_QUERY)
            .await
    }
}
