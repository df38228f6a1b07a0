//! Recurring transaction API operations.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use finanzas_core::finance::{Frequency, TransactionKind};

use super::{FinanzasClient, NO_QUERY};
use crate::config::Service;
use crate::error::{ClientError, Result};

/// Request for creating a recurring transaction.
#[derive(Debug, Serialize)]
pub struct CreateRecurringRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl FinanzasClient {
    /// List recurring transactions.
    pub async fn list_recurring(&self) -> Result<Value> {
        self.get_json(Service::Recurring, "/recurring-transactions", NO_QUERY)
            .await
    }

    /// Create a recurring transaction.
    pub async fn create_recurring(&self, req: &CreateRecurringRequest) -> Result<Value> {
        if !req.amount.is_finite() || req.amount <= 0.0 {
            return Err(ClientError::InvalidInput(format!(
                "amount must be positive, got {}",
                req.amount
            )));
        }
        self.post_json(Service::Recurring, "/recurring-transactions", req)
            .await
    }

    /// Delete a recurring transaction by ID.
    pub async fn delete_recurring(&self, id: &str) -> Result<()> {
        self.delete(Service::Recurring, &format!("/recurring-transactions/{}", id))
            .await
    }

    /// Materialize a recurring transaction now.
    ///
    /// The backend creates an expense or an income depending on the item.
    pub async fn execute_recurring(&self, id: &str) -> Result<Value> {
        self.post_json(
            Service::Recurring,
            &format!("/recurring-transactions/{}/execute", id),
            &Value::Object(Default::default()),
        )
        .await
    }
}
