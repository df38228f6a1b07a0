//! Expense and income API operations.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use finanzas_core::finance::{adapt_transaction, Transaction, TransactionKind};

use super::{FinanzasClient, NO_QUERY};
use crate::config::Service;
use crate::error::{ClientError, Result};

/// Request for creating an expense or income.
#[derive(Debug, Serialize)]
pub struct CreateTransactionRequest {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

fn service(kind: TransactionKind) -> Service {
    match kind {
        TransactionKind::Expense => Service::Expenses,
        TransactionKind::Income => Service::Incomes,
    }
}

impl FinanzasClient {
    /// List every expense or income.
    pub async fn list_transactions(&self, kind: TransactionKind) -> Result<Value> {
        self.get_json(service(kind), &format!("/{}", kind.plural()), NO_QUERY)
            .await
    }

    /// Create a new expense or income.
    pub async fn create_transaction(
        &self,
        kind: TransactionKind,
        req: &CreateTransactionRequest,
    ) -> Result<Transaction> {
        if !req.amount.is_finite() || req.amount <= 0.0 {
            return Err(ClientError::InvalidInput(format!(
                "amount must be positive, got {}",
                req.amount
            )));
        }
        let body = self
            .post_json(service(kind), &format!("/{}", kind.plural()), req)
            .await?;
        adapt_transaction(&body, kind).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Delete an expense or income by ID.
    pub async fn delete_transaction(&self, kind: TransactionKind, id: &str) -> Result<()> {
        self.delete(service(kind), &format!("/{}/{}", kind.plural(), id))
            .await
    }
}
