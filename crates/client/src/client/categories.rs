//! Category API operations.

use serde::Serialize;
use serde_json::Value;

use finanzas_core::finance::{adapt_category, Category, TransactionKind};

use super::{FinanzasClient, NO_QUERY};
use crate::config::Service;
use crate::error::{ClientError, Result};

/// Request for creating a category.
#[derive(Debug, Serialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FinanzasClient {
    /// List all categories.
    pub async fn list_categories(&self) -> Result<Value> {
        self.get_json(Service::Categories, "/categories", NO_QUERY).await
    }

    /// List categories in the compact dropdown shape.
    pub async fn categories_dropdown(&self) -> Result<Value> {
        self.get_json(Service::Categories, "/categories/dropdown", NO_QUERY)
            .await
    }

    /// Create a new category.
    pub async fn create_category(&self, req: &CreateCategoryRequest) -> Result<Category> {
        if req.name.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "category name must not be empty".to_string(),
            ));
        }
        let body = self
            .post_json(Service::Categories, "/categories", req)
            .await?;
        adapt_category(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Delete a category by ID.
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.delete(Service::Categories, &format!("/categories/{}", id))
            .await
    }
}
