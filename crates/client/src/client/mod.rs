//! HTTP client for the finanzas backend services.

mod analytics;
mod api;
mod categories;
pub mod insights;
mod planning;
mod recurring;
mod transactions;

pub use api::FinanceApi;
pub use categories::CreateCategoryRequest;
pub use insights::{with_timeout_fallback, Insights, InsightsSource};
pub use recurring::CreateRecurringRequest;
pub use transactions::CreateTransactionRequest;

use serde::Serialize;
use serde_json::Value;

use crate::config::{Service, ServiceUrls};
use crate::error::{ClientError, Result};

/// Empty query string.
const NO_QUERY: &[(&str, &str)] = &[];

/// HTTP client for the finanzas microservices.
#[derive(Debug, Clone)]
pub struct FinanzasClient {
    client: reqwest::Client,
    urls: ServiceUrls,
}

impl FinanzasClient {
    /// Create a new client targeting the given services.
    pub fn new(urls: ServiceUrls) -> Self {
        Self {
            client: reqwest::Client::new(),
            urls,
        }
    }

    /// Get the service base URLs.
    pub fn urls(&self) -> &ServiceUrls {
        &self.urls
    }

    /// Build a URL for an endpoint of a service.
    fn url(&self, service: Service, path: &str) -> String {
        format!("{}{}", self.urls.get(service), path)
    }

    /// GET an endpoint and return its raw JSON body.
    async fn get_json<Q: Serialize + ?Sized>(
        &self,
        service: Service,
        path: &str,
        query: &Q,
    ) -> Result<Value> {
        let url = self.url(service, path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).query(query).send().await?;
        self.handle_response(response, path).await
    }

    /// POST a JSON body and return the raw JSON response.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        service: Service,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.url(service, path);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response, path).await
    }

    /// DELETE a resource.
    async fn delete(&self, service: Service, path: &str) -> Result<()> {
        let url = self.url(service, path);
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await?;
        self.handle_delete_response(response, path).await
    }

    /// Handle error responses.
    async fn handle_response(&self, response: reqwest::Response, resource: &str) -> Result<Value> {
        let status = response.status();
        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))
        } else {
            Err(Self::error_for(status, response, resource).await)
        }
    }

    /// Handle delete responses (no body expected).
    async fn handle_delete_response(&self, response: reqwest::Response, resource: &str) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_for(status, response, resource).await)
        }
    }

    async fn error_for(
        status: reqwest::StatusCode,
        response: reqwest::Response,
        resource: &str,
    ) -> ClientError {
        if status == reqwest::StatusCode::NOT_FOUND {
            return ClientError::NotFound {
                resource: resource.to_string(),
            };
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ClientError::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}
