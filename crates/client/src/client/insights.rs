//! AI insights with a bounded wait.
//!
//! The AI service is slow and optional. Callers race it against a timer and
//! fall back to locally derived hints, so the command never hangs on it.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use finanzas_core::finance::{DashboardSummary, MonthlyProjection};
use finanzas_core::period::FilterParams;

use super::FinanzasClient;
use crate::config::Service;
use crate::error::{ClientError, Result};

/// Where a set of insights came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightsSource {
    #[default]
    Service,
    Fallback,
}

/// Short advice about the selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub source: InsightsSource,
}

impl Insights {
    /// Hints derived locally from the period totals and recurring projection.
    pub fn fallback(summary: &DashboardSummary, projection: &MonthlyProjection) -> Self {
        let mut tips = Vec::new();
        if summary.balance < 0.0 {
            tips.push("Tus gastos superan tus ingresos en este período.".to_string());
        } else if summary.total_income > 0.0 {
            let rate = summary.balance / summary.total_income * 100.0;
            tips.push(format!("Estás ahorrando el {rate:.0}% de tus ingresos."));
        }
        if projection.net < 0.0 {
            tips.push("Tus transacciones recurrentes dejan un saldo mensual negativo.".to_string());
        }
        if tips.is_empty() {
            tips.push("Registra tus movimientos para recibir recomendaciones.".to_string());
        }

        Self {
            summary: "Análisis automático no disponible; mostrando un resumen local.".to_string(),
            tips,
            source: InsightsSource::Fallback,
        }
    }
}

/// Awaits `future` for at most `duration`.
///
/// On timeout or error the failure is logged and `fallback()` is returned
/// instead.
pub async fn with_timeout_fallback<T, E, Fut, F>(duration: Duration, future: Fut, fallback: F) -> T
where
    E: Display,
    Fut: Future<Output = std::result::Result<T, E>>,
    F: FnOnce() -> T,
{
    match tokio::time::timeout(duration, future).await {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "Call failed, using fallback data");
            fallback()
        }
        Err(_) => {
            tracing::warn!(timeout = ?duration, "Call timed out, using fallback data");
            fallback()
        }
    }
}

impl FinanzasClient {
    /// Fetch insights for a period from the AI service.
    pub async fn fetch_insights(&self, params: &FilterParams) -> Result<Insights> {
        let body = self.get_json(Service::Ai, "/insights", params).await?;
        serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(income: f64, expenses: f64) -> DashboardSummary {
        DashboardSummary {
            total_income: income,
            total_expenses: expenses,
            balance: income - expenses,
            expense_count: None,
            income_count: None,
        }
    }

    #[tokio::test]
    async fn test_fast_call_wins() {
        let value = with_timeout_fallback(
            Duration::from_secs(1),
            async { Ok::<_, ClientError>(42) },
            || 0,
        )
        .await;
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_error_uses_fallback() {
        let value = with_timeout_fallback(
            Duration::from_secs(1),
            async { Err::<i32, _>(ClientError::InvalidInput("boom".to_string())) },
            || 7,
        )
        .await;
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_uses_fallback() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, ClientError>(1)
        };
        let value = with_timeout_fallback(Duration::from_secs(8), slow, || -1).await;
        assert_eq!(value, -1);
    }

    #[test]
    fn test_fallback_hints() {
        let insights = Insights::fallback(&summary(1000.0, 1500.0), &MonthlyProjection::default());
        assert_eq!(insights.source, InsightsSource::Fallback);
        assert!(insights.tips[0].contains("superan"));

        let insights = Insights::fallback(&summary(1000.0, 750.0), &MonthlyProjection::default());
        assert_eq!(insights.tips[0], "Estás ahorrando el 25% de tus ingresos.");

        let projection = MonthlyProjection {
            income: 0.0,
            expenses: 100.0,
            net: -100.0,
        };
        let insights = Insights::fallback(&summary(0.0, 0.0), &projection);
        assert_eq!(insights.tips.len(), 1);
        assert!(insights.tips[0].contains("recurrentes"));
    }

    #[test]
    fn test_service_payload_defaults() {
        let insights: Insights =
            serde_json::from_value(serde_json::json!({"summary": "Todo bien"})).unwrap();
        assert_eq!(insights.source, InsightsSource::Service);
        assert!(insights.tips.is_empty());
    }
}
