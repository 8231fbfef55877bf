//! Dashboard API
//!
//! The three REST collections the dashboard reads and edits.

use crate::api::error::ApiError;
use crate::models::{
    AlertCondition, AlertConditionPayload, PortfolioEntry, PortfolioPayload, ServerMessage,
    TriggeredAlert,
};

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// List portfolio entries, optionally only those owned by `user_id`.
    async fn list_portfolios(
        &self,
        user_id: Option<String>,
    ) -> Result<Vec<PortfolioEntry>, ApiError>;

    /// Create a portfolio entry. The server assigns the identifier.
    async fn create_portfolio(
        &self,
        payload: &PortfolioPayload,
    ) -> Result<ServerMessage, ApiError>;

    /// Replace the fields of an existing portfolio entry.
    async fn update_portfolio(
        &self,
        portfolio_id: &str,
        payload: &PortfolioPayload,
    ) -> Result<ServerMessage, ApiError>;

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<ServerMessage, ApiError>;

    /// List the alerts the alert service currently considers triggered.
    async fn list_triggered_alerts(&self) -> Result<Vec<TriggeredAlert>, ApiError>;

    async fn list_alert_conditions(&self) -> Result<Vec<AlertCondition>, ApiError>;

    async fn create_alert_condition(
        &self,
        payload: &AlertConditionPayload,
    ) -> Result<ServerMessage, ApiError>;

    async fn delete_alert_condition(&self, alert_id: &str) -> Result<ServerMessage, ApiError>;
}
