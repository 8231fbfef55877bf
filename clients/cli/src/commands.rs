//! One-shot commands
//!
//! Each command makes a single call and returns the text to print. The
//! dashboard's rendering and numeric parsing rules apply here too.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::models::{
    AlertConditionPayload, PortfolioPayload, ServerMessage, parse_quantity, parse_threshold,
};
use crate::ui::dashboard::components::conditions_table::condition_cells;
use crate::ui::dashboard::components::portfolio_table::portfolio_cells;

/// Aligns rows under their headers, two spaces between columns.
fn format_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    lines.extend(
        rows.iter()
            .map(|row| format_row(row.iter().map(String::as_str).collect())),
    );
    lines.join("\n")
}

pub async fn list_portfolios(
    api: &dyn DashboardApi,
    user_id: Option<String>,
) -> Result<String, ApiError> {
    let user_id = user_id.filter(|id| !id.is_empty());
    let entries = api.list_portfolios(user_id).await?;
    if entries.is_empty() {
        return Ok("No portfolio entries".to_string());
    }
    let rows: Vec<[String; 5]> = entries
        .iter()
        .map(|entry| {
            let [user, symbol, quantity, price] = portfolio_cells(entry);
            [entry.portfolio_id.clone(), user, symbol, quantity, price]
        })
        .collect();
    Ok(format_table(
        ["Portfolio ID", "User ID", "Stock Symbol", "Quantity", "Current Price"],
        &rows,
    ))
}

fn portfolio_payload(user_id: &str, stock_symbol: &str, quantity: &str) -> PortfolioPayload {
    PortfolioPayload {
        user_id: user_id.to_string(),
        stock_symbol: stock_symbol.to_string(),
        quantity: parse_quantity(quantity),
    }
}

pub async fn add_portfolio(
    api: &dyn DashboardApi,
    user_id: &str,
    stock_symbol: &str,
    quantity: &str,
) -> Result<String, ApiError> {
    let payload = portfolio_payload(user_id, stock_symbol, quantity);
    let ServerMessage { message } = api.create_portfolio(&payload).await?;
    Ok(message)
}

pub async fn update_portfolio(
    api: &dyn DashboardApi,
    portfolio_id: &str,
    user_id: &str,
    stock_symbol: &str,
    quantity: &str,
) -> Result<String, ApiError> {
    let payload = portfolio_payload(user_id, stock_symbol, quantity);
    let ServerMessage { message } = api.update_portfolio(portfolio_id, &payload).await?;
    Ok(message)
}

pub async fn delete_portfolio(
    api: &dyn DashboardApi,
    portfolio_id: &str,
) -> Result<String, ApiError> {
    Ok(api.delete_portfolio(portfolio_id).await?.message)
}

pub async fn list_triggered_alerts(api: &dyn DashboardApi) -> Result<String, ApiError> {
    let alerts = api.list_triggered_alerts().await?;
    if alerts.is_empty() {
        return Ok("No triggered alerts".to_string());
    }
    Ok(alerts
        .iter()
        .map(|alert| format!("Alert! {}", alert))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub async fn list_alert_conditions(api: &dyn DashboardApi) -> Result<String, ApiError> {
    let conditions = api.list_alert_conditions().await?;
    if conditions.is_empty() {
        return Ok("No alert conditions".to_string());
    }
    let rows: Vec<[String; 4]> = conditions.iter().map(condition_cells).collect();
    Ok(format_table(
        ["Alert ID", "Stock Symbol", "Condition", "Threshold"],
        &rows,
    ))
}

pub async fn add_alert_condition(
    api: &dyn DashboardApi,
    alert_id: &str,
    stock_symbol: &str,
    condition_type: &str,
    threshold: &str,
) -> Result<String, ApiError> {
    let payload = AlertConditionPayload {
        alert_id: alert_id.to_string(),
        stock_symbol: stock_symbol.to_string(),
        condition_type: condition_type.to_string(),
        threshold: parse_threshold(threshold),
    };
    Ok(api.create_alert_condition(&payload).await?.message)
}

pub async fn delete_alert_condition(
    api: &dyn DashboardApi,
    alert_id: &str,
) -> Result<String, ApiError> {
    Ok(api.delete_alert_condition(alert_id).await?.message)
}
