//! Dashboard API Client
//!
//! JSON over HTTP against the portfolio, triggered-alert and alert-condition
//! endpoints.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::consts::cli_consts::{endpoints, http};
use crate::environment::Environment;
use crate::models::{
    AlertCondition, AlertConditionPayload, PortfolioEntry, PortfolioPayload, ServerMessage,
    TriggeredAlert,
};
use reqwest::{Client, ClientBuilder, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("folio-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
}

impl ApiClient {
    pub fn new(environment: Environment) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    /// Joins the base URL and `endpoint`, appending a single encoded query
    /// parameter when one is given.
    fn build_url(&self, endpoint: &str, query: Option<(&str, &str)>) -> String {
        let mut url = format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        if let Some((key, value)) = query {
            url.push('?');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&response_bytes)?)
    }

    async fn get_request<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::decode_response(response).await
    }

    async fn send_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<ServerMessage, ApiError> {
        log::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::decode_response(response).await
    }
}

#[async_trait::async_trait]
impl DashboardApi for ApiClient {
    async fn list_portfolios(
        &self,
        user_id: Option<String>,
    ) -> Result<Vec<PortfolioEntry>, ApiError> {
        let query = user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| ("user_id", id));
        let url = self.build_url(endpoints::PORTFOLIO, query);
        self.get_request(&url).await
    }

    async fn create_portfolio(
        &self,
        payload: &PortfolioPayload,
    ) -> Result<ServerMessage, ApiError> {
        let url = self.build_url(endpoints::PORTFOLIO, None);
        self.send_request(Method::POST, &url, Some(payload)).await
    }

    async fn update_portfolio(
        &self,
        portfolio_id: &str,
        payload: &PortfolioPayload,
    ) -> Result<ServerMessage, ApiError> {
        let url = self.build_url(endpoints::PORTFOLIO, Some(("portfolio_id", portfolio_id)));
        self.send_request(Method::PUT, &url, Some(payload)).await
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<ServerMessage, ApiError> {
        let url = self.build_url(endpoints::PORTFOLIO, Some(("portfolio_id", portfolio_id)));
        self.send_request::<()>(Method::DELETE, &url, None).await
    }

    async fn list_triggered_alerts(&self) -> Result<Vec<TriggeredAlert>, ApiError> {
        let url = self.build_url(endpoints::TRIGGERED_ALERTS, None);
        self.get_request(&url).await
    }

    async fn list_alert_conditions(&self) -> Result<Vec<AlertCondition>, ApiError> {
        let url = self.build_url(endpoints::ALERT_CONDITIONS, None);
        self.get_request(&url).await
    }

    async fn create_alert_condition(
        &self,
        payload: &AlertConditionPayload,
    ) -> Result<ServerMessage, ApiError> {
        let url = self.build_url(endpoints::ALERT_CONDITIONS, None);
        self.send_request(Method::POST, &url, Some(payload)).await
    }

    async fn delete_alert_condition(&self, alert_id: &str) -> Result<ServerMessage, ApiError> {
        let url = self.build_url(endpoints::ALERT_CONDITIONS, Some(("alert_id", alert_id)));
        self.send_request::<()>(Method::DELETE, &url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves exactly one canned response and hands back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            // Read headers, then as much body as Content-Length announces.
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    fn client_for(url: &str) -> ApiClient {
        ApiClient::new(Environment::Custom {
            api_url: url.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn build_url_encodes_query_value() {
        let client = client_for("http://localhost:8000/");
        assert_eq!(
            client.build_url("/api/portfolio", Some(("user_id", "u 1&x"))),
            "http://localhost:8000/api/portfolio?user_id=u%201%26x"
        );
        assert_eq!(
            client.build_url("/api/alerts", None),
            "http://localhost:8000/api/alerts"
        );
    }

    #[tokio::test]
    async fn list_portfolios_sends_user_filter() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"portfolio_id":"p1","user_id":"u1","stock_symbol":"AAPL","quantity":10}]"#,
        )
        .await;
        let entries = client_for(&url)
            .list_portfolios(Some("u1".to_string()))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/portfolio?user_id=u1 "));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stock_symbol, "AAPL");
    }

    #[tokio::test]
    async fn empty_user_filter_is_omitted() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", "[]").await;
        let entries = client_for(&url)
            .list_portfolios(Some(String::new()))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/portfolio HTTP/1.1"));
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn update_portfolio_puts_json_with_id_in_query() {
        let (url, server) =
            serve_once("HTTP/1.1 200 OK", r#"{"message":"Portfolio item updated"}"#).await;
        let payload = PortfolioPayload {
            user_id: "u1".to_string(),
            stock_symbol: "AAPL".to_string(),
            quantity: Some(12),
        };
        let reply = client_for(&url)
            .update_portfolio("p-7", &payload)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert_eq!(reply.message, "Portfolio item updated");
        assert!(request.starts_with("PUT /api/portfolio?portfolio_id=p-7 "));
        assert!(request.contains(r#""quantity":12"#));
    }

    #[tokio::test]
    async fn delete_alert_condition_uses_alert_id_query() {
        let (url, server) =
            serve_once("HTTP/1.1 200 OK", r#"{"message":"Alert condition deleted"}"#).await;
        let reply = client_for(&url).delete_alert_condition("a1").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(reply.message, "Alert condition deleted");
        assert!(request.starts_with("DELETE /api/alert?alert_id=a1 "));
    }

    #[tokio::test]
    async fn error_status_becomes_http_error() {
        let (url, server) = serve_once(
            "HTTP/1.1 400 Bad Request",
            r#"{"error":"alert_id is required"}"#,
        )
        .await;
        let result = client_for(&url).delete_alert_condition("").await;
        server.await.unwrap();

        match result {
            Err(ApiError::Http { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("alert_id is required"));
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", "Service Running").await;
        let result = client_for(&url).list_alert_conditions().await;
        server.await.unwrap();

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
