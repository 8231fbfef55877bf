//! Request dispatch
//!
//! Every request runs as its own task and reports back with one event.
//! Nothing is cancelled, retried or reordered: whichever response arrives
//! last is what the dashboard shows.

use super::core::EventSender;
use crate::api::DashboardApi;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Collection, Event, Operation};
use crate::models::{AlertConditionPayload, PortfolioPayload};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// A dashboard action that needs the network, keyed by the identifiers it
/// acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListPortfolios { user_id: Option<String> },
    CreatePortfolio(PortfolioPayload),
    UpdatePortfolio {
        portfolio_id: String,
        payload: PortfolioPayload,
    },
    DeletePortfolio { portfolio_id: String },
    ListTriggeredAlerts,
    ListAlertConditions,
    CreateAlertCondition(AlertConditionPayload),
    DeleteAlertCondition { alert_id: String },
}

impl Request {
    pub fn collection(&self) -> Collection {
        match self {
            Request::ListPortfolios { .. }
            | Request::CreatePortfolio(_)
            | Request::UpdatePortfolio { .. }
            | Request::DeletePortfolio { .. } => Collection::Portfolio,
            Request::ListTriggeredAlerts => Collection::TriggeredAlerts,
            Request::ListAlertConditions
            | Request::CreateAlertCondition(_)
            | Request::DeleteAlertCondition { .. } => Collection::AlertConditions,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Request::ListPortfolios { .. }
            | Request::ListTriggeredAlerts
            | Request::ListAlertConditions => Operation::List,
            Request::CreatePortfolio(_) | Request::CreateAlertCondition(_) => Operation::Create,
            Request::UpdatePortfolio { .. } => Operation::Update,
            Request::DeletePortfolio { .. } | Request::DeleteAlertCondition { .. } => {
                Operation::Delete
            }
        }
    }
}

/// Performs `request` and turns the outcome into an event. Failures are
/// written to the diagnostic log here.
pub async fn execute(api: &dyn DashboardApi, request: Request) -> Event {
    let collection = request.collection();
    let operation = request.operation();

    let result = match request {
        Request::ListPortfolios { user_id } => {
            api.list_portfolios(user_id).await.map(Event::portfolios_loaded)
        }
        Request::ListTriggeredAlerts => api.list_triggered_alerts().await.map(Event::alerts_loaded),
        Request::ListAlertConditions => api
            .list_alert_conditions()
            .await
            .map(Event::conditions_loaded),
        Request::CreatePortfolio(payload) => api
            .create_portfolio(&payload)
            .await
            .map(|reply| Event::mutated(collection, operation, reply.message)),
        Request::UpdatePortfolio {
            portfolio_id,
            payload,
        } => api
            .update_portfolio(&portfolio_id, &payload)
            .await
            .map(|reply| Event::mutated(collection, operation, reply.message)),
        Request::DeletePortfolio { portfolio_id } => api
            .delete_portfolio(&portfolio_id)
            .await
            .map(|reply| Event::mutated(collection, operation, reply.message)),
        Request::CreateAlertCondition(payload) => api
            .create_alert_condition(&payload)
            .await
            .map(|reply| Event::mutated(collection, operation, reply.message)),
        Request::DeleteAlertCondition { alert_id } => api
            .delete_alert_condition(&alert_id)
            .await
            .map(|reply| Event::mutated(collection, operation, reply.message)),
    };

    match result {
        Ok(event) => event,
        Err(e) => {
            let level = ErrorClassifier::new().classify(&e);
            let log_level: log::Level = level.into();
            log::log!(log_level, "Error during {} {}: {}", operation, collection, e);
            Event::failed(collection, operation, e.to_string(), level)
        }
    }
}

/// Spawns one task per incoming request.
pub struct RequestDispatcher {
    api: Arc<dyn DashboardApi>,
    event_sender: EventSender,
}

impl RequestDispatcher {
    pub fn new(api: Arc<dyn DashboardApi>, event_sender: EventSender) -> Self {
        Self { api, event_sender }
    }

    pub fn dispatch(&self, request: Request) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let event = execute(api.as_ref(), request).await;
            sender.send_event(event).await;
        })
    }

    /// Dispatches requests until the channel closes or shutdown is signalled.
    /// Requests already in flight are left to finish on their own.
    pub async fn run(
        self,
        mut requests: mpsc::Receiver<Request>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                maybe_request = requests.recv() => match maybe_request {
                    Some(request) => {
                        self.dispatch(request);
                    }
                    None => break,
                },
                _ = shutdown.recv() => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::error::ApiError;
    use crate::events::{EventType, Payload};
    use crate::logging::LogLevel;
    use crate::models::{PortfolioEntry, Scalar, ServerMessage};
    use mockall::predicate::eq;

    fn entry(id: &str, user: &str, symbol: &str, quantity: i64) -> PortfolioEntry {
        PortfolioEntry {
            portfolio_id: id.to_string(),
            user_id: user.to_string(),
            stock_symbol: symbol.to_string(),
            quantity: Some(Scalar::from(quantity)),
            current_price: None,
        }
    }

    #[tokio::test]
    async fn list_portfolios_passes_filter_and_returns_rows() {
        let mut api = MockDashboardApi::new();
        api.expect_list_portfolios()
            .with(eq(Some("u1".to_string())))
            .times(1)
            .returning(|_| Ok(vec![entry("p1", "u1", "AAPL", 10)]));

        let event = execute(
            &api,
            Request::ListPortfolios {
                user_id: Some("u1".to_string()),
            },
        )
        .await;

        assert_eq!(event.event_type, EventType::Success);
        assert_eq!(
            event.payload,
            Payload::Portfolios(vec![entry("p1", "u1", "AAPL", 10)])
        );
    }

    #[tokio::test]
    async fn delete_reports_server_message() {
        let mut api = MockDashboardApi::new();
        api.expect_delete_portfolio()
            .withf(|id| id == "p1")
            .times(1)
            .returning(|_| {
                Ok(ServerMessage {
                    message: "Portfolio item deleted".to_string(),
                })
            });

        let event = execute(
            &api,
            Request::DeletePortfolio {
                portfolio_id: "p1".to_string(),
            },
        )
        .await;

        assert_eq!(event.operation, Operation::Delete);
        assert_eq!(
            event.payload,
            Payload::Message("Portfolio item deleted".to_string())
        );
    }

    #[tokio::test]
    async fn failure_becomes_error_event_without_payload() {
        let mut api = MockDashboardApi::new();
        api.expect_list_alert_conditions().times(1).returning(|| {
            Err(ApiError::Http {
                status: 503,
                message: "unavailable".to_string(),
            })
        });

        let event = execute(&api, Request::ListAlertConditions).await;

        assert_eq!(event.event_type, EventType::Error);
        assert_eq!(event.log_level, LogLevel::Warn);
        assert_eq!(event.payload, Payload::None);
        assert!(event.msg.contains("503"));
    }

    #[tokio::test]
    async fn dispatcher_runs_each_request_and_stops_on_shutdown() {
        let mut api = MockDashboardApi::new();
        api.expect_list_triggered_alerts()
            .times(2)
            .returning(|| Ok(vec![]));

        let (event_tx, mut event_rx) = mpsc::channel(8);
        let (request_tx, request_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let dispatcher = RequestDispatcher::new(Arc::new(api), EventSender::new(event_tx));
        let handle = tokio::spawn(dispatcher.run(request_rx, shutdown_rx));

        request_tx.send(Request::ListTriggeredAlerts).await.unwrap();
        request_tx.send(Request::ListTriggeredAlerts).await.unwrap();

        for _ in 0..2 {
            let event = event_rx.recv().await.unwrap();
            assert_eq!(event.collection, Collection::TriggeredAlerts);
        }

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
