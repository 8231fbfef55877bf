//! Session setup and initialization

use crate::api::{ApiClient, DashboardApi};
use crate::consts::cli_consts::{EVENT_QUEUE_SIZE, REQUEST_QUEUE_SIZE};
use crate::environment::Environment;
use crate::events::Event;
use crate::ui::UIConfig;
use crate::workers::{AlertPoller, EventSender, Request, RequestDispatcher};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
#[derive(Debug)]
pub struct SessionData {
    /// Request results from the dispatcher
    pub event_receiver: mpsc::Receiver<Event>,
    /// Requests for the dispatcher
    pub request_sender: mpsc::Sender<Request>,
    /// Dispatcher and poller tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop the dispatcher and poller
    pub shutdown_sender: broadcast::Sender<()>,
    pub environment: Environment,
    pub ui_config: UIConfig,
}

/// Sets up a dashboard session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Creates the HTTP client for the configured service
/// 2. Sets up the request, event and shutdown channels
/// 3. Starts the request dispatcher and the triggered alert poller
///
/// # Arguments
/// * `env` - Environment to connect to
/// * `ui_config` - Dashboard options, including the alert polling interval
pub async fn setup_session(
    env: Environment,
    ui_config: UIConfig,
) -> Result<SessionData, Box<dyn Error>> {
    let api: Arc<dyn DashboardApi> = Arc::new(ApiClient::new(env.clone())?);

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let (request_sender, request_receiver) = mpsc::channel::<Request>(REQUEST_QUEUE_SIZE);

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    let dispatcher = RequestDispatcher::new(api, EventSender::new(event_sender));
    let dispatcher_handle = tokio::spawn(
        dispatcher.run(request_receiver, shutdown_sender.subscribe()),
    );

    let poll_interval = Duration::from_secs(ui_config.alert_poll_secs.max(1));
    let poller = AlertPoller::new(poll_interval, request_sender.clone());
    let poller_handle = tokio::spawn(poller.run(shutdown_sender.subscribe()));

    log::debug!(
        "Session started against {} (alerts every {:?})",
        env.api_url(),
        poll_interval
    );

    Ok(SessionData {
        event_receiver,
        request_sender,
        join_handles: vec![dispatcher_handle, poller_handle],
        shutdown_sender,
        environment: env,
        ui_config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_stops_session_tasks() {
        let session = setup_session(
            Environment::Custom {
                api_url: "http://127.0.0.1:9".to_string(),
            },
            UIConfig::new(false, None, 3600),
        )
        .await
        .unwrap();

        session.shutdown_sender.send(()).unwrap();
        for handle in session.join_handles {
            tokio::time::timeout(Duration::from_secs(2), handle)
                .await
                .unwrap()
                .unwrap();
        }
    }
}
