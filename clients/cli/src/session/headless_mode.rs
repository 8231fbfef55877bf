//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::events::{Event, Payload};
use crate::logging::init_stderr_logger;
use crate::workers::Request;
use std::error::Error;

/// Runs the application in headless mode
///
/// This function handles:
/// 1. Loading the portfolio and alert conditions once
/// 2. Console event logging, including every triggered alert the poller fetches
/// 3. Ctrl+C shutdown handling
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    init_stderr_logger();
    print_session_starting("headless", &session.environment);

    let user_id = session
        .ui_config
        .default_user_id
        .clone()
        .filter(|id| !id.is_empty());
    for request in [
        Request::ListPortfolios { user_id },
        Request::ListAlertConditions,
    ] {
        session.request_sender.send(request).await?;
    }

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();

    // Event loop: log events to console until shutdown
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                for line in event_lines(event) {
                    println!("{}", line);
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    print_session_shutdown();
    for handle in session.join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}

/// The console lines for one event: its summary, then one line per alert.
fn event_lines(mut event: Event) -> Vec<String> {
    let payload = event.take_payload();
    let mut lines = vec![event.to_string()];
    if let Payload::TriggeredAlerts(alerts) = payload {
        lines.extend(alerts.iter().map(|alert| format!("  Alert! {}", alert)));
    }
    lines
}
