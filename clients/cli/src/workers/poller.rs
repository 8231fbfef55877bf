//! Triggered alert polling

use super::dispatcher::Request;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

/// Asks for the triggered alerts on a fixed interval, starting immediately.
///
/// Each tick only enqueues a request; a slow response never delays or
/// cancels the next tick.
pub struct AlertPoller {
    interval: Duration,
    requests: mpsc::Sender<Request>,
}

impl AlertPoller {
    pub fn new(interval: Duration, requests: mpsc::Sender<Request>) -> Self {
        Self { interval, requests }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.requests.send(Request::ListTriggeredAlerts).await.is_err() {
                        log::debug!("Request channel closed, stopping alert poller");
                        break;
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn polls_immediately_then_on_interval() {
        let (request_tx, mut request_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let poller = AlertPoller::new(Duration::from_millis(20), request_tx);
        let handle = tokio::spawn(poller.run(shutdown_rx));

        for _ in 0..3 {
            let request = tokio::time::timeout(Duration::from_secs(2), request_rx.recv())
                .await
                .expect("poller should tick")
                .expect("channel open");
            assert_eq!(request, Request::ListTriggeredAlerts);
        }

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn stops_when_requests_are_no_longer_read() {
        let (request_tx, request_rx) = mpsc::channel(1);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        drop(request_rx);

        let poller = AlertPoller::new(Duration::from_millis(5), request_tx);
        tokio::time::timeout(Duration::from_secs(2), poller.run(shutdown_rx))
            .await
            .expect("poller should exit once the channel closes");
    }
}
