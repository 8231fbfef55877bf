pub mod cli_consts {
    //! Dashboard Configuration Constants

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size for events flowing from request tasks to the UI
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Buffer size for requests flowing from the UI and poller to the dispatcher
    pub const REQUEST_QUEUE_SIZE: usize = 64;

    // =============================================================================
    // DISPLAY
    // =============================================================================

    /// Shown in place of a current price the server did not send.
    pub const MISSING_PRICE_PLACEHOLDER: &str = "N/A";

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Gateway address used when nothing else is configured.
    pub const DEFAULT_API_URL: &str = "http://localhost:8000";

    /// REST collection paths, relative to the gateway base URL
    pub mod endpoints {
        pub const PORTFOLIO: &str = "/api/portfolio";
        pub const TRIGGERED_ALERTS: &str = "/api/alerts";
        pub const ALERT_CONDITIONS: &str = "/api/alert";
    }

    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    /// Triggered alert polling
    pub mod alert_polling {
        /// Seconds between triggered-alert fetches
        pub const INTERVAL_SECS: u64 = 10;
    }
}
