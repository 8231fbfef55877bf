//! Event System
//!
//! Results of dashboard requests, delivered from request tasks to the UI.

use crate::logging::{LogLevel, should_log_with_env};
use crate::models::{AlertCondition, PortfolioEntry, TriggeredAlert};
use chrono::Local;
use std::fmt::Display;

/// The REST collection an event concerns.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Collection {
    #[strum(to_string = "portfolio")]
    Portfolio,
    #[strum(to_string = "alerts")]
    TriggeredAlerts,
    #[strum(to_string = "alert conditions")]
    AlertConditions,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
}

/// Data carried by a successful request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    Portfolios(Vec<PortfolioEntry>),
    TriggeredAlerts(Vec<TriggeredAlert>),
    AlertConditions(Vec<AlertCondition>),
    /// The `message` of a mutating response.
    Message(String),
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub collection: Collection,
    pub operation: Operation,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    pub payload: Payload,
}

impl Event {
    fn new(
        collection: Collection,
        operation: Operation,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
        payload: Payload,
    ) -> Self {
        Self {
            collection,
            operation,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            payload,
        }
    }

    pub fn portfolios_loaded(entries: Vec<PortfolioEntry>) -> Self {
        Self::new(
            Collection::Portfolio,
            Operation::List,
            format!("Loaded {} portfolio entries", entries.len()),
            EventType::Success,
            LogLevel::Debug,
            Payload::Portfolios(entries),
        )
    }

    pub fn alerts_loaded(alerts: Vec<TriggeredAlert>) -> Self {
        Self::new(
            Collection::TriggeredAlerts,
            Operation::List,
            format!("Loaded {} triggered alerts", alerts.len()),
            EventType::Success,
            LogLevel::Debug,
            Payload::TriggeredAlerts(alerts),
        )
    }

    pub fn conditions_loaded(conditions: Vec<AlertCondition>) -> Self {
        Self::new(
            Collection::AlertConditions,
            Operation::List,
            format!("Loaded {} alert conditions", conditions.len()),
            EventType::Success,
            LogLevel::Debug,
            Payload::AlertConditions(conditions),
        )
    }

    /// A create, update or delete the server acknowledged.
    pub fn mutated(collection: Collection, operation: Operation, message: String) -> Self {
        Self::new(
            collection,
            operation,
            format!("{} {}: {}", operation, collection, message),
            EventType::Success,
            LogLevel::Info,
            Payload::Message(message),
        )
    }

    pub fn failed(
        collection: Collection,
        operation: Operation,
        error: String,
        log_level: LogLevel,
    ) -> Self {
        Self::new(
            collection,
            operation,
            format!("Error during {} {}: {}", operation, collection, error),
            EventType::Error,
            log_level,
            Payload::None,
        )
    }

    /// Moves the payload out, leaving the event as a plain log line.
    pub fn take_payload(&mut self) -> Payload {
        std::mem::take(&mut self.payload)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events of info level and above
        if self.event_type == EventType::Success && self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_payload_leaves_log_line() {
        let mut event = Event::conditions_loaded(vec![]);
        assert_eq!(event.take_payload(), Payload::AlertConditions(vec![]));
        assert_eq!(event.payload, Payload::None);
        assert_eq!(event.msg, "Loaded 0 alert conditions");
    }

    #[test]
    fn mutation_message_names_operation_and_collection() {
        let event = Event::mutated(
            Collection::Portfolio,
            Operation::Delete,
            "Portfolio item deleted".to_string(),
        );
        assert_eq!(event.msg, "Delete portfolio: Portfolio item deleted");
        assert!(event.should_display());
    }
}
