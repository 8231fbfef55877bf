//! Dashboard state update logic
//!
//! Applies request results to the dashboard state.

use super::forms::FormKind;
use super::state::DashboardState;

use crate::events::{Collection, Event, EventType, Operation, Payload};
use crate::workers::Request;

impl DashboardState {
    /// Apply every queued event in arrival order.
    pub fn update(&mut self) {
        // Process all queued events one by one
        while let Some(mut event) = self.pending_events.pop_front() {
            let payload = event.take_payload();
            self.process_event(&event, payload);
            self.add_to_activity_log(event);
        }
    }

    /// Process a single event and update relevant state
    fn process_event(&mut self, event: &Event, payload: Payload) {
        // Failures only reach the activity log; the tables keep their last
        // good contents.
        if event.event_type == EventType::Error {
            return;
        }

        match payload {
            Payload::Portfolios(entries) => {
                self.portfolios = entries;
            }
            Payload::TriggeredAlerts(alerts) => {
                self.alerts = self.make_alert_cards(alerts);
            }
            Payload::AlertConditions(conditions) => {
                self.conditions = conditions;
            }
            Payload::Message(message) => self.handle_mutation(event, message),
            Payload::None => {}
        }
        self.clamp_selections();
    }

    /// Shows the server's message, resets the submitting form and reloads
    /// the affected collection.
    fn handle_mutation(&mut self, event: &Event, message: String) {
        self.notifications.push_back(message);

        match event.collection {
            Collection::Portfolio => {
                if matches!(event.operation, Operation::Create | Operation::Update) {
                    self.portfolio_form.reset();
                    self.close_form_if(FormKind::Portfolio);
                }
                self.request_portfolios();
            }
            Collection::AlertConditions => {
                if event.operation == Operation::Create {
                    self.condition_form.reset();
                    self.close_form_if(FormKind::AlertCondition);
                }
                self.queue_request(Request::ListAlertConditions);
            }
            Collection::TriggeredAlerts => {}
        }
    }

    fn close_form_if(&mut self, kind: FormKind) {
        if self.open_form == Some(kind) {
            self.open_form = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::logging::LogLevel;
    use crate::models::{AlertCondition, PortfolioEntry, PortfolioPayload, Scalar, TriggeredAlert};
    use crate::ui::app::UIConfig;
    use std::time::Instant;

    fn state() -> DashboardState {
        let mut state = DashboardState::new(
            Environment::Local,
            Instant::now(),
            UIConfig::default(),
        );
        state.take_requests();
        state
    }

    fn entry(id: &str, user: &str, symbol: &str, quantity: i64) -> PortfolioEntry {
        PortfolioEntry {
            portfolio_id: id.to_string(),
            user_id: user.to_string(),
            stock_symbol: symbol.to_string(),
            quantity: Some(Scalar::from(quantity)),
            current_price: None,
        }
    }

    fn alert(symbol: &str) -> TriggeredAlert {
        TriggeredAlert {
            stock_symbol: symbol.to_string(),
            condition: "above".to_string(),
            threshold: Some(Scalar::from(100)),
            price: Some(Scalar::from(120)),
        }
    }

    #[test]
    fn new_state_queues_initial_loads() {
        let mut state = DashboardState::new(
            Environment::Local,
            Instant::now(),
            UIConfig {
                default_user_id: Some("u1".to_string()),
                ..UIConfig::default()
            },
        );
        assert_eq!(
            state.take_requests(),
            vec![
                Request::ListPortfolios {
                    user_id: Some("u1".to_string())
                },
                Request::ListAlertConditions,
            ]
        );
        assert!(state.take_requests().is_empty());
    }

    #[test]
    fn loads_replace_previous_contents() {
        let mut state = state();
        state.add_event(Event::portfolios_loaded(vec![
            entry("p1", "u1", "AAPL", 10),
            entry("p2", "u1", "MSFT", 5),
        ]));
        state.update();
        assert_eq!(state.portfolios.len(), 2);

        state.portfolio_selected = 1;
        state.add_event(Event::portfolios_loaded(vec![entry("p3", "u2", "TSLA", 1)]));
        state.update();

        assert_eq!(state.portfolios, vec![entry("p3", "u2", "TSLA", 1)]);
        assert_eq!(state.portfolio_selected, 0);
    }

    #[test]
    // Responses are applied in arrival order, so a late stale list wins.
    fn last_arrival_wins() {
        let mut state = state();
        state.add_event(Event::conditions_loaded(vec![AlertCondition {
            alert_id: "new".to_string(),
            stock_symbol: "AAPL".to_string(),
            condition_type: "above".to_string(),
            threshold: None,
        }]));
        state.add_event(Event::conditions_loaded(vec![]));
        state.update();
        assert!(state.conditions.is_empty());
    }

    #[test]
    fn failed_load_keeps_stale_rows_and_logs() {
        let mut state = state();
        state.add_event(Event::alerts_loaded(vec![alert("AAPL"), alert("NVDA")]));
        state.update();

        state.add_event(Event::failed(
            Collection::TriggeredAlerts,
            Operation::List,
            "connection refused".to_string(),
            LogLevel::Warn,
        ));
        state.update();

        assert_eq!(state.alerts.len(), 2);
        assert!(state.notifications.is_empty());
        let last = state.activity_logs.back().unwrap();
        assert_eq!(last.event_type, EventType::Error);
        assert!(state.take_requests().is_empty());
    }

    #[test]
    fn reloaded_alerts_get_fresh_keys() {
        let mut state = state();
        state.add_event(Event::alerts_loaded(vec![alert("AAPL")]));
        state.update();
        let first_key = state.alerts[0].key;

        state.add_event(Event::alerts_loaded(vec![alert("AAPL")]));
        state.update();
        assert_ne!(state.alerts[0].key, first_key);
    }

    #[test]
    fn portfolio_create_notifies_resets_form_and_refreshes_unfiltered() {
        let mut state = state();
        state.portfolio_form.set_value(0, "u1");
        state.open_form = Some(FormKind::Portfolio);

        state.add_event(Event::mutated(
            Collection::Portfolio,
            Operation::Create,
            "Portfolio item added".to_string(),
        ));
        state.update();

        assert_eq!(state.notification(), Some("Portfolio item added"));
        assert_eq!(state.open_form, None);
        assert_eq!(state.portfolio_form.value(0), "");
        assert_eq!(
            state.take_requests(),
            vec![Request::ListPortfolios { user_id: None }]
        );
    }

    #[test]
    fn portfolio_delete_keeps_filter_for_refresh() {
        let mut state = state();
        state.portfolio_form.set_value(0, "u1");

        state.add_event(Event::mutated(
            Collection::Portfolio,
            Operation::Delete,
            "Portfolio item deleted".to_string(),
        ));
        state.update();

        assert_eq!(
            state.take_requests(),
            vec![Request::ListPortfolios {
                user_id: Some("u1".to_string())
            }]
        );
    }

    #[test]
    fn create_then_refresh_shows_new_row() {
        let mut state = state();
        state.portfolio_form.set_value(0, "u1");
        state.portfolio_form.set_value(1, "AAPL");
        state.portfolio_form.set_value(2, "10");
        assert_eq!(
            state.portfolio_form.to_request(),
            Request::CreatePortfolio(PortfolioPayload {
                user_id: "u1".to_string(),
                stock_symbol: "AAPL".to_string(),
                quantity: Some(10),
            })
        );

        state.add_event(Event::mutated(
            Collection::Portfolio,
            Operation::Create,
            "Portfolio item added".to_string(),
        ));
        state.update();
        assert_eq!(state.take_requests().len(), 1);

        state.add_event(Event::portfolios_loaded(vec![entry("p1", "u1", "AAPL", 10)]));
        state.update();
        let row = &state.portfolios[0];
        assert_eq!(
            (row.user_id.as_str(), row.stock_symbol.as_str()),
            ("u1", "AAPL")
        );
        assert_eq!(row.quantity, Some(Scalar::from(10)));
    }

    #[test]
    fn condition_delete_refreshes_conditions() {
        let mut state = state();
        state.add_event(Event::mutated(
            Collection::AlertConditions,
            Operation::Delete,
            "Alert condition deleted".to_string(),
        ));
        state.update();
        assert_eq!(state.take_requests(), vec![Request::ListAlertConditions]);
    }
}
