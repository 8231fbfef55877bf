//! Dashboard actions
//!
//! Key presses are translated into actions carrying the identifiers they act
//! on, then applied to the state.

use super::forms::FormKind;
use super::state::{DashboardState, Panel};
use crate::models::PortfolioEntry;
use crate::workers::Request;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    FocusNext,
    SelectPrev,
    SelectNext,
    RefreshAll,
    OpenForm(FormKind),
    /// Carries the row itself; rows without an id are still told apart.
    EditPortfolio(Box<PortfolioEntry>),
    DeletePortfolio { portfolio_id: String },
    DeleteCondition { alert_id: String },
    DismissAlert { key: u64 },
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormCycleChoice { forward: bool },
    SubmitForm,
    CloseForm,
    AcknowledgeNotification,
}

impl DashboardState {
    /// Maps a key press to an action in the current context. The
    /// notification popup and open forms capture input first.
    pub fn action_for_key(&self, key: KeyEvent) -> Option<Action> {
        if !self.notifications.is_empty() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                    Some(Action::AcknowledgeNotification)
                }
                _ => None,
            };
        }

        if self.open_form.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseForm),
                KeyCode::Enter => Some(Action::SubmitForm),
                KeyCode::BackTab => Some(Action::FormPrevField),
                KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                    Some(Action::FormPrevField)
                }
                KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
                KeyCode::Up => Some(Action::FormPrevField),
                KeyCode::Left => Some(Action::FormCycleChoice { forward: false }),
                KeyCode::Right => Some(Action::FormCycleChoice { forward: true }),
                KeyCode::Backspace => Some(Action::FormBackspace),
                KeyCode::Char(c) => Some(Action::FormInput(c)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Char('r') => Some(Action::RefreshAll),
            KeyCode::Char('n') => match self.focus {
                Panel::Portfolio => Some(Action::OpenForm(FormKind::Portfolio)),
                Panel::Conditions => Some(Action::OpenForm(FormKind::AlertCondition)),
                Panel::Alerts => None,
            },
            KeyCode::Char('e') if self.focus == Panel::Portfolio => {
                self.selected_portfolio()
                    .map(|entry| Action::EditPortfolio(Box::new(entry.clone())))
            }
            KeyCode::Char('d') | KeyCode::Delete => match self.focus {
                Panel::Portfolio => self.selected_portfolio().map(|entry| {
                    Action::DeletePortfolio {
                        portfolio_id: entry.portfolio_id.clone(),
                    }
                }),
                Panel::Conditions => {
                    self.selected_condition()
                        .map(|condition| Action::DeleteCondition {
                            alert_id: condition.alert_id.clone(),
                        })
                }
                Panel::Alerts => None,
            },
            KeyCode::Char('x') if self.focus == Panel::Alerts => self
                .selected_alert()
                .map(|card| Action::DismissAlert { key: card.key }),
            _ => None,
        }
    }

    /// Applies an action. Returns `false` when the dashboard should exit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::FocusNext => self.focus = self.focus.next(),
            Action::SelectPrev => self.move_selection(false),
            Action::SelectNext => self.move_selection(true),
            Action::RefreshAll => {
                self.request_portfolios();
                self.queue_request(Request::ListTriggeredAlerts);
                self.queue_request(Request::ListAlertConditions);
            }
            Action::OpenForm(kind) => {
                // A fresh form always creates, even after a cancelled edit
                self.form_mut(kind).portfolio_id = None;
                self.open_form = Some(kind);
            }
            Action::EditPortfolio(entry) => {
                self.portfolio_form.load_entry(&entry);
                self.open_form = Some(FormKind::Portfolio);
            }
            Action::DeletePortfolio { portfolio_id } => {
                self.queue_request(Request::DeletePortfolio { portfolio_id });
            }
            Action::DeleteCondition { alert_id } => {
                self.queue_request(Request::DeleteAlertCondition { alert_id });
            }
            Action::DismissAlert { key } => {
                self.alerts.retain(|card| card.key != key);
                self.clamp_selections();
            }
            Action::FormInput(c) => self.with_open_form(|form| form.input(c)),
            Action::FormBackspace => self.with_open_form(|form| form.backspace()),
            Action::FormNextField => self.with_open_form(|form| form.next_field()),
            Action::FormPrevField => self.with_open_form(|form| form.prev_field()),
            Action::FormCycleChoice { forward } => {
                self.with_open_form(|form| form.cycle_choice(forward))
            }
            Action::SubmitForm => {
                if let Some(kind) = self.open_form {
                    let request = self.form(kind).to_request();
                    self.queue_request(request);
                }
            }
            Action::CloseForm => self.open_form = None,
            Action::AcknowledgeNotification => {
                self.notifications.pop_front();
            }
        }
        true
    }

    /// Convenience for the UI loop: map and apply in one step.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.action_for_key(key) {
            Some(action) => self.apply(action),
            None => true,
        }
    }

    fn with_open_form(&mut self, f: impl FnOnce(&mut super::forms::Form)) {
        if let Some(kind) = self.open_form {
            f(self.form_mut(kind));
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let (selected, len) = match self.focus {
            Panel::Portfolio => (&mut self.portfolio_selected, self.portfolios.len()),
            Panel::Alerts => (&mut self.alert_selected, self.alerts.len()),
            Panel::Conditions => (&mut self.condition_selected, self.conditions.len()),
        };
        if len == 0 {
            *selected = 0;
        } else if forward {
            *selected = (*selected + 1).min(len - 1);
        } else {
            *selected = selected.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::events::Event;
    use crate::models::{AlertCondition, PortfolioEntry, PortfolioPayload, Scalar, TriggeredAlert};
    use crate::ui::app::UIConfig;
    use std::time::Instant;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_state() -> DashboardState {
        let mut state =
            DashboardState::new(Environment::Local, Instant::now(), UIConfig::default());
        state.take_requests();
        state.add_event(Event::portfolios_loaded(vec![
            PortfolioEntry {
                portfolio_id: "p1".to_string(),
                user_id: "u1".to_string(),
                stock_symbol: "AAPL".to_string(),
                quantity: Some(Scalar::from(10)),
                current_price: None,
            },
            PortfolioEntry {
                portfolio_id: "p2".to_string(),
                user_id: "u1".to_string(),
                stock_symbol: "MSFT".to_string(),
                quantity: Some(Scalar::from(4)),
                current_price: Some(Scalar::from("410.2")),
            },
        ]));
        state.add_event(Event::alerts_loaded(
            ["AAPL", "NVDA", "TSLA"]
                .iter()
                .map(|s| TriggeredAlert {
                    stock_symbol: s.to_string(),
                    condition: "above".to_string(),
                    threshold: Some(Scalar::from(1)),
                    price: Some(Scalar::from(2)),
                })
                .collect(),
        ));
        state.add_event(Event::conditions_loaded(vec![AlertCondition {
            alert_id: "a1".to_string(),
            stock_symbol: "AAPL".to_string(),
            condition_type: "below".to_string(),
            threshold: Some(Scalar::from(90)),
        }]));
        state.update();
        state
    }

    #[test]
    fn delete_is_keyed_by_selected_row_id() {
        let mut state = loaded_state();
        state.handle_key(key(KeyCode::Down));
        assert_eq!(
            state.action_for_key(key(KeyCode::Char('d'))),
            Some(Action::DeletePortfolio {
                portfolio_id: "p2".to_string()
            })
        );
        state.handle_key(key(KeyCode::Char('d')));
        assert_eq!(
            state.take_requests(),
            vec![Request::DeletePortfolio {
                portfolio_id: "p2".to_string()
            }]
        );
    }

    #[test]
    fn dismiss_removes_only_that_alert_and_sends_nothing() {
        let mut state = loaded_state();
        state.apply(Action::FocusNext);
        state.handle_key(key(KeyCode::Down));
        let dismissed = state.selected_alert().unwrap().key;

        state.handle_key(key(KeyCode::Char('x')));

        let remaining: Vec<_> = state
            .alerts
            .iter()
            .map(|c| c.alert.stock_symbol.as_str())
            .collect();
        assert_eq!(remaining, vec!["AAPL", "TSLA"]);
        assert!(state.alerts.iter().all(|c| c.key != dismissed));
        assert!(state.take_requests().is_empty());
    }

    #[test]
    fn edit_fills_form_and_submit_updates() {
        let mut state = loaded_state();
        state.handle_key(key(KeyCode::Char('e')));
        assert_eq!(state.open_form, Some(FormKind::Portfolio));
        assert_eq!(state.portfolio_form.value(1), "AAPL");

        // Move to quantity and change 10 -> 12
        state.handle_key(key(KeyCode::Tab));
        state.handle_key(key(KeyCode::Tab));
        state.handle_key(key(KeyCode::Backspace));
        state.handle_key(key(KeyCode::Char('2')));
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(
            state.take_requests(),
            vec![Request::UpdatePortfolio {
                portfolio_id: "p1".to_string(),
                payload: PortfolioPayload {
                    user_id: "u1".to_string(),
                    stock_symbol: "AAPL".to_string(),
                    quantity: Some(12),
                },
            }]
        );
    }

    #[test]
    fn edit_loads_the_selected_row_when_ids_are_missing() {
        let mut state = loaded_state();
        for entry in &mut state.portfolios {
            entry.portfolio_id.clear();
        }
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Char('e')));

        assert_eq!(state.open_form, Some(FormKind::Portfolio));
        assert_eq!(state.portfolio_form.value(1), "MSFT");
        assert_eq!(state.portfolio_form.value(2), "4");
    }

    #[test]
    fn new_form_after_cancelled_edit_creates() {
        let mut state = loaded_state();
        state.handle_key(key(KeyCode::Char('e')));
        state.handle_key(key(KeyCode::Esc));
        state.handle_key(key(KeyCode::Char('n')));
        state.handle_key(key(KeyCode::Enter));

        assert!(matches!(
            state.take_requests().as_slice(),
            [Request::CreatePortfolio(_)]
        ));
    }

    #[test]
    fn open_form_captures_quit_key() {
        let mut state = loaded_state();
        state.handle_key(key(KeyCode::Char('n')));
        assert!(state.handle_key(key(KeyCode::Char('q'))));
        assert_eq!(state.portfolio_form.value(0), "q");
        state.handle_key(key(KeyCode::Esc));
        assert_eq!(state.open_form, None);
        assert!(!state.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn each_server_message_needs_its_own_acknowledgement() {
        let mut state = loaded_state();
        state.add_event(Event::mutated(
            crate::events::Collection::Portfolio,
            crate::events::Operation::Delete,
            "Portfolio item deleted".to_string(),
        ));
        state.add_event(Event::mutated(
            crate::events::Collection::AlertConditions,
            crate::events::Operation::Delete,
            "Alert condition deleted".to_string(),
        ));
        state.update();

        assert_eq!(state.notification(), Some("Portfolio item deleted"));
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.notification(), Some("Alert condition deleted"));
        assert_eq!(state.action_for_key(key(KeyCode::Char('q'))), None);
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.notification(), None);
        assert!(!state.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn notification_blocks_until_acknowledged() {
        let mut state = loaded_state();
        state.notifications.push_back("Alert condition created".to_string());

        assert_eq!(state.action_for_key(key(KeyCode::Char('d'))), None);
        assert_eq!(state.action_for_key(key(KeyCode::Char('q'))), None);
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.notification(), None);
    }

    #[test]
    fn condition_delete_uses_alert_id() {
        let mut state = loaded_state();
        state.apply(Action::FocusNext);
        state.apply(Action::FocusNext);
        state.handle_key(key(KeyCode::Char('d')));
        assert_eq!(
            state.take_requests(),
            vec![Request::DeleteAlertCondition {
                alert_id: "a1".to_string()
            }]
        );
    }

    #[test]
    fn refresh_requests_all_collections() {
        let mut state = loaded_state();
        state.handle_key(key(KeyCode::Char('r')));
        assert_eq!(
            state.take_requests(),
            vec![
                Request::ListPortfolios { user_id: None },
                Request::ListTriggeredAlerts,
                Request::ListAlertConditions,
            ]
        );
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut state = loaded_state();
        for _ in 0..5 {
            state.handle_key(key(KeyCode::Down));
        }
        assert_eq!(state.portfolio_selected, 1);
        for _ in 0..5 {
            state.handle_key(key(KeyCode::Up));
        }
        assert_eq!(state.portfolio_selected, 0);
    }
}
