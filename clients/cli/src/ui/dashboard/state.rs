//! Dashboard state management
//!
//! Everything the dashboard shows lives here. Key presses and request
//! results mutate it; `render_dashboard` only reads it.

use super::forms::{Form, FormKind};
use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event;
use crate::models::{AlertCondition, PortfolioEntry, TriggeredAlert};
use crate::ui::app::UIConfig;
use crate::workers::Request;

use std::collections::VecDeque;
use std::time::Instant;

/// The panel that keyboard selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Portfolio,
    Alerts,
    Conditions,
}

impl Panel {
    pub fn next(self) -> Self {
        match self {
            Panel::Portfolio => Panel::Alerts,
            Panel::Alerts => Panel::Conditions,
            Panel::Conditions => Panel::Portfolio,
        }
    }
}

/// A triggered alert on screen, with a key that survives sibling dismissals.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertCard {
    pub key: u64,
    pub alert: TriggeredAlert,
}

#[derive(Debug)]
pub struct DashboardState {
    /// Where the collections are served from.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    pub with_background_color: bool,
    pub alert_poll_secs: u64,

    /// Latest portfolio list, replaced wholesale on every load.
    pub portfolios: Vec<PortfolioEntry>,
    /// Latest triggered alerts, minus any dismissed since that load.
    pub alerts: Vec<AlertCard>,
    /// Latest alert conditions.
    pub conditions: Vec<AlertCondition>,

    pub focus: Panel,
    pub portfolio_selected: usize,
    pub alert_selected: usize,
    pub condition_selected: usize,

    pub portfolio_form: Form,
    pub condition_form: Form,
    /// The form currently shown as a popup, if any.
    pub open_form: Option<FormKind>,

    /// Server messages waiting to be acknowledged, oldest first. The front
    /// one is shown and blocks other input.
    pub notifications: VecDeque<String>,

    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<Event>,
    /// Activity logs for display
    pub activity_logs: VecDeque<Event>,

    /// Requests produced by state changes, drained by the UI loop.
    outbox: Vec<Request>,
    next_alert_key: u64,
}

impl DashboardState {
    /// Creates the dashboard state and queues the initial portfolio and
    /// alert-condition loads. Triggered alerts arrive from the poller.
    pub fn new(environment: Environment, start_time: Instant, ui_config: UIConfig) -> Self {
        let mut portfolio_form = Form::portfolio();
        if let Some(user_id) = ui_config.default_user_id {
            portfolio_form.set_value(0, user_id);
        }

        let mut state = Self {
            environment,
            start_time,
            with_background_color: ui_config.with_background_color,
            alert_poll_secs: ui_config.alert_poll_secs,
            portfolios: Vec::new(),
            alerts: Vec::new(),
            conditions: Vec::new(),
            focus: Panel::Portfolio,
            portfolio_selected: 0,
            alert_selected: 0,
            condition_selected: 0,
            portfolio_form,
            condition_form: Form::alert_condition(),
            open_form: None,
            notifications: VecDeque::new(),
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            outbox: Vec::new(),
            next_alert_key: 0,
        };
        state.request_portfolios();
        state.queue_request(Request::ListAlertConditions);
        state
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: Event) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: Event) {
        self.pending_events.push_back(event);
    }

    pub fn queue_request(&mut self, request: Request) {
        self.outbox.push(request);
    }

    /// Queues a portfolio load using the current user filter.
    pub fn request_portfolios(&mut self) {
        let user_id = self.portfolio_form.user_filter();
        self.queue_request(Request::ListPortfolios { user_id });
    }

    /// Hands over every request queued since the last call.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    /// Wraps freshly loaded alerts with new local keys.
    pub(super) fn make_alert_cards(&mut self, alerts: Vec<TriggeredAlert>) -> Vec<AlertCard> {
        alerts
            .into_iter()
            .map(|alert| {
                let key = self.next_alert_key;
                self.next_alert_key += 1;
                AlertCard { key, alert }
            })
            .collect()
    }

    pub fn form(&self, kind: FormKind) -> &Form {
        match kind {
            FormKind::Portfolio => &self.portfolio_form,
            FormKind::AlertCondition => &self.condition_form,
        }
    }

    pub fn form_mut(&mut self, kind: FormKind) -> &mut Form {
        match kind {
            FormKind::Portfolio => &mut self.portfolio_form,
            FormKind::AlertCondition => &mut self.condition_form,
        }
    }

    /// The message currently shown, if any.
    pub fn notification(&self) -> Option<&str> {
        self.notifications.front().map(String::as_str)
    }

    pub fn selected_portfolio(&self) -> Option<&PortfolioEntry> {
        self.portfolios.get(self.portfolio_selected)
    }

    pub fn selected_alert(&self) -> Option<&AlertCard> {
        self.alerts.get(self.alert_selected)
    }

    pub fn selected_condition(&self) -> Option<&AlertCondition> {
        self.conditions.get(self.condition_selected)
    }

    /// Keeps every selection inside its collection after a reload.
    pub(super) fn clamp_selections(&mut self) {
        self.portfolio_selected = clamp(self.portfolio_selected, self.portfolios.len());
        self.alert_selected = clamp(self.alert_selected, self.alerts.len());
        self.condition_selected = clamp(self.condition_selected, self.conditions.len());
    }
}

fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
