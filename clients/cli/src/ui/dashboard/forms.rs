//! Dashboard input forms
//!
//! The portfolio form doubles as the portfolio filter: whatever is typed in
//! its user field is sent as `user_id` on every portfolio list request.

use crate::models::{
    AlertConditionPayload, PortfolioEntry, PortfolioPayload, display_or, parse_quantity,
    parse_threshold,
};
use crate::workers::Request;

/// Comparisons the alert service evaluates.
pub const CONDITION_TYPES: &[&str] = &["above", "below"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Portfolio,
    AlertCondition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    /// Fixed options cycled with arrow keys instead of typed.
    pub choices: Option<&'static [&'static str]>,
}

impl TextField {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            choices: None,
        }
    }

    fn choice(label: &'static str, choices: &'static [&'static str]) -> Self {
        Self {
            label,
            value: choices.first().map(|c| c.to_string()).unwrap_or_default(),
            choices: Some(choices),
        }
    }

    fn clear(&mut self) {
        self.value = match self.choices {
            Some(choices) => choices.first().map(|c| c.to_string()).unwrap_or_default(),
            None => String::new(),
        };
    }

    fn cycle(&mut self, forward: bool) {
        let Some(choices) = self.choices else {
            return;
        };
        if choices.is_empty() {
            return;
        }
        let current = choices.iter().position(|c| *c == self.value).unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };
        self.value = choices[next].to_string();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<TextField>,
    pub focused: usize,
    /// Set while editing an existing portfolio entry; turns submit into an update.
    pub portfolio_id: Option<String>,
}

// Field positions
const USER_ID: usize = 0;
const STOCK_SYMBOL: usize = 1;
const QUANTITY: usize = 2;

const ALERT_ID: usize = 0;
const CONDITION_TYPE: usize = 2;
const THRESHOLD: usize = 3;

impl Form {
    pub fn portfolio() -> Self {
        Self {
            kind: FormKind::Portfolio,
            fields: vec![
                TextField::text("User ID"),
                TextField::text("Stock Symbol"),
                TextField::text("Quantity"),
            ],
            focused: 0,
            portfolio_id: None,
        }
    }

    pub fn alert_condition() -> Self {
        Self {
            kind: FormKind::AlertCondition,
            fields: vec![
                TextField::text("Alert ID"),
                TextField::text("Stock Symbol"),
                TextField::choice("Condition", CONDITION_TYPES),
                TextField::text("Threshold"),
            ],
            focused: 0,
            portfolio_id: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match (self.kind, &self.portfolio_id) {
            (FormKind::Portfolio, Some(_)) => "EDIT HOLDING",
            (FormKind::Portfolio, None) => "ADD HOLDING",
            (FormKind::AlertCondition, _) => "ADD ALERT CONDITION",
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    pub fn input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if field.choices.is_some() {
                if c == ' ' {
                    field.cycle(true);
                }
            } else {
                field.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if field.choices.is_none() {
                field.value.pop();
            }
        }
    }

    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.cycle(forward);
        }
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    /// Clears every field, including the hidden portfolio id.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.focused = 0;
        self.portfolio_id = None;
    }

    /// Copies a portfolio row into the form for editing.
    pub fn load_entry(&mut self, entry: &PortfolioEntry) {
        self.portfolio_id = Some(entry.portfolio_id.clone());
        self.set_value(USER_ID, entry.user_id.clone());
        self.set_value(STOCK_SYMBOL, entry.stock_symbol.clone());
        self.set_value(QUANTITY, display_or(&entry.quantity, ""));
        self.focused = 0;
    }

    /// The portfolio filter: the user field, when non-empty.
    pub fn user_filter(&self) -> Option<String> {
        if self.kind != FormKind::Portfolio {
            return None;
        }
        let user_id = self.value(USER_ID);
        if user_id.is_empty() {
            None
        } else {
            Some(user_id.to_string())
        }
    }

    /// Builds the request this form submits.
    pub fn to_request(&self) -> Request {
        match self.kind {
            FormKind::Portfolio => {
                let payload = PortfolioPayload {
                    user_id: self.value(USER_ID).to_string(),
                    stock_symbol: self.value(STOCK_SYMBOL).to_string(),
                    quantity: parse_quantity(self.value(QUANTITY)),
                };
                match self.portfolio_id.as_deref().filter(|id| !id.is_empty()) {
                    Some(portfolio_id) => Request::UpdatePortfolio {
                        portfolio_id: portfolio_id.to_string(),
                        payload,
                    },
                    None => Request::CreatePortfolio(payload),
                }
            }
            FormKind::AlertCondition => Request::CreateAlertCondition(AlertConditionPayload {
                alert_id: self.value(ALERT_ID).to_string(),
                stock_symbol: self.value(STOCK_SYMBOL).to_string(),
                condition_type: self.value(CONDITION_TYPE).to_string(),
                threshold: parse_threshold(self.value(THRESHOLD)),
            }),
        }
    }
}
