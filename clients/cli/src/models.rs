//! Dashboard view models
//!
//! Mirrors the JSON exchanged with the portfolio and alert services. Numeric
//! fields are decoded loosely because the services hand back numbers, numeric
//! strings, placeholder strings and nulls interchangeably.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// A JSON value rendered verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
    /// Arrays and objects, shown as compact JSON.
    Other(Value),
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", format_number(n)),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Flag(b) => write!(f, "{}", b),
            Scalar::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Integral floats print without a fractional part, so `150.0` reads `150`.
fn format_number(n: &serde_json::Number) -> String {
    if let Some(v) = n.as_f64().filter(|_| n.is_f64()) {
        if v.fract() == 0.0 && v.abs() < 1e15 {
            return format!("{}", v as i64);
        }
    }
    n.to_string()
}

/// Decodes any JSON value into display text. Text fields stored by other
/// clients may hold `null`, numbers or booleans.
fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => NULL_TEXT.to_string(),
        Value::Number(n) => format_number(&n),
        other => other.to_string(),
    })
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// Text shown for a numeric field the server sent back as `null`.
pub const NULL_TEXT: &str = "null";

/// Renders an optional scalar, falling back to `missing` when absent.
pub fn display_or(value: &Option<Scalar>, missing: &str) -> String {
    match value {
        Some(v) => v.to_string(),
        None => missing.to_string(),
    }
}

/// One holding row from `/api/portfolio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    #[serde(default, deserialize_with = "loose_text")]
    pub portfolio_id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub user_id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub stock_symbol: String,
    #[serde(default)]
    pub quantity: Option<Scalar>,
    #[serde(default)]
    pub current_price: Option<Scalar>,
}

/// A server-detected condition breach from `/api/alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlert {
    #[serde(default, deserialize_with = "loose_text")]
    pub stock_symbol: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub condition: String,
    #[serde(default)]
    pub threshold: Option<Scalar>,
    #[serde(default)]
    pub price: Option<Scalar>,
}

impl Display for TriggeredAlert {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is {} {}. Current price: {}",
            self.stock_symbol,
            self.condition,
            display_or(&self.threshold, NULL_TEXT),
            display_or(&self.price, NULL_TEXT)
        )
    }
}

/// A user-defined rule from `/api/alert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCondition {
    #[serde(default, deserialize_with = "loose_text")]
    pub alert_id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub stock_symbol: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub condition_type: String,
    #[serde(default)]
    pub threshold: Option<Scalar>,
}

/// Body for portfolio create and update.
///
/// An unparseable quantity is sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPayload {
    pub user_id: String,
    pub stock_symbol: String,
    pub quantity: Option<i64>,
}

/// Body for alert condition create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertConditionPayload {
    pub alert_id: String,
    pub stock_symbol: String,
    pub condition_type: String,
    pub threshold: Option<f64>,
}

/// Acknowledgement returned by every mutating endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerMessage {
    #[serde(default, deserialize_with = "loose_text")]
    pub message: String,
}

/// Parses the leading integer of `input`, ignoring any trailing garbage.
///
/// Returns `None` when no digits lead the input, which ends up as `null` on
/// the wire.
pub fn parse_quantity(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Parses the leading decimal of `input`, ignoring any trailing garbage.
///
/// Non-finite results are dropped since they have no JSON representation.
pub fn parse_threshold(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            mantissa_digits += 1;
        }
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
