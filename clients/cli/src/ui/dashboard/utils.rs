//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Collection;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Color;

/// Get a ratatui color for the collection an event concerns
pub fn get_collection_color(collection: &Collection) -> Color {
    match collection {
        Collection::Portfolio => Color::Cyan,
        Collection::TriggeredAlerts => Color::Yellow,
        Collection::AlertConditions => Color::Green,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some(date_part) = timestamp.split(' ').next() {
        if let Some(time_part) = timestamp.split(' ').nth(1) {
            // Extract MM-DD from date and HH:MM:SS from time
            if let Some(month_day) = date_part.get(5..10) {
                if let Some(hour_min_sec) = time_part.get(0..8) {
                    return format!("{} {}", month_day, hour_min_sec);
                }
            }
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    // Replace verbose reqwest transport errors, keeping the operation prefix
    if let Some((prefix, detail)) = msg.split_once("Reqwest error: ") {
        if detail.contains("error sending request") {
            return format!("{}service unreachable", prefix);
        }
        if detail.contains("timed out") {
            return format!("{}request timed out", prefix);
        }
    }
    // Return original message if no HTTP error pattern detected
    msg.to_string()
}

/// A rectangle of the given percentage size centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
