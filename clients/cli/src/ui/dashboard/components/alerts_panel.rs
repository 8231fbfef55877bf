//! Triggered alerts panel

use super::super::state::{DashboardState, Panel};
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Padding};

/// Render one line per triggered alert, newest load only.
pub fn render_alerts_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let focused = state.focus == Panel::Alerts;

    let items: Vec<ListItem> = state
        .alerts
        .iter()
        .map(|card| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    "Alert! ",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(card.alert.to_string(), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let border_color = if focused { Color::LightCyan } else { Color::Cyan };
    let title = if state.alerts.is_empty() {
        "TRIGGERED ALERTS".to_string()
    } else {
        format!("TRIGGERED ALERTS ({})", state.alerts.len())
    };
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("× ")
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color))
                .padding(Padding::horizontal(1)),
        );

    let mut list_state = ListState::default();
    if focused && !state.alerts.is_empty() {
        list_state.select(Some(state.alert_selected));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}
