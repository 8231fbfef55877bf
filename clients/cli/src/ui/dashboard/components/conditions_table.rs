//! Alert conditions table

use super::super::state::{DashboardState, Panel};
use crate::models::{AlertCondition, NULL_TEXT, display_or};
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

const HEADERS: [&str; 4] = ["Alert ID", "Symbol", "Condition", "Threshold"];

pub fn condition_cells(condition: &AlertCondition) -> [String; 4] {
    [
        condition.alert_id.clone(),
        condition.stock_symbol.clone(),
        condition.condition_type.clone(),
        display_or(&condition.threshold, NULL_TEXT),
    ]
}

pub fn render_conditions_table(
    f: &mut Frame,
    area: ratatui::layout::Rect,
    state: &DashboardState,
) {
    let focused = state.focus == Panel::Conditions;
    let rows: Vec<Row> = state
        .conditions
        .iter()
        .map(|condition| Row::new(condition_cells(condition).map(Cell::from)))
        .collect();

    let header = Row::new(HEADERS.map(Cell::from)).style(
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
    );

    let border_color = if focused { Color::LightCyan } else { Color::Cyan };
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .block(
        Block::default()
            .title(format!("ALERT CONDITIONS ({})", state.conditions.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)),
    );

    let mut table_state = TableState::default();
    if focused && !state.conditions.is_empty() {
        table_state.select(Some(state.condition_selected));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}
