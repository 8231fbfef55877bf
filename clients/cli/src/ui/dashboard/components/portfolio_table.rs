//! Portfolio holdings table

use super::super::state::{DashboardState, Panel};
use crate::consts::cli_consts::MISSING_PRICE_PLACEHOLDER;
use crate::models::{NULL_TEXT, PortfolioEntry, display_or};
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

const HEADERS: [&str; 4] = ["User ID", "Stock Symbol", "Quantity", "Current Price"];

/// The visible cells of one holding.
pub fn portfolio_cells(entry: &PortfolioEntry) -> [String; 4] {
    [
        entry.user_id.clone(),
        entry.stock_symbol.clone(),
        display_or(&entry.quantity, NULL_TEXT),
        display_or(&entry.current_price, MISSING_PRICE_PLACEHOLDER),
    ]
}

pub fn render_portfolio_table(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let focused = state.focus == Panel::Portfolio;
    let rows: Vec<Row> = state
        .portfolios
        .iter()
        .map(|entry| Row::new(portfolio_cells(entry).map(Cell::from)))
        .collect();

    let header = Row::new(HEADERS.map(Cell::from)).style(
        Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD),
    );

    let border_color = if focused { Color::LightCyan } else { Color::Cyan };
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
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
            .title(format!("PORTFOLIO ({})", state.portfolios.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)),
    );

    let mut table_state = TableState::default();
    if focused && !state.portfolios.is_empty() {
        table_state.select(Some(state.portfolio_selected));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}
