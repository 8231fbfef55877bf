//! Dashboard header component
//!
//! Renders the title and connection summary

use super::super::state::DashboardState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render header with title and the gateway being watched.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(format!("FOLIO DASHBOARD v{}", version))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let filter = state
        .portfolio_form
        .user_filter()
        .map(|user| format!("user {}", user))
        .unwrap_or_else(|| "all users".to_string());
    let uptime = state.start_time.elapsed().as_secs();
    let summary = format!(
        "{} | Holdings: {} ({}) | Alerts every {}s | Up {}m {}s",
        state.environment.api_url(),
        state.portfolios.len(),
        filter,
        state.alert_poll_secs,
        uptime / 60,
        uptime % 60
    );
    let summary = Paragraph::new(summary)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(summary, header_chunks[1]);
}
