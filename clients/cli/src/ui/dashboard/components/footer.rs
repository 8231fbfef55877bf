//! Dashboard footer component
//!
//! Renders the key bindings for the current context

use super::super::state::{DashboardState, Panel};
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Key hints for the current input context.
pub fn footer_text(state: &DashboardState) -> String {
    if state.notification().is_some() {
        return "[Enter] OK".to_string();
    }
    if state.open_form.is_some() {
        return "[Tab] Next field | [←/→] Change option | [Enter] Submit | [Esc] Cancel"
            .to_string();
    }
    let panel_keys = match state.focus {
        Panel::Portfolio => "[N] New | [E] Edit | [D] Delete",
        Panel::Alerts => "[X] Dismiss",
        Panel::Conditions => "[N] New | [D] Delete",
    };
    format!(
        "[Q] Quit | [Tab] Switch panel | [↑/↓] Select | {} | [R] Refresh",
        panel_keys
    )
}

/// Render footer.
pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let footer = Paragraph::new(footer_text(state))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
