//! Modal popups: the entry forms and the server message notification

use super::super::forms::Form;
use super::super::state::DashboardState;
use super::super::utils::centered_rect;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

/// Render whichever popup is active. The notification sits above a form.
pub fn render_popups(f: &mut Frame, state: &DashboardState) {
    if let Some(kind) = state.open_form {
        render_form(f, state.form(kind));
    }
    if let Some(message) = state.notification() {
        render_notification(f, message, state.notifications.len() - 1);
    }
}

fn render_form(f: &mut Frame, form: &Form) {
    let area = centered_rect(60, 50, f.area());

    let mut lines = Vec::new();
    for (index, field) in form.fields.iter().enumerate() {
        let focused = index == form.focused;
        let label_style = if focused {
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value = match (field.choices.is_some(), focused) {
            (true, _) => format!("< {} >", field.value),
            (false, true) => format!("{}_", field.value),
            (false, false) => field.value.clone(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>14}: ", field.label), label_style),
            Span::styled(value, Style::default().fg(Color::White)),
        ]));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(form.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightCyan))
        .padding(Padding::uniform(1));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_notification(f: &mut Frame, message: &str, queued: usize) {
    let area = centered_rect(50, 25, f.area());

    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .title(match queued {
            0 => "MESSAGE".to_string(),
            n => format!("MESSAGE ({} more)", n),
        })
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::LightYellow))
        .padding(Padding::uniform(1));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}
