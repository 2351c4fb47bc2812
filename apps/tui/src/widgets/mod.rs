//! Reusable TUI widgets and styles.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Bottom status bar.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {msg}"))
        .style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White),
        )
}

/// Border style for an input block: yellow while typing, cyan when focused.
pub(crate) fn focus_style(focused: bool, editing: bool) -> Style {
    match (focused, editing) {
        (true, true) => Style::default().fg(Color::Yellow),
        (true, false) => Style::default().fg(Color::Cyan),
        _ => Style::default(),
    }
}
