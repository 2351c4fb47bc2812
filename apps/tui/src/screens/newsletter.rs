//! "Newsletter" screen — single email field posted to the subscribe webhook.

use avagenc_core::{Notice, SubscribeForm};
use avagenc_shared::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::Action;
use crate::widgets::focus_style;

pub(crate) struct NewsletterScreen {
    form: SubscribeForm,
    editing: bool,
}

impl NewsletterScreen {
    pub(crate) fn new() -> Self {
        Self {
            form: SubscribeForm::new(),
            editing: false,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    /// Apply the webhook outcome and return the status-bar message.
    pub(crate) fn finish_submit(&mut self, result: Result<()>) -> String {
        self.form.finish_submit(result);
        self.form
            .notice()
            .map(|n| n.text().to_string())
            .unwrap_or_default()
    }

    fn submit(&mut self) -> Action {
        match self.form.begin_submit() {
            Some(email) => Action::Subscribe(email),
            None => Action::None,
        }
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action {
        if self.editing {
            match code {
                KeyCode::Esc => self.editing = false,
                KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.editing = false;
                    return self.submit();
                }
                KeyCode::Enter => {
                    self.editing = false;
                    return self.submit();
                }
                KeyCode::Backspace => {
                    self.form.email.pop();
                }
                KeyCode::Char(c) => self.form.email.push(c),
                _ => {}
            }
            return Action::None;
        }

        match code {
            KeyCode::Enter | KeyCode::Char('e') if !self.form.is_submitting() => {
                self.editing = true;
            }
            KeyCode::Char('s') => return self.submit(),
            _ => {}
        }
        Action::None
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(4), // Pitch
                Constraint::Length(3), // Email
                Constraint::Length(2), // Action hint
                Constraint::Min(1),    // Notice
            ])
            .split(area);

        let pitch = Paragraph::new(vec![
            Line::from("Stay Updated").style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(""),
            Line::from(
                "Get the latest insights on AI, automation, and technology delivered to your inbox.",
            ),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(pitch, chunks[0]);

        let email = if self.form.email.is_empty() && !self.editing {
            Span::styled("Enter your email address", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.form.email.as_str())
        };
        let input = Paragraph::new(Line::from(email)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Email ")
                .border_style(focus_style(true, self.editing)),
        );
        f.render_widget(input, chunks[1]);

        let hint = if self.editing {
            "Type to edit · Enter or Ctrl-S to subscribe · Esc to stop editing"
        } else {
            "Enter to edit · s to subscribe"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[2]);

        let (text, style) = match (self.form.is_submitting(), self.form.notice()) {
            (true, _) => ("Subscribing...", Style::default().fg(Color::Yellow)),
            (false, Some(notice @ Notice::Success(_))) => {
                (notice.text(), Style::default().fg(Color::Green))
            }
            (false, Some(notice @ Notice::Error(_))) => {
                (notice.text(), Style::default().fg(Color::Red))
            }
            (false, None) => ("", Style::default()),
        };
        let notice = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(notice, chunks[3]);
    }
}
