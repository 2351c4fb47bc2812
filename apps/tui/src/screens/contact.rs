//! "Contact" screen — name, email, company, message, and send action.

use avagenc_core::{ContactForm, Notice};
use avagenc_shared::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::Action;
use crate::widgets::focus_style;

/// Which input field is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Company,
    Message,
}

impl Field {
    fn title(self) -> &'static str {
        match self {
            Self::Name => " Name ",
            Self::Email => " Email ",
            Self::Company => " Company (optional) ",
            Self::Message => " Message ",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Company,
            Self::Company => Self::Message,
            Self::Message => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Message,
            Self::Email => Self::Name,
            Self::Company => Self::Email,
            Self::Message => Self::Company,
        }
    }
}

pub(crate) struct ContactScreen {
    form: ContactForm,
    focused: Field,
    editing: bool,
}

impl ContactScreen {
    pub(crate) fn new() -> Self {
        Self {
            form: ContactForm::new(),
            focused: Field::Name,
            editing: false,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    /// Apply the webhook outcome and return the status-bar message.
    pub(crate) fn finish_submit(&mut self, result: Result<()>) -> String {
        self.form.finish_submit(result);
        if self.form.notice().is_some_and(Notice::is_success) {
            self.focused = Field::Name;
        }
        self.form
            .notice()
            .map(|n| n.text().to_string())
            .unwrap_or_default()
    }

    fn field(&self, field: Field) -> &str {
        let fields = &self.form.fields;
        match field {
            Field::Name => &fields.name,
            Field::Email => &fields.email,
            Field::Company => &fields.company,
            Field::Message => &fields.message,
        }
    }

    fn current_field_mut(&mut self) -> &mut String {
        let fields = &mut self.form.fields;
        match self.focused {
            Field::Name => &mut fields.name,
            Field::Email => &mut fields.email,
            Field::Company => &mut fields.company,
            Field::Message => &mut fields.message,
        }
    }

    fn submit(&mut self) -> Action {
        match self.form.begin_submit() {
            Some(request) => Action::SendContact(request),
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
                KeyCode::Tab => self.focused = self.focused.next(),
                KeyCode::BackTab => self.focused = self.focused.prev(),
                KeyCode::Enter if self.focused == Field::Message => {
                    self.current_field_mut().push('\n');
                }
                KeyCode::Enter => self.focused = self.focused.next(),
                KeyCode::Backspace => {
                    self.current_field_mut().pop();
                }
                KeyCode::Char(c) => self.current_field_mut().push(c),
                _ => {}
            }
            return Action::None;
        }

        match code {
            KeyCode::Enter if !self.form.is_submitting() => self.editing = true,
            KeyCode::Up | KeyCode::Char('k') => self.focused = self.focused.prev(),
            KeyCode::Down | KeyCode::Char('j') => self.focused = self.focused.next(),
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
                Constraint::Length(3), // Name
                Constraint::Length(3), // Email
                Constraint::Length(3), // Company
                Constraint::Min(5),    // Message
                Constraint::Length(1), // Action hint
                Constraint::Length(3), // Notice
            ])
            .split(area);

        for (i, field) in [Field::Name, Field::Email, Field::Company, Field::Message]
            .into_iter()
            .enumerate()
        {
            let focused = self.focused == field;
            let block = Block::default()
                .borders(Borders::ALL)
                .title(field.title())
                .border_style(focus_style(focused, focused && self.editing));
            let input = Paragraph::new(self.field(field))
                .block(block)
                .wrap(Wrap { trim: false });
            f.render_widget(input, chunks[i]);
        }

        let hint = if self.editing {
            "Type to edit · Tab next field · Ctrl-S send · Esc stop editing"
        } else {
            "Enter to edit · ↑/↓ field · s to send"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[4]);

        let (text, style) = match (self.form.is_submitting(), self.form.notice()) {
            (true, _) => ("Sending...", Style::default().fg(Color::Yellow)),
            (false, Some(notice)) if notice.is_success() => {
                (notice.text(), Style::default().fg(Color::Green))
            }
            (false, Some(notice)) => (notice.text(), Style::default().fg(Color::Red)),
            (false, None) => ("", Style::default()),
        };
        let notice = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(notice, chunks[5]);
    }
}
