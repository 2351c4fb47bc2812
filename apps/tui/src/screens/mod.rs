//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI and encapsulates its
//! own state and rendering logic. Screens never perform I/O themselves;
//! key handling returns an [`Action`] that the app runs in the background.

mod blog;
mod contact;
mod newsletter;

use std::fmt;

use avagenc_forms::ContactRequest;
use avagenc_shared::{Post, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;

pub(crate) use blog::BlogScreen;
pub(crate) use contact::ContactScreen;
pub(crate) use newsletter::NewsletterScreen;

/// Screen identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Blog,
    Newsletter,
    Contact,
}

impl ScreenId {
    pub(crate) const ALL: [ScreenId; 3] = [Self::Blog, Self::Newsletter, Self::Contact];
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blog => write!(f, "Blog"),
            Self::Newsletter => write!(f, "Newsletter"),
            Self::Contact => write!(f, "Contact"),
        }
    }
}

/// Work requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    /// Fetch the blog feed again.
    Reload,
    /// POST this address to the newsletter webhook.
    Subscribe(String),
    /// POST this request to the contact webhook.
    SendContact(ContactRequest),
    /// Show a message in the status bar.
    Status(String),
}

/// Results delivered back to the event loop from background tasks.
#[derive(Debug)]
pub(crate) enum Outcome {
    PostsLoaded(Result<Vec<Post>>),
    Subscribed(Result<()>),
    ContactSent(Result<()>),
}

/// State of every screen; the active one is picked by [`ScreenId`].
pub(crate) struct Screens {
    pub blog: BlogScreen,
    pub newsletter: NewsletterScreen,
    pub contact: ContactScreen,
}

impl Screens {
    pub(crate) fn new() -> Self {
        Self {
            blog: BlogScreen::new(),
            newsletter: NewsletterScreen::new(),
            contact: ContactScreen::new(),
        }
    }

    /// Whether the given screen has an active text input field.
    pub(crate) fn is_editing(&self, id: ScreenId) -> bool {
        match id {
            ScreenId::Blog => self.blog.is_editing(),
            ScreenId::Newsletter => self.newsletter.is_editing(),
            ScreenId::Contact => self.contact.is_editing(),
        }
    }

    pub(crate) fn draw(&self, id: ScreenId, f: &mut Frame, area: Rect) {
        match id {
            ScreenId::Blog => self.blog.draw(f, area),
            ScreenId::Newsletter => self.newsletter.draw(f, area),
            ScreenId::Contact => self.contact.draw(f, area),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        id: ScreenId,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Action {
        match id {
            ScreenId::Blog => self.blog.handle_key(code, modifiers),
            ScreenId::Newsletter => self.newsletter.handle_key(code, modifiers),
            ScreenId::Contact => self.contact.handle_key(code, modifiers),
        }
    }

    /// Route a background result to the screen that asked for it.
    /// Returns the status-bar message to show.
    pub(crate) fn apply(&mut self, outcome: Outcome) -> String {
        match outcome {
            Outcome::PostsLoaded(result) => self.blog.finish_load(result),
            Outcome::Subscribed(result) => self.newsletter.finish_submit(result),
            Outcome::ContactSent(result) => self.contact.finish_submit(result),
        }
    }
}
