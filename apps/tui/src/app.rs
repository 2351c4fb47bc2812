//! Core TUI application state and event loop.
//!
//! Network work runs on a tokio runtime owned by the app; results come back
//! over a channel and are applied between frames.

use std::io;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use avagenc_content::ContentStore;
use avagenc_core::ConfiguredStore;
use avagenc_forms::WebhookClient;
use avagenc_shared::{AppConfig, StoreConfig, WebhookConfig, load_config};
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::screens::{Action, Outcome, ScreenId, Screens};
use crate::widgets::status_bar;

/// Application state.
pub(crate) struct App {
    /// Currently active screen tab.
    pub active_tab: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Status message shown in bottom bar.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Per-screen state.
    pub screens: Screens,
    /// Loaded configuration; store and webhook settings are resolved per request.
    config: AppConfig,
    runtime: Runtime,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl App {
    pub(crate) fn new(config: &AppConfig) -> Result<Self> {
        let (tx, rx) = channel();

        Ok(Self {
            active_tab: 0,
            should_quit: false,
            status: "Ready — press ? for help".to_string(),
            show_help: false,
            screens: Screens::new(),
            config: config.clone(),
            runtime: Runtime::new()?,
            tx,
            rx,
        })
    }

    fn current_screen(&self) -> ScreenId {
        ScreenId::ALL[self.active_tab]
    }

    fn is_editing(&self) -> bool {
        self.screens.is_editing(self.current_screen())
    }

    fn select_tab(&mut self, idx: usize) {
        self.active_tab = idx;
        self.status = format!("{}", self.current_screen());
    }

    /// Run a screen's request in the background.
    fn dispatch(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Status(msg) => self.status = msg,
            Action::Reload => self.reload(),
            Action::Subscribe(email) => match self.webhook_client() {
                Ok(client) => {
                    let tx = self.tx.clone();
                    self.status = "Subscribing...".to_string();
                    self.runtime.spawn(async move {
                        let result = client.subscribe(&email).await;
                        let _ = tx.send(Outcome::Subscribed(result));
                    });
                }
                Err(e) => self.status = self.screens.apply(Outcome::Subscribed(Err(e))),
            },
            Action::SendContact(request) => match self.webhook_client() {
                Ok(client) => {
                    let tx = self.tx.clone();
                    self.status = "Sending message...".to_string();
                    self.runtime.spawn(async move {
                        let result = client.submit_contact(&request).await;
                        let _ = tx.send(Outcome::ContactSent(result));
                    });
                }
                Err(e) => self.status = self.screens.apply(Outcome::ContactSent(Err(e))),
            },
        }
    }

    fn webhook_client(&self) -> avagenc_shared::Result<WebhookClient> {
        WebhookClient::new(&WebhookConfig::resolve(&self.config)?)
    }

    /// Start a feed fetch. A configuration error settles it immediately.
    fn reload(&mut self) {
        self.screens.blog.begin_load();
        match StoreConfig::resolve(&self.config) {
            Ok(config) => {
                let tx = self.tx.clone();
                self.status = "Loading articles...".to_string();
                self.runtime.spawn(async move {
                    let result = match ConfiguredStore::open(&config).await {
                        Ok(store) => store.fetch_posts().await,
                        Err(e) => Err(e),
                    };
                    let _ = tx.send(Outcome::PostsLoaded(result));
                });
            }
            Err(e) => {
                warn!(error = %e, "content store is not configured");
                self.status = self.screens.apply(Outcome::PostsLoaded(Err(e)));
            }
        }
    }

    /// Apply every finished background task.
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.status = self.screens.apply(outcome);
        }
    }
}

/// Entry point — sets up terminal, runs event loop, restores terminal.
pub(crate) fn run() -> Result<()> {
    let config = load_config()?;
    let mut app = App::new(&config)?;
    info!("avagenc-tui started");

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    app.reload();

    loop {
        app.drain_outcomes();
        terminal.draw(|f| draw(f, app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let count = ScreenId::ALL.len();

    // Global keybindings (always active)
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') if !app.is_editing() => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !app.is_editing() => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        // Tab navigation with number keys
        KeyCode::Char(c @ '1'..='3') if !app.is_editing() => {
            let idx = (c as usize) - ('1' as usize);
            if idx < count {
                app.select_tab(idx);
            }
            return;
        }
        KeyCode::Tab if !app.is_editing() => {
            app.select_tab((app.active_tab + 1) % count);
            return;
        }
        KeyCode::BackTab if !app.is_editing() => {
            app.select_tab((app.active_tab + count - 1) % count);
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Delegate to current screen
    let screen = app.current_screen();
    let action = app.screens.handle_key(screen, code, modifiers);
    app.dispatch(action);
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Tab bar
    let tab_titles: Vec<Line> = ScreenId::ALL
        .iter()
        .map(|s| Line::from(format!("{s}")))
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" Avagenc "))
        .select(app.active_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, chunks[0]);

    // Content area — delegate to screen
    app.screens.draw(app.current_screen(), f, chunks[1]);

    // Status bar
    let bar = status_bar(&app.status);
    f.render_widget(bar, chunks[2]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  1-3          Switch to screen"),
        Line::from("  Tab/S-Tab    Next/previous screen"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Blog:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  /            Search titles and excerpts"),
        Line::from("  ←/→          Previous/next category"),
        Line::from("  ↑/↓          Select article"),
        Line::from("  Enter        Show article path"),
        Line::from("  r            Reload"),
        Line::from(""),
        Line::from("Forms:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  Enter        Edit field"),
        Line::from("  s / Ctrl-S   Submit"),
        Line::from("  Esc          Stop editing"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help — press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
