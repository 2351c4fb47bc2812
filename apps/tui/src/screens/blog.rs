//! "Blog" screen — category selector, search box, featured block, article list.

use avagenc_core::{BlogFeedController, FeedView};
use avagenc_shared::{Category, Post, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap};

use super::Action;
use crate::widgets::focus_style;

pub(crate) struct BlogScreen {
    feed: BlogFeedController,
    search_input: String,
    editing: bool,
    /// Index into the featured post followed by the grid.
    selected: usize,
    status: String,
}

impl BlogScreen {
    pub(crate) fn new() -> Self {
        Self {
            feed: BlogFeedController::new(),
            search_input: String::new(),
            editing: false,
            selected: 0,
            status: "Loading articles...".to_string(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.feed.is_loading()
    }

    pub(crate) fn begin_load(&mut self) {
        self.feed.begin_load();
        self.status = "Loading articles...".to_string();
    }

    /// Apply a settled fetch and return the status-bar message.
    pub(crate) fn finish_load(&mut self, result: Result<Vec<Post>>) -> String {
        let message = match &result {
            Ok(posts) => format!("Loaded {} post(s)", posts.len()),
            Err(e) => format!("Could not load articles: {e}"),
        };
        self.feed.finish_load(result);
        self.selected = 0;
        self.status = "/ search · ←/→ category · ↑/↓ select · Enter open · r reload".to_string();
        message
    }

    /// Featured post (if shown) followed by the grid, in display order.
    fn visible(&self) -> Vec<&Post> {
        let view = self.feed.view();
        view.featured.into_iter().chain(view.regular).collect()
    }

    fn set_category(&mut self, category: Category) {
        self.feed.set_category(category);
        self.selected = 0;
    }

    fn apply_search(&mut self) {
        self.feed.set_search(self.search_input.clone());
        self.selected = 0;
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> Action {
        if self.editing {
            match code {
                KeyCode::Esc | KeyCode::Enter => self.editing = false,
                KeyCode::Backspace => {
                    self.search_input.pop();
                    self.apply_search();
                }
                KeyCode::Char(c) => {
                    self.search_input.push(c);
                    self.apply_search();
                }
                _ => {}
            }
            return Action::None;
        }

        match code {
            KeyCode::Char('/') => self.editing = true,
            KeyCode::Esc if !self.search_input.is_empty() => {
                self.search_input.clear();
                self.apply_search();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.set_category(self.feed.filter().category.prev());
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.set_category(self.feed.filter().category.next());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(post) = self.visible().get(self.selected) {
                    return Action::Status(format!("Open {}", post.detail_path()));
                }
            }
            KeyCode::Char('r') if !self.feed.is_loading() => return Action::Reload,
            _ => {}
        }
        Action::None
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Categories
                Constraint::Length(3), // Search
                Constraint::Min(1),    // Feed
                Constraint::Length(1), // Hint
            ])
            .split(area);

        let filter = self.feed.filter();
        let categories = Tabs::new(Category::ALL.iter().map(|c| Line::from(c.label())))
            .block(Block::default().borders(Borders::ALL).title(" Category "))
            .select(filter.category.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" │ ");
        f.render_widget(categories, chunks[0]);

        let search_text = if self.search_input.is_empty() && !self.editing {
            Span::styled("Search articles...", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.search_input.as_str())
        };
        let search = Paragraph::new(Line::from(search_text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search (/) ")
                .border_style(focus_style(self.editing, self.editing)),
        );
        f.render_widget(search, chunks[1]);

        if self.feed.is_loading() {
            let loading = Paragraph::new("Loading articles...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(loading, chunks[2]);
        } else {
            self.draw_feed(f, chunks[2], &self.feed.view());
        }

        let hint = Paragraph::new(self.status.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[3]);
    }

    fn draw_feed(&self, f: &mut Frame, area: Rect, view: &FeedView<'_>) {
        let (featured_area, list_area) = match view.featured {
            Some(_) => {
                let split = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(7), Constraint::Min(1)])
                    .split(area);
                (Some(split[0]), split[1])
            }
            None => (None, area),
        };

        if let (Some(post), Some(rect)) = (view.featured, featured_area) {
            let lines = vec![
                Line::from(meta_line(post)).style(Style::default().fg(Color::Blue)),
                Line::from(post.title.as_deref().unwrap_or("(untitled)"))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Line::from(post.excerpt.as_deref().unwrap_or_default()),
                Line::from(byline(post)).style(Style::default().fg(Color::DarkGray)),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" Featured Article ")
                .border_style(focus_style(self.selected == 0, false));
            let featured = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true });
            f.render_widget(featured, rect);
        }

        let title = format!(" {} · {} ", view.heading, view.count_label());
        if view.regular.is_empty() {
            let empty = Paragraph::new(
                "No articles found\n\nTry adjusting your search or filter criteria",
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(empty, list_area);
            return;
        }

        let offset = usize::from(view.featured.is_some());
        let items: Vec<ListItem> = view
            .regular
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let selected = i + offset == self.selected;
                let style = if selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let prefix = if selected { "▸ " } else { "  " };
                ListItem::new(vec![
                    Line::from(format!(
                        "{prefix}{}",
                        post.title.as_deref().unwrap_or("(untitled)")
                    )),
                    Line::from(format!("    {}", meta_line(post)))
                        .style(Style::default().fg(Color::DarkGray)),
                ])
                .style(style)
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(list, list_area);
    }
}

/// `Category · date • read time`, skipping whatever is missing.
fn meta_line(post: &Post) -> String {
    let when: Vec<&str> = [post.date.as_deref(), post.read_time.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    [post.category.clone(), (!when.is_empty()).then(|| when.join(" • "))]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ")
}

/// `[RP] Raka Pratama  → /blog/4`
fn byline(post: &Post) -> String {
    match post.author.as_deref() {
        Some(author) => format!(
            "[{}] {author}  → {}",
            post.author_initials(),
            post.detail_path()
        ),
        None => format!("→ {}", post.detail_path()),
    }
}
