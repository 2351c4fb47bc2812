//! Blog feed controller: fetch lifecycle, filter state, derived view.

use avagenc_content::ContentStore;
use avagenc_shared::{Category, FilterState, Post, Result};
use tracing::{info, instrument, warn};

use crate::feed::{self, FeedView};

/// Owns the unfiltered collection and the active [`FilterState`].
///
/// Starts in the loading state. A load can be driven in one step with
/// [`load_posts`](Self::load_posts), or split into
/// [`begin_load`](Self::begin_load) / [`finish_load`](Self::finish_load)
/// when the fetch runs on another task.
#[derive(Debug)]
pub struct BlogFeedController {
    posts: Vec<Post>,
    filter: FilterState,
    loading: bool,
}

impl Default for BlogFeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogFeedController {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            filter: FilterState::default(),
            loading: true,
        }
    }

    /// Fetch every post from `store` and replace the collection.
    #[instrument(skip_all, fields(store = store.name()))]
    pub async fn load_posts<S: ContentStore>(&mut self, store: &S) {
        self.begin_load();
        let result = store.fetch_posts().await;
        self.finish_load(result);
    }

    /// Mark a fetch as outstanding.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply a settled fetch. Errors are logged and leave an empty collection.
    pub fn finish_load(&mut self, result: Result<Vec<Post>>) {
        self.posts = match result {
            Ok(posts) => {
                info!(count = posts.len(), "blog posts loaded");
                posts
            }
            Err(e) => {
                warn!(error = %e, "error fetching blog posts");
                Vec::new()
            }
        };
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The unfiltered collection.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn set_category(&mut self, category: Category) {
        self.filter = std::mem::take(&mut self.filter).with_category(category);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter = std::mem::take(&mut self.filter).with_search(search);
    }

    /// Derived view for the current collection and filter.
    pub fn view(&self) -> FeedView<'_> {
        feed::derive_view(&self.posts, &self.filter)
    }
}
