//! Content store access for the blog feed.
//!
//! The feed reads every post once per load, newest first. Where the posts
//! come from is behind the [`ContentStore`] trait; this crate ships the
//! remote PostgREST (Supabase) implementation, [`RestContentStore`].

mod rest;

use std::future::Future;

use avagenc_shared::{Post, Result};

pub use rest::{RestContentStore, RestStoreOptions};

/// User-Agent string for content store requests.
pub const USER_AGENT: &str = concat!("Avagenc/", env!("CARGO_PKG_VERSION"));

/// A read-only source of blog posts.
pub trait ContentStore: Send + Sync {
    /// Fetch all posts ordered by date, newest first.
    ///
    /// No pagination and no store-side filtering; the feed filters locally.
    fn fetch_posts(&self) -> impl Future<Output = Result<Vec<Post>>> + Send;

    /// Human-readable backend name for tracing.
    fn name(&self) -> &str;
}
