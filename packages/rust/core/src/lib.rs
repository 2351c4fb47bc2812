//! Blog feed orchestration and form state for Avagenc.
//!
//! This crate ties the content stores and webhook client into what the
//! front-ends drive: the [`BlogFeedController`], the pure [`feed`]
//! derivation, and the newsletter / contact form state machines.

pub mod controller;
pub mod feed;
pub mod forms;
pub mod store;

pub use controller::BlogFeedController;
pub use feed::{FeedView, derive_view};
pub use forms::{ContactForm, Notice, SubscribeForm};
pub use store::ConfiguredStore;
