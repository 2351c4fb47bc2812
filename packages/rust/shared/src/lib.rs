//! Shared types, error model, and configuration for Avagenc.
//!
//! This crate is the foundation depended on by all other Avagenc crates.
//! It provides:
//! - [`AvagencError`] — the unified error type
//! - Domain types ([`Post`], [`PostId`], [`Category`], [`FilterState`])
//! - Configuration ([`AppConfig`], [`StoreConfig`], [`WebhookConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContentBackend, ContentConfig, HttpConfig, StoreConfig, WebhookConfig,
    WebhooksConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_path,
};
pub use error::{AvagencError, Result};
pub use types::{Category, FilterState, Post, PostId};
