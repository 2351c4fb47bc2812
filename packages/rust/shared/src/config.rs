//! Application configuration for Avagenc.
//!
//! User config lives at `~/.avagenc/avagenc.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AvagencError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "avagenc.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".avagenc";

/// Newsletter webhook the marketing site has always posted to.
const DEFAULT_NEWSLETTER_URL: &str =
    "https://n8n-elrsppnn.n8x.web.id/webhook/3477b0ec-151d-4dee-8dd2-527a94532cc0";

// ---------------------------------------------------------------------------
// Config structs (matching avagenc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content store settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Outbound form webhooks.
    #[serde(default)]
    pub webhooks: WebhooksConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Which content store backend serves the blog feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    /// Remote PostgREST endpoint (Supabase).
    Rest,
    /// Embedded libSQL database file.
    Local,
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Backend to query.
    #[serde(default = "default_backend")]
    pub backend: ContentBackend,

    /// Base URL of the PostgREST project (e.g. `https://xyz.supabase.co`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_url: Option<String>,

    /// Remote collection holding the posts.
    #[serde(default = "default_table")]
    pub table: String,

    /// Name of the env var holding the store API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Path of the local libSQL database.
    #[serde(default = "default_local_db")]
    pub local_db: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            rest_url: None,
            table: default_table(),
            api_key_env: default_api_key_env(),
            local_db: default_local_db(),
        }
    }
}

fn default_backend() -> ContentBackend {
    ContentBackend::Rest
}
fn default_table() -> String {
    "blogPosts".into()
}
fn default_api_key_env() -> String {
    "AVAGENC_CONTENT_KEY".into()
}
fn default_local_db() -> String {
    "~/.avagenc/posts.db".into()
}

/// `[webhooks]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhooksConfig {
    /// Newsletter subscription endpoint.
    #[serde(default = "default_newsletter_url")]
    pub newsletter_url: String,

    /// Contact form endpoint. Contact submissions are refused when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            newsletter_url: default_newsletter_url(),
            contact_url: None,
        }
    }
}

fn default_newsletter_url() -> String {
    DEFAULT_NEWSLETTER_URL.into()
}

/// `[http]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means requests may hang indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// Runtime configs (resolved from config file + env + CLI flags)
// ---------------------------------------------------------------------------

/// Resolved content store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: ContentBackend,
    /// Required for [`ContentBackend::Rest`].
    pub rest_url: Option<Url>,
    pub table: String,
    /// API key read from the configured env var, if set.
    pub api_key: Option<String>,
    pub local_db: PathBuf,
    pub timeout: Option<Duration>,
}

impl StoreConfig {
    /// Resolve the `[content]` section, reading the API key from the environment.
    pub fn resolve(config: &AppConfig) -> Result<Self> {
        let rest_url = config
            .content
            .rest_url
            .as_deref()
            .map(|raw| parse_url("content.rest_url", raw))
            .transpose()?;

        if config.content.backend == ContentBackend::Rest && rest_url.is_none() {
            return Err(AvagencError::config(
                "content.rest_url is required when content.backend = \"rest\"",
            ));
        }

        let api_key = std::env::var(&config.content.api_key_env)
            .ok()
            .filter(|v| !v.is_empty());

        Ok(Self {
            backend: config.content.backend,
            rest_url,
            table: config.content.table.clone(),
            api_key,
            local_db: resolve_path(&config.content.local_db)?,
            timeout: config.http.request_timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Resolved webhook configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub newsletter_url: Url,
    pub contact_url: Option<Url>,
    pub timeout: Option<Duration>,
}

impl WebhookConfig {
    /// Resolve the `[webhooks]` section.
    pub fn resolve(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            newsletter_url: parse_url("webhooks.newsletter_url", &config.webhooks.newsletter_url)?,
            contact_url: config
                .webhooks
                .contact_url
                .as_deref()
                .map(|raw| parse_url("webhooks.contact_url", raw))
                .transpose()?,
            timeout: config.http.request_timeout_secs.map(Duration::from_secs),
        })
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| AvagencError::config(format!("{key}: invalid URL '{raw}': {e}")))
}

/// Expand a leading `~/` against the user's home directory.
pub fn resolve_path(raw: &str) -> Result<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| AvagencError::config("could not determine home directory"))?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.avagenc/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AvagencError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.avagenc/avagenc.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AvagencError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| AvagencError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AvagencError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AvagencError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AvagencError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
