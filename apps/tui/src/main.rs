//! Avagenc TUI — interactive terminal front-end for the blog feed.
//!
//! Provides tabs for browsing the blog (category + search filtering),
//! subscribing to the newsletter, and sending the contact form, built
//! with `ratatui` + `crossterm`.

mod app;
mod screens;
mod widgets;

use std::fs::OpenOptions;
use std::sync::Mutex;

use color_eyre::eyre::Result;

/// Log file under the config directory; the terminal belongs to the UI.
const LOG_FILE_NAME: &str = "avagenc-tui.log";

/// Default filter when `RUST_LOG` is unset: every workspace crate at `info`.
const DEFAULT_FILTER: &str = "avagenc_tui=info,avagenc_core=info,avagenc_content=info,\
avagenc_forms=info,avagenc_storage=info,avagenc_shared=info";

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;
    app::run()
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let dir = avagenc_shared::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
