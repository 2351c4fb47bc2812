//! Avagenc CLI — the blog feed and site forms from the terminal.
//!
//! Loads the blog feed from the configured content store, filters it by
//! category and search text, and submits the newsletter / contact forms.

mod commands;
mod render;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
