//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use avagenc_core::{BlogFeedController, ConfiguredStore, ContactForm, Notice, SubscribeForm};
use avagenc_forms::WebhookClient;
use avagenc_shared::{
    AppConfig, Category, FilterState, Post, StoreConfig, WebhookConfig, init_config, load_config,
    resolve_path,
};
use avagenc_storage::Storage;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::render;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Avagenc — blog feed and site forms for the Avagenc website.
#[derive(Parser)]
#[command(
    name = "avagenc",
    version,
    about = "Browse the Avagenc blog feed and submit the site's newsletter and contact forms.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Content store base URL (overrides content.rest_url).
    #[arg(long, env = "AVAGENC_CONTENT_URL", global = true)]
    pub content_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Load the blog feed and print the featured post and article grid.
    Blog {
        /// Category selector (e.g. "AI Technology"). Defaults to All.
        #[arg(short, long, default_value = "All")]
        category: Category,

        /// Case-insensitive text matched against titles and excerpts.
        #[arg(short, long, default_value = "")]
        search: String,

        /// Print the derived view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the category selectors.
    Categories,

    /// Subscribe an email address to the newsletter.
    Subscribe {
        /// Email address to subscribe.
        email: String,
    },

    /// Send a contact request.
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        company: String,

        #[arg(long)]
        message: String,
    },

    /// Import posts from a JSON array file into the local posts database.
    Import {
        /// Path to a JSON file holding an array of post records.
        file: PathBuf,

        /// Database path (defaults to content.local_db).
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Crates whose events are shown at the selected verbosity.
const LOG_TARGETS: &[&str] = &[
    "avagenc",
    "avagenc_core",
    "avagenc_content",
    "avagenc_forms",
    "avagenc_storage",
    "avagenc_shared",
];

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config()?;
    if let Some(url) = cli.content_url {
        config.content.rest_url = Some(url);
    }

    match cli.command {
        Command::Blog {
            category,
            search,
            json,
        } => cmd_blog(&config, FilterState::new(category, search), json).await,
        Command::Categories => cmd_categories(),
        Command::Subscribe { email } => cmd_subscribe(&config, email).await,
        Command::Contact {
            name,
            email,
            company,
            message,
        } => cmd_contact(&config, name, email, company, message).await,
        Command::Import { file, db } => cmd_import(&config, &file, db).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_blog(config: &AppConfig, filter: FilterState, json: bool) -> Result<()> {
    let store_config = StoreConfig::resolve(config)?;
    let store = ConfiguredStore::open(&store_config).await?;

    info!(
        category = %filter.category,
        search = %filter.search,
        "loading blog feed"
    );

    let mut controller = BlogFeedController::new();
    controller.set_filter(filter);

    let spinner = loading_spinner();
    controller.load_posts(&store).await;
    spinner.finish_and_clear();

    let view = controller.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&render::view_json(&view))?);
    } else {
        print!("{}", render::feed(&view));
    }

    Ok(())
}

fn cmd_categories() -> Result<()> {
    for category in Category::ALL {
        println!("{category}");
    }
    Ok(())
}

async fn cmd_subscribe(config: &AppConfig, email: String) -> Result<()> {
    let client = WebhookClient::new(&WebhookConfig::resolve(config)?)?;

    let mut form = SubscribeForm::new();
    form.email = email;
    let notice = form.submit(&client).await.cloned();

    report(notice)
}

async fn cmd_contact(
    config: &AppConfig,
    name: String,
    email: String,
    company: String,
    message: String,
) -> Result<()> {
    let client = WebhookClient::new(&WebhookConfig::resolve(config)?)?;

    let mut form = ContactForm::new();
    form.fields.name = name;
    form.fields.email = email;
    form.fields.company = company;
    form.fields.message = message;
    let notice = form.submit(&client).await.cloned();

    report(notice)
}

/// Print a form notice; failures become the process error.
fn report(notice: Option<Notice>) -> Result<()> {
    match notice {
        Some(Notice::Success(msg)) => {
            println!("{msg}");
            Ok(())
        }
        Some(Notice::Error(msg)) => Err(eyre!(msg)),
        None => Err(eyre!("form was not submitted")),
    }
}

async fn cmd_import(config: &AppConfig, file: &Path, db: Option<PathBuf>) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| eyre!("cannot read '{}': {e}", file.display()))?;
    let posts: Vec<Post> = serde_json::from_str(&raw)
        .map_err(|e| eyre!("'{}' is not a JSON array of posts: {e}", file.display()))?;

    let db_path = match db {
        Some(p) => p,
        None => resolve_path(&config.content.local_db)?,
    };

    info!(file = %file.display(), db = %db_path.display(), "importing posts");

    let storage = Storage::open(&db_path).await?;
    let written = storage.import_posts(&posts).await?;
    let total = storage.count_posts().await?;

    println!();
    println!("  Imported {written} post(s) into {}", db_path.display());
    println!("  Total posts: {total}");
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Spinner shown while the feed request is outstanding.
fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    spinner.set_message("Loading articles...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
