use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use portal::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore, now_secs};
use portal::HttpApi;
use shared::config::{load_or_default, validate_config};
use shared::types::client_config::ClientConfig;

mod app;
mod input;
mod ui;

use app::App;

const LOG_FILE: &str = "hr-portal.log";

#[derive(Parser, Debug)]
#[command(name = "hr-portal", about = "Terminal HR portal")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "hr-portal.toml")]
    config: PathBuf,

    /// Override `api.base_url`
    #[arg(long)]
    api_url: Option<String>,

    /// Override `api.scoring_url`
    #[arg(long)]
    scoring_url: Option<String>,

    /// Keep the sign-in token in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let data_dir = config.storage.resolved_data_dir();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    init_logging(&data_dir, &args.log_level)?;
    info!("Starting hr-portal against {}", config.api.base());

    let tokens: Arc<dyn TokenStore> = if config.storage.ephemeral {
        info!("Ephemeral session, token kept in memory");
        Arc::new(MemoryTokenStore::new())
    } else {
        Arc::new(FileTokenStore::new(&data_dir))
    };

    let api = HttpApi::new(config.api.base(), tokens.clone())
        .with_scoring_url(config.api.scoring_url.as_deref());
    if config.api.scoring_url.is_none() {
        warn!("No scoring_url configured, prediction pages are disabled");
    }

    let session = Session::hydrate(tokens, now_secs());
    let app = App::new(api, session, &config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let result = runtime.block_on(app.run(&mut terminal));

    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();

    result
}

/// Config file (or defaults) with command-line overrides applied on top.
fn resolve_config(args: &Args) -> Result<ClientConfig> {
    let mut config = load_or_default(Some(&args.config))
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(url) = &args.scoring_url {
        config.api.scoring_url = Some(url.clone());
    }
    if args.ephemeral {
        config.storage.ephemeral = true;
    }

    validate_config(&config).context("Invalid command-line override")?;
    Ok(config)
}

// The terminal owns stdout, so logs go to a file in the data directory.
fn init_logging(data_dir: &Path, default_level: &str) -> Result<()> {
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    Ok(())
}
