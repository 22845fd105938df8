mod adapters;
mod app;
mod bootstrap;
mod cli;
mod config;
mod domain;
mod logging;
mod login;
mod runtime;
mod session_store;
mod time_utils;
mod ui;

use anyhow::{Context, Result};
use app::App;
use bootstrap::Services;
use clap::Parser;
use cli::{Cli, Commands};
use crate::config::CertusConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use time::UtcOffset;

fn main() -> Result<()> {
    // The local offset can only be read while the process is single-threaded.
    let offset = time_utils::local_offset();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(run(offset))
}

async fn run(offset: UtcOffset) -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = CertusConfig::load().context("Failed to load config")?;
    let _log_guard =
        logging::enable_logging(&crate::config::root_path()?, cfg.log_level.as_deref())?;

    match cli.command() {
        Commands::ConfigPath => {
            let path = CertusConfig::config_path()?;
            if CertusConfig::write_default_if_missing(&path)? {
                println!("Created default config at {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
        Commands::Login => {
            cfg.ensure_remote()?;
            let auth = certus_ledger::AuthClient::new(bootstrap::connection(&cfg));
            login::run_login(&auth).await?;
        }
        Commands::Logout => bootstrap::logout(&cfg).await?,
        Commands::Dev => {
            tracing::info!("starting with in-memory backend");
            run_tui(Services::dev(), offset).await?;
        }
        Commands::Run => {
            let services = Services::remote(&cfg).await?;
            run_tui(services, offset).await?;
        }
    }

    Ok(())
}

async fn run_tui(services: Services, offset: UtcOffset) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(time_utils::now_at(offset));
    let result = runtime::run_app(&mut terminal, &mut app, services.backend.clone()).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("UI exited with error: {:#}", e);
    }
    result
}
