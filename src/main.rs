//! userdesk binary entry point.
//!
//! Parses the CLI, initializes the terminal in raw mode, runs the TUI
//! event loop, and restores the terminal state on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod api;
mod app;
mod error;
mod store;
mod ui;

use api::HttpUserService;
use app::{AppState, Theme};

#[derive(Parser, Debug)]
#[command(
    name = "userdesk",
    version,
    about = "TUI to browse and manage users in a remote REST directory"
)]
struct Args {
    /// Base URL of the remote user service.
    #[arg(
        long,
        env = "USERDESK_BASE_URL",
        default_value = "https://jsonplaceholder.typicode.com"
    )]
    base_url: String,

    /// Key=value theme override file (colors as #RRGGBB or "reset").
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Append tracing output to this file (filtered by RUST_LOG).
    /// Without it nothing is logged; the terminal belongs to the TUI.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let theme = args
        .theme
        .as_deref()
        .and_then(Theme::from_file)
        .unwrap_or_else(Theme::mocha);
    let service = Arc::new(HttpUserService::new(&args.base_url)?);
    let state = AppState::new(service, theme, args.base_url);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
