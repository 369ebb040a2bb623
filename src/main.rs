//! usradmin-tui binary entry point.
//!
//! Runs the user-management TUI by default, or the pass-through proxy via
//! the `proxy` subcommand. The terminal is initialized in raw mode and
//! restored on exit; diagnostics go to a log file while the UI is active.

use clap::{Parser, Subcommand};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::error::Result;

mod api;
mod app;
mod error;
mod proxy;
mod ui;
mod view;

#[derive(Parser)]
#[command(name = "usradmin-tui", version, about)]
struct Cli {
    /// Base URL of the user service
    #[arg(long, env = "USER_API_URL", default_value = "http://localhost:4000")]
    api_url: String,

    /// Rows per page in the table view
    #[arg(long, default_value_t = 100)]
    page_size: usize,

    /// Diagnostic log file (the terminal itself is occupied by the UI)
    #[arg(long, default_value = "usradmin.log")]
    log_file: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pass-through proxy exposing GET /api/user
    Proxy {
        /// Listen address for the proxy
        #[arg(long, default_value = "127.0.0.1:3000")]
        listen: std::net::SocketAddr,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

/// Route `tracing` output to a file so it does not corrupt the UI.
fn init_file_logging(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
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

fn run_proxy(listen: std::net::SocketAddr, upstream: String) -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(listen).await?;
        proxy::serve(listener, upstream).await
    })?;
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Proxy { listen }) = cli.command {
        return run_proxy(listen, cli.api_url);
    }

    init_file_logging(&cli.log_file).map_err(|e| format!("init logging: {}", e))?;
    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, ApiClient::new(cli.api_url), cli.page_size);

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
