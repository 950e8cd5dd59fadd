//! Amor Fati - a keyboard-driven journal for Nietzschean self-assessments.
//!
//! Five dimensions, scored 0-8, answered honestly. Assessments persist as
//! local JSON and the companion guide content stays readable offline
//! through a versioned asset cache.

mod app;
mod cache;
mod config;
mod models;
mod scoring;
mod store;
mod ui;
mod utils;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use cache::{channel, run_worker, HttpFetcher};
use config::Config;
use store::DataStore;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the cache directory
const LOG_FILE: &str = "amor-fati.log";

/// Upper bound on a single guide fetch attempt from the main loop
const GUIDE_FETCH_TIMEOUT_MS: u64 = 250;

/// Interval between guide fetch retries while the guide is missing
const GUIDE_RETRY_SECS: u64 = 10;

/// Initialize the tracing subscriber, writing to a file since the TUI
/// owns the terminal. Returns the appender guard to keep logs flushing.
fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.cache_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

/// What the process should do based on its command-line arguments.
#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    /// Start the interactive TUI
    Run,
    /// Export assessment data to the given file (or a default name)
    Export(Option<PathBuf>),
    /// Replace assessment data from the given export file
    Import(PathBuf),
    /// Malformed invocation; print the message and usage, then exit
    Usage(&'static str),
}

fn parse_cli(args: &[String]) -> CliCommand {
    match args.get(1).map(String::as_str) {
        Some("--export") => CliCommand::Export(args.get(2).map(PathBuf::from)),
        Some("--import") => match args.get(2) {
            Some(path) => CliCommand::Import(PathBuf::from(path)),
            None => CliCommand::Usage("--import requires a file path"),
        },
        Some(_) => CliCommand::Usage("unrecognized argument"),
        None => CliCommand::Run,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load_or_create().unwrap_or_default();

    let args: Vec<String> = std::env::args().collect();
    match parse_cli(&args) {
        CliCommand::Export(path) => return export_cli(&config, path),
        CliCommand::Import(path) => return import_cli(&config, path),
        CliCommand::Usage(message) => {
            eprintln!("{}", message);
            eprintln!("Usage: amor-fati [--export [FILE] | --import FILE]");
            std::process::exit(2);
        }
        CliCommand::Run => {}
    }

    // Initialize logging
    let _log_guard = init_tracing(&config);
    info!("Amor Fati starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(config.clone())?;

    // Start the cache worker unless running offline-only
    if !config.offline_mode {
        match start_worker(&config) {
            Ok((page, task)) => app.attach_worker(page, task),
            Err(e) => info!(error = %e, "Cache worker not started"),
        }
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Amor Fati shutting down");
    Ok(())
}

/// Spawn the cache worker task with a live HTTP fetcher.
fn start_worker(
    config: &Config,
) -> Result<(cache::PageHandle, tokio::task::JoinHandle<()>)> {
    let origin = config.content_base_url().to_string();
    let fetcher = HttpFetcher::new(origin.clone())?;
    let cache_root = config.cache_dir()?.join("content");
    let (page, worker) = channel();
    let task = tokio::spawn(run_worker(fetcher, cache_root, origin, worker));
    Ok((page, task))
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut last_guide_attempt: Option<Instant> = None;

    loop {
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }
                if key.kind == KeyEventKind::Press && handle_input(app, key).await? {
                    break;
                }
            }
        }

        app.check_worker_events();

        // Fetch the guide opportunistically; the worker only answers once
        // its install settles, so each attempt is bounded and retried.
        if app.guide.is_none() && app.has_worker() {
            let due = last_guide_attempt
                .map(|t| t.elapsed() >= Duration::from_secs(GUIDE_RETRY_SECS))
                .unwrap_or(true);
            if due {
                last_guide_attempt = Some(Instant::now());
                let _ = tokio::time::timeout(
                    Duration::from_millis(GUIDE_FETCH_TIMEOUT_MS),
                    app.load_guide(),
                )
                .await;
            }
        }

        if app.state == AppState::Quitting {
            break;
        }
    }

    Ok(())
}

/// Write the assessment data to an export file without starting the TUI.
fn export_cli(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let store = DataStore::new(config.data_dir()?)?;
    let data = store.load();
    let path = path.unwrap_or_else(|| PathBuf::from(DataStore::default_export_name()));
    store.export(&data, &path)?;
    eprintln!(
        "Exported {} assessment(s) to {}",
        data.assessments.len(),
        path.display()
    );
    Ok(())
}

/// Replace the assessment data from an export file without starting the TUI.
fn import_cli(config: &Config, path: PathBuf) -> Result<()> {
    let store = DataStore::new(config.data_dir()?)?;
    let data = store.import(&path)?;
    eprintln!("Imported {} assessment(s)", data.assessments.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_runs_tui() {
        assert_eq!(parse_cli(&args(&["amor-fati"])), CliCommand::Run);
    }

    #[test]
    fn test_export_with_and_without_path() {
        assert_eq!(
            parse_cli(&args(&["amor-fati", "--export"])),
            CliCommand::Export(None)
        );
        assert_eq!(
            parse_cli(&args(&["amor-fati", "--export", "out.json"])),
            CliCommand::Export(Some(PathBuf::from("out.json")))
        );
    }

    #[test]
    fn test_import_requires_a_path() {
        assert_eq!(
            parse_cli(&args(&["amor-fati", "--import", "backup.json"])),
            CliCommand::Import(PathBuf::from("backup.json"))
        );
        assert!(matches!(
            parse_cli(&args(&["amor-fati", "--import"])),
            CliCommand::Usage(_)
        ));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(matches!(
            parse_cli(&args(&["amor-fati", "--frobnicate"])),
            CliCommand::Usage(_)
        ));
    }
}
