//! shopcache - a terminal product catalog browser that works offline.
//!
//! The product list is fetched from the catalog API on start. When the
//! network is unavailable the last fetched catalog is shown from the local
//! cache instead.

mod app;
mod navigator;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use shopcache_core::{ApiClient, CacheManager, Config, ProductLoader};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the cache directory
const LOG_FILE: &str = "shopcache.log";

/// Initialize the tracing subscriber, writing to a log file so output does
/// not end up on the alternate screen.
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config_result = Config::load();
    let config = config_result.as_ref().ok().cloned().unwrap_or_default();
    let cache_dir = config.cache_dir()?;
    let _log_guard = init_tracing(&cache_dir)?;
    if let Err(ref e) = config_result {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--clear-cache" {
        return clear_cache(&cache_dir);
    }
    if args.len() > 1 && args[1] == "--dump-catalog" {
        return dump_catalog(&config).await;
    }

    info!("shopcache starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match App::new(&config) {
        Ok(mut app) => {
            app.mount_products();
            run_app(&mut terminal, &mut app).await
        }
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
    }

    info!("shopcache shutting down");
    Ok(())
}

/// Delete the cached catalog
fn clear_cache(cache_dir: &Path) -> Result<()> {
    let cache = CacheManager::new(cache_dir.to_path_buf())?;
    if cache.clear_products()? {
        eprintln!("Cached catalog removed from {}", cache_dir.display());
    } else {
        eprintln!("No cached catalog in {}", cache_dir.display());
    }
    Ok(())
}

/// Run one load without the UI and print the resulting catalog as JSON
async fn dump_catalog(config: &Config) -> Result<()> {
    let cache = CacheManager::new(config.cache_dir()?)?;
    let client = ApiClient::with_endpoint(config.catalog_url(), config.request_timeout())?;
    let loader = ProductLoader::new(Arc::new(client), Arc::new(cache));

    let outcome = loader.load().await;
    if let Some(ref notice) = outcome.notice {
        eprintln!("{}: {}", notice.title(), notice.message());
    }
    eprintln!(
        "{} products from {}",
        outcome.catalog.len(),
        outcome.provenance
    );

    println!("{}", serde_json::to_string_pretty(&outcome.catalog)?);
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.quit();
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
