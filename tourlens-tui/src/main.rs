//! TourLens TUI — five-panel terminal dashboard with vim-style navigation.
//!
//! Panels:
//! 1. Cities — event table, selection, one-line result per city
//! 2. Window — series around the focused city's event, pre/post statistics
//! 3. Compare — selected cities side by side with a percent-change bar
//! 4. Data — the focused window's daily points
//! 5. Help — keyboard shortcuts

mod app;
mod input;
mod persistence;
mod theme;
mod ui;

#[cfg(test)]
mod test_helpers;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use tourlens_runner::{RunnerConfig, Session};

use crate::app::AppState;

#[derive(Parser)]
#[command(
    name = "tourlens-tui",
    version,
    about = "TourLens dashboard — streaming metrics around concert dates"
)]
struct Args {
    /// Path to a TOML config file. Defaults to ./tourlens.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Observation CSV. Overrides `[data] path` from the config.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Days either side of the event. Overrides `[window] half_width_days`.
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=app::MAX_HALF_WIDTH))]
    half_width: Option<i64>,

    /// Where the dashboard remembers selection and panel between runs.
    #[arg(long)]
    state: Option<PathBuf>,

    /// More log output in the log file (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let app_dir = |base: Option<PathBuf>| {
        base.unwrap_or_else(|| PathBuf::from("."))
            .join("tourlens")
    };
    let log_path = app_dir(dirs::cache_dir()).join("tourlens-tui.log");
    let state_path = args
        .state
        .clone()
        .unwrap_or_else(|| app_dir(dirs::config_dir()).join("state.json"));

    // The terminal belongs to the UI, so logs go to a file.
    if let Err(e) = init_logging(&log_path, args.verbose) {
        eprintln!("logging disabled: {e:#}");
    }

    // Load everything before touching the terminal so errors print normally.
    let mut config = RunnerConfig::discover(args.config.as_deref())?;
    if let Some(path) = args.data {
        config.data.path = path;
    }
    if let Some(days) = args.half_width {
        config.window.half_width_days = days;
    }
    let session = Session::open(&config)
        .with_context(|| format!("failed to open {}", config.data.path.display()))?;

    let mut app = AppState::new(session);
    let persisted = persistence::load(&state_path);
    persistence::apply(&mut app, persisted);

    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(path = %state_path.display(), error = %e, "failed to save state");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the loop responsive without spinning.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

fn init_logging(path: &Path, verbose: u8) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;

    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
