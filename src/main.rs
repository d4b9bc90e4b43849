mod app;
mod async_tasks;
mod cli;
mod constants;
mod data;
mod error;
mod filter;
mod menu;
mod persistence;
mod selection;
mod table;
mod types;
mod ui;

use app::AppState;
use async_tasks::{AsyncTaskRunner, TaskMessage};
use clap::Parser;
use cli::Cli;
use constants::{FRAME_DURATION_MS, MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use error::{AppError, Result};
use persistence::PersistenceManager;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use types::{Config, LoadingState};
use ui::input_handler::InputHandler;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate CLI arguments
    cli.validate().map_err(AppError::Other)?;

    // Initialize logging if requested; the guard flushes the log on drop
    let _log_guard = match &cli.log_file {
        Some(log_file) => {
            let guard = init_logging(log_file)?;
            tracing::info!("=== tabula starting ===");
            tracing::info!("Log file: {}", log_file);
            Some(guard)
        }
        None => None,
    };

    let Some(file) = &cli.file else {
        return Err(AppError::Other(
            "No data file. Usage: tabula <file.json>".to_string(),
        ));
    };
    let data_path = persistence::canonicalize_path(file)
        .map_err(|_| AppError::FileNotFound(file.clone()))?;
    tracing::info!("Data file: {}", data_path);

    // Check terminal size
    let (width, height) = crossterm::terminal::size()?;
    if width < MIN_TERMINAL_WIDTH || height < MIN_TERMINAL_HEIGHT {
        tracing::error!(
            "Terminal too small: {}x{} (minimum: {}x{})",
            width,
            height,
            MIN_TERMINAL_WIDTH,
            MIN_TERMINAL_HEIGHT
        );
        return Err(AppError::TerminalTooSmall);
    }
    tracing::debug!("Terminal size: {}x{}", width, height);

    // Setup terminal
    setup_terminal()?;
    tracing::debug!("Terminal setup completed");

    // Setup Ctrl-C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Ctrl-C received, shutting down");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Other(format!("Failed to set Ctrl-C handler: {}", e)))?;

    // Run the application
    let result = run_app(&cli, data_path, running).await;

    // Cleanup terminal
    cleanup_terminal()?;
    tracing::debug!("Terminal cleanup completed");

    result
}

fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;

    // Set panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal();
        original_hook(panic_info);
    }));

    Ok(())
}

fn cleanup_terminal() -> Result<()> {
    execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Log timestamps in local time
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        use std::fmt::Write as _;
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

fn init_logging(log_file: &str) -> Result<WorkerGuard> {
    use std::fs::OpenOptions;
    use tracing_subscriber::EnvFilter;

    // Open/create log file, truncating if it exists
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_file)
        .map_err(|e| AppError::Other(format!("Failed to open log file: {}", e)))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    // Only log from our crate unless RUST_LOG says otherwise
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabula=debug"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| AppError::Other(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

async fn run_app(cli: &Cli, data_path: String, running: Arc<AtomicBool>) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let (task_tx, mut task_rx) = mpsc::unbounded_channel();

    let mut app = initialize_app_state(cli)?;
    let task_runner = AsyncTaskRunner::new(task_tx);

    // Load the data file in the background
    task_runner.spawn_load_data(data_path.clone());
    app.data_path = Some(data_path.clone());
    app.loading_state = LoadingState::loading(data_path);

    run_event_loop(&mut terminal, &mut app, &mut task_rx, &task_runner, running).await?;

    // Save state before quitting
    app.save_state();

    tracing::info!("tabula shutting down");
    Ok(())
}

fn initialize_app_state(cli: &Cli) -> Result<AppState> {
    tracing::debug!("Initializing application state");

    let persistence = match PersistenceManager::new() {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!("Persistence unavailable: {}. State will not be saved.", e);
            None
        }
    };

    let mut config = persistence
        .as_ref()
        .map(|p| {
            p.load_config().unwrap_or_else(|e| {
                tracing::warn!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            })
        })
        .unwrap_or_default();

    // CLI overrides are not persisted
    if !cli.filter_fields.is_empty() {
        config.filter_fields = cli.filter_fields.clone();
    }
    if cli.full_width {
        config.full_width = true;
    }
    tracing::debug!(
        "Config loaded: filter_fields={:?}, full_width={}, page_size={}",
        config.filter_fields,
        config.full_width,
        config.page_size
    );

    let mut app = AppState::new(config, persistence);
    app.cli_sort = cli.sort_spec().map_err(AppError::Other)?;

    let (width, height) = crossterm::terminal::size()?;
    app.update_viewport_size(width, height);

    Ok(app)
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    task_rx: &mut mpsc::UnboundedReceiver<TaskMessage>,
    task_runner: &AsyncTaskRunner,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_DURATION_MS);
    let mut input_handler = InputHandler;

    while running.load(Ordering::SeqCst) && !app.should_quit {
        let frame_start = Instant::now();

        // Process all pending task messages (non-blocking)
        while let Ok(msg) = task_rx.try_recv() {
            handle_task_message(app, msg);
        }

        if app.reload_requested {
            app.reload_requested = false;
            if let Some(path) = app.data_path.clone() {
                tracing::info!("Reloading {}", path);
                task_runner.spawn_load_data(path.clone());
                app.loading_state = LoadingState::loading(path);
            }
        }

        terminal.draw(|f| {
            ui::layout::render(f, app);
        })?;

        // Poll for input events (non-blocking)
        if event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input_handler.handle_key(app, key)?;
                }
                Event::Mouse(mouse) => {
                    input_handler.handle_mouse(app, mouse)?;
                }
                Event::Resize(width, height) => {
                    app.update_viewport_size(width, height);
                }
                _ => {}
            }
        }

        // Sleep to maintain frame rate
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            tokio::time::sleep(frame_duration - elapsed).await;
        }
    }

    Ok(())
}

fn handle_task_message(app: &mut AppState, msg: TaskMessage) {
    match msg {
        TaskMessage::DataLoadingStarted { file_path } => {
            tracing::info!("Data loading started: {}", file_path);
            // Keep the spinner's start time if the load was already announced
            if !matches!(app.loading_state, LoadingState::LoadingData { .. }) {
                app.loading_state = LoadingState::loading(file_path);
            }
        }

        TaskMessage::DataLoaded {
            rows,
            columns,
            file_path,
        } => {
            tracing::info!("Data loaded: {} ({} rows)", file_path, rows.len());
            app.load_data(rows, columns, Some(file_path));
        }

        TaskMessage::DataLoadError { error } => {
            tracing::error!("Data load error: {}", error);
            app.loading_state = LoadingState::Idle;
            app.show_error(format!("Failed to load data: {}", error));
        }
    }
}
