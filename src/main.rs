use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use diskpart_tui::{
    app::{events::EventHandler, state::AppState},
    config::Config,
    disk::size::format_size,
    error::{AppError, AppResult},
    initialize_file_logging, initialize_logging,
    ui::components::{modals::Modal, MenuAction},
    App,
};
use std::{env, process, time::Instant};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command line arguments first (before logging to avoid noise)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        process::exit(0);
    }

    let demo_mode = args.iter().any(|a| a == "--demo")
        || env::var("DISKPART_DEMO_MODE").is_ok()
        || env::var("TERM").unwrap_or_default().is_empty();

    if demo_mode {
        initialize_logging(&Config::default().app.log_level)
            .map_err(|e| AppError::application(e.to_string()))?;
        info!("DiskPart TUI demo mode starting");
        run_demo_mode().await
    } else {
        run_full_tui_mode().await
    }
}

/// Non-interactive walkthrough of a dialog session, logged to stderr
async fn run_demo_mode() -> AppResult<()> {
    let start_time = Instant::now();

    let mut config = Config::default();
    config.ui.transition_ms = 0;

    let mut events = EventHandler::new().await?;
    let mut state = AppState::new(&config, events.get_sender());
    state.set_running();

    info!("Default layout:");
    log_layout(&state);

    // Create E: in the unallocated space
    state.ui_state.selected_index = state.disk.partitions().len().saturating_sub(1);
    state.dispatch(MenuAction::CreatePartition);
    type_text(&mut state, "E:");
    press(&mut state, KeyCode::Tab);
    type_text(&mut state, "50 GB");
    press(&mut state, KeyCode::Enter);
    drain(&mut events, &mut state).await;

    // A size that does not parse keeps the shrink dialog open
    state.ui_state.selected_index = 0;
    state.dispatch(MenuAction::ShrinkVolume);
    type_text(&mut state, "lots");
    press(&mut state, KeyCode::Enter);
    drain(&mut events, &mut state).await;
    info!("Shrink dialog still open: {}", state.modal.is_open());

    press_with(&mut state, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    type_text(&mut state, "20 GB");
    press(&mut state, KeyCode::Enter);
    drain(&mut events, &mut state).await;

    state.dispatch(MenuAction::Properties);
    if let Some(dialog) = state.modal.dialog() {
        info!("{}:", dialog.title());
        for entry in dialog.properties() {
            info!("  {:<14}{}", entry.label, entry.value);
        }
    }
    press(&mut state, KeyCode::Esc);

    info!("Final layout:");
    log_layout(&state);

    info!("Demo finished in {:?}", start_time.elapsed());
    Ok(())
}

fn log_layout(state: &AppState) {
    for partition in state.disk.partitions() {
        info!(
            "  {:<12} {:<12} {:>10}",
            partition.name,
            partition.kind.label(),
            format_size(partition.size_mb)
        );
    }
    info!(
        "  Unallocated total: {}",
        format_size(state.disk.total_unallocated())
    );
}

fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        press(state, KeyCode::Char(c));
    }
}

fn press(state: &mut AppState, code: KeyCode) {
    press_with(state, KeyEvent::from(code));
}

fn press_with(state: &mut AppState, key: KeyEvent) {
    let result = state.modal.handle_key_event(key);
    debug!("{:?} -> {:?}", key.code, result);
}

async fn drain(events: &mut EventHandler, state: &mut AppState) {
    while let Some(event) = events.try_receive_event().await {
        state.apply_event(event);
    }
    if let Some(toast) = state.notification_state.latest() {
        info!("[{}] {}", toast.level.as_str(), toast.message);
    }
}

fn print_help() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]", env!("CARGO_PKG_NAME"));
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print this help message and exit");
    println!("    -V, --version    Print version information and exit");
    println!("        --demo       Run a scripted session (non-interactive)");
    println!();
    println!("ENVIRONMENT:");
    println!("    DISKPART_DEMO_MODE   Set to run in demo mode");
    println!("    RUST_LOG             Set logging level (debug, info, warn, error)");
    println!();
    println!("CONFIGURATION:");
    println!("    ./diskpart.toml or <config dir>/diskpart-tui/config.toml");
}

async fn run_full_tui_mode() -> AppResult<()> {
    let config = Config::load().await?;

    // The terminal is in raw mode, so logs go to a file
    let log_path = config
        .app
        .log_file
        .clone()
        .or_else(Config::default_log_path);
    if let Some(path) = log_path {
        if let Err(e) = initialize_file_logging(&path, &config.app.log_level) {
            eprintln!("Logging disabled: {:#}", e);
        }
    }
    info!("DiskPart TUI starting");

    let app = match App::with_config(config).await {
        Ok(app) => app,
        Err(e) => {
            warn!("Failed to initialize TUI: {}. Running in demo mode.", e);
            return run_demo_mode().await;
        }
    };
    debug!("Application startup time: {:?}", app.startup_time());

    match app.run().await {
        Ok(()) => {
            info!("DiskPart TUI terminated gracefully");
            Ok(())
        }
        Err(e) => {
            warn!("TUI mode failed: {}. Falling back to demo mode.", e);
            run_demo_mode().await
        }
    }
}
