//! Application core module
//!
//! Contains the main loop, state management and the event channel that
//! dialog callbacks report through.

pub mod actions;
pub mod events;
pub mod state;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    ui::UI,
};
use events::EventHandler;
use state::AppState;

/// Main application struct
///
/// Manages the application lifecycle:
/// - terminal setup and cleanup
/// - input routing and the event channel
/// - dialog transitions
pub struct App {
    /// Application state
    state: AppState,
    /// Receiving end of the callback channel
    event_handler: EventHandler,
    /// UI renderer
    ui: UI,
    /// Application configuration
    config: Config,
    startup_time: Duration,
}

impl App {
    /// Create a new application instance from the configuration on disk
    pub async fn new() -> AppResult<Self> {
        let config = Config::load().await?;
        Self::with_config(config).await
    }

    /// Create a new application instance from an explicit configuration
    pub async fn with_config(config: Config) -> AppResult<Self> {
        let init_start = Instant::now();
        info!("Initializing disk partition simulator");

        config.validate()?;

        let event_handler = EventHandler::new().await?;
        let mut state = AppState::new(&config, event_handler.get_sender());
        let ui = UI::new(&config.ui)?;
        state.set_running();

        let startup_time = init_start.elapsed();
        debug!("Application initialized in {:?}", startup_time);

        Ok(Self {
            state,
            event_handler,
            ui,
            config,
            startup_time,
        })
    }

    /// Run the main application loop
    ///
    /// Sets up the terminal, handles events and restores the terminal even
    /// when the loop fails.
    pub async fn run(mut self) -> AppResult<()> {
        info!("Starting application main loop");

        self.setup_terminal()?;

        let result = self.main_loop().await;

        self.cleanup_terminal()?;

        result
    }

    /// Setup terminal for TUI
    ///
    /// A failing step undoes the ones before it, so an error never leaves
    /// the terminal in raw mode.
    fn setup_terminal(&self) -> AppResult<()> {
        enable_raw_mode().map_err(|e| {
            warn!("Failed to enable raw mode: {}", e);
            AppError::Io(e)
        })?;

        run_or_undo(
            || self.enter_screen(),
            || {
                if let Err(e) = disable_raw_mode() {
                    warn!("Failed to disable raw mode: {}", e);
                }
            },
        )
    }

    fn enter_screen(&self) -> AppResult<()> {
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(AppError::Io)?;
        if !self.config.ui.enable_mouse {
            return Ok(());
        }

        run_or_undo(
            || execute!(std::io::stdout(), EnableMouseCapture).map_err(AppError::Io),
            || {
                if let Err(e) = execute!(std::io::stdout(), LeaveAlternateScreen) {
                    warn!("Failed to leave alternate screen: {}", e);
                }
            },
        )
    }

    /// Cleanup terminal after TUI
    fn cleanup_terminal(&self) -> AppResult<()> {
        disable_raw_mode()?;
        let mut stdout = std::io::stdout();
        if self.config.ui.enable_mouse {
            execute!(stdout, DisableMouseCapture)?;
        }
        execute!(stdout, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Main application event loop
    async fn main_loop(&mut self) -> AppResult<()> {
        let backend = CrosstermBackend::new(std::io::stdout());
        let mut terminal = Terminal::new(backend)?;
        let tick_rate = self.config.ui.tick_rate();

        info!("Entering main application loop");

        loop {
            terminal.draw(|f| {
                self.ui.render(f, &mut self.state);
            })?;

            // Shorter polls while a dialog animates
            let poll_timeout = if self.state.modal.is_visible() {
                tick_rate.min(Duration::from_millis(16))
            } else {
                tick_rate
            };
            if event::poll(poll_timeout)? {
                self.handle_input(event::read()?)?;
            }

            self.process_app_events().await;
            self.state.modal.tick(Instant::now());

            if self.state.should_quit() {
                info!("Application quit requested");
                break;
            }
        }

        Ok(())
    }

    /// Route one terminal event
    fn handle_input(&mut self, event: Event) -> AppResult<()> {
        match event {
            Event::Key(key) => self.ui.handle_key_event(key, &mut self.state)?,
            Event::Mouse(mouse) => self.ui.handle_mouse_event(mouse, &mut self.state)?,
            Event::Resize(width, height) => self.ui.handle_resize(width, height, &mut self.state),
            _ => {}
        }
        Ok(())
    }

    /// Apply everything the dialog callbacks posted since the last pass
    async fn process_app_events(&mut self) {
        while let Some(event) = self.event_handler.try_receive_event().await {
            debug!("Applying event: {:?}", event);
            self.state.apply_event(event);
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get application startup time
    pub fn startup_time(&self) -> Duration {
        self.startup_time
    }
}

/// Run `step`, calling `undo` if it fails
fn run_or_undo<S, U>(step: S, undo: U) -> AppResult<()>
where
    S: FnOnce() -> AppResult<()>,
    U: FnOnce(),
{
    step().map_err(|e| {
        undo();
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn failed_setup_step_is_undone() {
        let undone = Cell::new(false);
        let result = run_or_undo(
            || Err(AppError::Terminal("no alternate screen".to_string())),
            || undone.set(true),
        );

        assert!(matches!(result, Err(AppError::Terminal(_))));
        assert!(undone.get());
    }

    #[test]
    fn successful_setup_step_is_kept() {
        let undone = Cell::new(false);
        assert!(run_or_undo(|| Ok(()), || undone.set(true)).is_ok());
        assert!(!undone.get());
    }
}
