//! DiskPart TUI - terminal disk partition simulator
//!
//! An in-memory disk with primary, logical and unallocated slots, driven
//! from a terminal UI. Every partition operation goes through one shared
//! modal dialog that collects and validates its input.
//!
//! # Architecture
//!
//! - **Presentation Layer**: ratatui components and the modal controller
//! - **Application Layer**: state, action dispatch and the event channel
//! - **Domain Layer**: the disk model, size parsing and validation rules

pub mod app;
pub mod config;
pub mod disk;
pub mod error;
pub mod ui;

pub use app::App;
pub use error::{AppError, AppResult};

use anyhow::{Context, Result};
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "diskpart_tui=info";

/// Levels accepted by `[app] log_level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Filter directive for a configured level.
///
/// A bare level applies to this crate only; anything else is passed through
/// as a full `EnvFilter` directive.
pub fn log_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        DEFAULT_LOG_FILTER.to_string()
    } else if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        format!("diskpart_tui={}", level.to_ascii_lowercase())
    } else {
        level.to_string()
    }
}

/// `RUST_LOG` when set, else the configured level
fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_directive(level)))
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

/// Initialize logging to stderr
///
/// `RUST_LOG` overrides `level`.
pub fn initialize_logging(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// Initialize logging to a file
///
/// Used while the terminal is in raw mode, where stderr output would
/// corrupt the screen.
pub fn initialize_file_logging(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_levels_scope_to_this_crate() {
        assert_eq!(log_directive("debug"), "diskpart_tui=debug");
        assert_eq!(log_directive(" WARN "), "diskpart_tui=warn");
        assert_eq!(log_directive(""), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn full_directives_pass_through() {
        assert_eq!(log_directive("diskpart_tui=trace,tokio=warn"), "diskpart_tui=trace,tokio=warn");
    }
}
