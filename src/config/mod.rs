//! Configuration management module
//!
//! TOML configuration with a default for every section, so a partial file
//! (or none at all) is always usable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use crate::{
    disk::{
        size::{MAX_PRIMARY_PARTITIONS, MIN_PARTITION_SIZE_MB, MIN_SHRINK_SIZE_MB},
        validation::DiskLimits,
    },
    error::{AppError, AppResult},
    ui::components::modals::ModalConfig,
};

const LOCAL_CONFIG_FILE: &str = "./diskpart.toml";
const CONFIG_DIR_NAME: &str = "diskpart-tui";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Simulated disk
    pub disk: DiskConfig,
    /// UI configuration
    pub ui: UIConfig,
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./diskpart.toml
    /// 2. ~/.config/diskpart-tui/config.toml
    /// 3. Default configuration
    pub async fn load() -> AppResult<Self> {
        info!("Loading application configuration");

        if let Ok(config) = Self::load_from_file(LOCAL_CONFIG_FILE).await {
            info!("Loaded configuration from {}", LOCAL_CONFIG_FILE);
            return Ok(config);
        }

        if let Some(config_path) = Self::get_user_config_path() {
            if let Ok(config) = Self::load_from_file(&config_path).await {
                info!("Loaded configuration from {}", config_path.display());
                return Ok(config);
            }
        }

        info!("Using default configuration");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path).await?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let path = path.as_ref();
        debug!("Saving configuration to: {}", path.display());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content).await?;

        info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> AppResult<()> {
        debug!("Validating configuration");

        if self.disk.min_partition_size_mb == 0 {
            return Err(AppError::config("min_partition_size_mb must be greater than 0"));
        }

        if self.disk.total_size_mb <= self.disk.min_partition_size_mb {
            return Err(AppError::config(
                "total_size_mb must be larger than min_partition_size_mb",
            ));
        }

        if self.disk.max_primary_partitions == 0 {
            return Err(AppError::config("max_primary_partitions must be greater than 0"));
        }

        if self.ui.toast_duration_ms == 0 {
            return Err(AppError::config("toast_duration_ms must be greater than 0"));
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(AppError::config("tick_rate_ms must be greater than 0"));
        }

        let level = self.app.log_level.trim().to_ascii_lowercase();
        if !level.contains('=') && !crate::LOG_LEVELS.contains(&level.as_str()) {
            return Err(AppError::config(format!(
                "log_level must be one of {} or a filter directive",
                crate::LOG_LEVELS.join(", ")
            )));
        }

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Settings for the dialog controller
    pub fn modal_config(&self) -> ModalConfig {
        ModalConfig {
            transition: Duration::from_millis(self.ui.transition_ms),
            min_partition_size_mb: self.disk.min_partition_size_mb,
        }
    }

    /// Get user configuration directory path
    fn get_user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push(CONFIG_DIR_NAME);
            path.push("config.toml");
            path
        })
    }

    /// Default log file location for TUI mode
    pub fn default_log_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|mut path| {
            path.push(CONFIG_DIR_NAME);
            path.push("diskpart-tui.log");
            path
        })
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name
    pub name: String,
    /// Application version
    pub version: String,
    /// Log level
    pub log_level: String,
    /// Log file for TUI mode; falls back to the data directory
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "DiskPart TUI".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            }
            .to_string(),
            log_file: None,
        }
    }
}

/// Simulated disk configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    /// Disk capacity in MB
    pub total_size_mb: u64,
    /// Smallest volume that may exist
    pub min_partition_size_mb: u64,
    /// Smallest amount a shrink may remove
    pub min_shrink_size_mb: u64,
    /// Primary partition limit (MBR)
    pub max_primary_partitions: usize,
}

impl DiskConfig {
    pub fn limits(&self) -> DiskLimits {
        DiskLimits {
            min_partition_size_mb: self.min_partition_size_mb,
            min_shrink_size_mb: self.min_shrink_size_mb,
            max_primary_partitions: self.max_primary_partitions,
        }
    }
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            total_size_mb: 512_000,
            min_partition_size_mb: MIN_PARTITION_SIZE_MB,
            min_shrink_size_mb: MIN_SHRINK_SIZE_MB,
            max_primary_partitions: MAX_PRIMARY_PARTITIONS,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    /// Theme name
    pub theme: String,
    /// Dialog show/hide transition in milliseconds; 0 disables it
    pub transition_ms: u64,
    /// How long a toast stays in the status bar
    pub toast_duration_ms: u64,
    /// Enable mouse support
    pub enable_mouse: bool,
    /// Input poll / redraw interval in milliseconds
    pub tick_rate_ms: u64,
}

impl UIConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            transition_ms: 150,
            toast_duration_ms: 3000,
            enable_mouse: true,
            tick_rate_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.disk.limits(), DiskLimits::default());
        assert_eq!(config.modal_config().transition, Duration::from_millis(150));
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: Config = toml::from_str("[ui]\ntransition_ms = 0\n").unwrap();
        assert_eq!(config.ui.transition_ms, 0);
        assert_eq!(config.ui.toast_duration_ms, 3000);
        assert_eq!(config.disk, DiskConfig::default());
    }

    #[test]
    fn rejects_disk_smaller_than_a_partition() {
        let mut config = Config::default();
        config.disk.total_size_mb = 50;
        assert!(matches!(config.validate(), Err(AppError::Config { .. })));
    }

    #[test]
    fn log_level_accepts_levels_and_directives() {
        let mut config = Config::default();
        config.app.log_level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config { .. })));

        config.app.log_level = "WARN".to_string();
        assert!(config.validate().is_ok());

        config.app.log_level = "diskpart_tui=trace".to_string();
        assert!(config.validate().is_ok());
    }
}
