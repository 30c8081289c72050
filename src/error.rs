//! Error handling for DiskPart TUI
//!
//! Application errors are defined with thiserror and propagated with `?`.
//! Disk rule violations get their own enum so the host can show the exact
//! OS-style message to the user.

use thiserror::Error;

use crate::disk::size::format_size;

/// Application result type alias
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Main application error enum
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse/serialize errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Terminal/UI operation errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A partition operation was refused by the disk rules
    #[error("Disk error: {0}")]
    Disk(#[from] DiskError),

    /// Application state errors
    #[error("State error: {message}")]
    State { message: String },

    /// Generic application errors
    #[error("Application error: {message}")]
    Application { message: String },
}

impl AppError {
    /// Create a new Config error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new State error
    pub fn state<S: Into<String>>(message: S) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a new Application error
    pub fn application<S: Into<String>>(message: S) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Disk(_) => true,
            AppError::State { .. } => true,
            AppError::Application { .. } => true,
            AppError::Io(_) => false,
            AppError::Config { .. } => false,
            AppError::Terminal(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Disk(_) => ErrorSeverity::Low,
            AppError::Io(_) => ErrorSeverity::High,
            AppError::Config { .. } => ErrorSeverity::High,
            AppError::Terminal(_) => ErrorSeverity::Critical,
            AppError::State { .. } => ErrorSeverity::Medium,
            AppError::Application { .. } => ErrorSeverity::Medium,
        }
    }
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Convert severity to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Low => "LOW",
            ErrorSeverity::Medium => "MEDIUM",
            ErrorSeverity::High => "HIGH",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
}

/// Partition rule violations
///
/// Display strings are shown verbatim in the status bar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiskError {
    #[error("The volume size you specified is too small. The minimum size is {min_mb} MB.")]
    SizeTooSmall { min_mb: u64 },

    #[error("The shrink size must be greater than 0 MB.")]
    ShrinkZero,

    #[error("The shrink size is too small. Minimum shrink size is {min_mb} MB.")]
    ShrinkTooSmall { min_mb: u64 },

    #[error("The volume cannot be shrunk because the resulting volume would be too small. Maximum shrink size: {}.", format_size(*.max_shrink_mb))]
    ShrinkBelowMinimum { max_shrink_mb: u64 },

    #[error("The shrink size cannot be equal to or greater than the current volume size.")]
    ShrinkExceedsVolume,

    #[error("The volume cannot be shrunk beyond the point where any unmovable files are located. Maximum shrink size: {}.", format_size(*.max_shrink_mb))]
    UnmovableFiles { max_shrink_mb: u64 },

    #[error("The specified partition could not be found.")]
    PartitionNotFound,

    #[error("The volume cannot be extended. There is no adjacent unallocated space available. You can only extend a volume into unallocated space that is immediately next to it.")]
    NoAdjacentSpace,

    #[error("Cannot extend from left. No adjacent unallocated space.")]
    NoAdjacentSpaceBefore,

    #[error("The extend size must be greater than 0 MB.")]
    ExtendZero,

    #[error("The volume cannot be extended by {}. Only {} of unallocated space is available.", format_size(*.requested_mb), format_size(*.available_mb))]
    ExtendExceedsSpace { requested_mb: u64, available_mb: u64 },

    #[error("Cannot create more than {max} primary partitions. This is a limitation of the Master Boot Record (MBR) partition style.")]
    TooManyPrimary { max: usize },

    #[error("Insufficient unallocated space. Requested: {}, Available: {}.", format_size(*.requested_mb), format_size(*.available_mb))]
    InsufficientSpace { requested_mb: u64, available_mb: u64 },

    #[error("No unallocated space available")]
    NoUnallocatedSpace,

    #[error("The selected space is not a volume.")]
    NotAVolume,

    #[error("Unallocated space cannot be deleted.")]
    DeleteUnallocated,

    #[error("Unallocated space cannot be formatted.")]
    FormatUnallocated,

    #[error("The volume label cannot be empty.")]
    EmptyName,

    #[error("The volume label is too long. Maximum length is 11 characters (FAT32 limitation).")]
    NameTooLong,

    #[error("A volume with the label \"{0}\" already exists. Please choose a different name.")]
    DuplicateName(String),

    #[error("The volume label contains invalid characters. Only letters, numbers, spaces, hyphens, and underscores are allowed.")]
    InvalidNameCharacters,
}
