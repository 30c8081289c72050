//! Application state management
//!
//! Centralized state for the simulator: the disk, the single modal
//! controller, the selection and the toast history.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    disk::{Disk, Partition},
    ui::{components::modals::ModalController, keyboard::NavigationHandler},
};

use super::events::{AppEvent, EventNotifier};

/// Toast history kept for the status bar
const MAX_NOTIFICATIONS: usize = 50;

/// Central application state
///
/// Owns everything the views read:
/// - the simulated disk
/// - the one modal controller, constructed here and kept for the session
/// - selection and layout state
/// - notifications
pub struct AppState {
    /// Application lifecycle state
    pub app_state: AppLifecycleState,

    /// The simulated disk
    pub disk: Disk,

    /// Shared dialog surface
    pub modal: ModalController,

    /// UI state
    pub ui_state: UIState,

    /// Toasts
    pub notification_state: NotificationState,

    event_sender: mpsc::UnboundedSender<AppEvent>,
}

impl AppState {
    /// Create the state for a fresh session
    pub fn new(config: &Config, event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        let disk = Disk::new(config.disk.total_size_mb, config.disk.limits());
        let notifier = EventNotifier::new(event_sender.clone());
        let modal = ModalController::new(config.modal_config(), Box::new(notifier));

        Self {
            app_state: AppLifecycleState::default(),
            disk,
            modal,
            ui_state: UIState::default(),
            notification_state: NotificationState::default(),
            event_sender,
        }
    }

    /// Sender that dialog callbacks post their results to
    pub fn event_sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_sender.clone()
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        matches!(self.app_state.lifecycle, LifecyclePhase::Quitting)
    }

    /// Set the quit flag
    pub fn set_should_quit(&mut self, should_quit: bool) {
        if should_quit {
            self.app_state.lifecycle = LifecyclePhase::Quitting;
            self.app_state.quit_requested_at = Some(Utc::now());
        }
    }

    pub fn set_running(&mut self) {
        self.app_state.lifecycle = LifecyclePhase::Running;
    }

    /// Currently selected slot (volume or unallocated)
    pub fn selected_partition(&self) -> Option<&Partition> {
        self.disk.partitions().get(self.ui_state.selected_index)
    }

    /// Select a slot by id; unknown ids leave the selection alone
    pub fn select_partition(&mut self, id: Uuid) {
        if let Some(index) = self.disk.index_of(id) {
            self.ui_state.selected_index = index;
        }
    }

    /// Follow the previously selected slot after slots were inserted or
    /// removed in front of it
    pub fn keep_selection(&mut self, selected: Option<Uuid>) {
        match selected {
            Some(id) if self.disk.index_of(id).is_some() => self.select_partition(id),
            _ => self.clamp_selection(),
        }
    }

    /// Keep the selection on the disk after the layout changed
    pub fn clamp_selection(&mut self) {
        let count = self.disk.partitions().len();
        if self.ui_state.selected_index >= count {
            self.ui_state.selected_index = count.saturating_sub(1);
        }
    }

    /// Record a toast and log it
    pub fn notify(&mut self, message: impl Into<String>, level: NotificationLevel) {
        let message = message.into();
        match level {
            NotificationLevel::Error => error!("{}", message),
            NotificationLevel::Warning => warn!("{}", message),
            NotificationLevel::Success | NotificationLevel::Info => info!("{}", message),
        }

        let notifications = &mut self.notification_state.notifications;
        notifications.push_back(Notification::new(message, level));
        while notifications.len() > MAX_NOTIFICATIONS {
            notifications.pop_front();
        }
    }

    /// Latest toast if it is still within its display time
    pub fn active_notification(&self, now: DateTime<Utc>, duration: Duration) -> Option<&Notification> {
        let latest = self.notification_state.notifications.back()?;
        let age = now.signed_duration_since(latest.created_at).to_std().unwrap_or_default();
        (age < duration).then_some(latest)
    }
}

impl NavigationHandler for AppState {
    fn selected_index(&self) -> usize {
        self.ui_state.selected_index
    }

    fn set_selected_index(&mut self, index: usize) {
        debug!("Selected slot {}", index);
        self.ui_state.selected_index = index;
    }

    fn item_count(&self) -> usize {
        self.disk.partitions().len()
    }
}

/// Application lifecycle state
#[derive(Debug, Clone)]
pub struct AppLifecycleState {
    pub lifecycle: LifecyclePhase,
    pub started_at: DateTime<Utc>,
    pub quit_requested_at: Option<DateTime<Utc>>,
}

impl Default for AppLifecycleState {
    fn default() -> Self {
        Self {
            lifecycle: LifecyclePhase::Starting,
            started_at: Utc::now(),
            quit_requested_at: None,
        }
    }
}

/// Application lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Starting,
    Running,
    Quitting,
}

/// UI state management
#[derive(Debug, Clone)]
pub struct UIState {
    pub selected_index: usize,
    pub terminal_size: (u16, u16),
}

impl Default for UIState {
    fn default() -> Self {
        Self {
            selected_index: 0,
            terminal_size: (80, 24),
        }
    }
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Info => "info",
        }
    }
}

/// A transient status message
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: String, level: NotificationLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            level,
            created_at: Utc::now(),
        }
    }
}

/// Notification history, oldest first
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    pub notifications: VecDeque<Notification>,
}

impl NotificationState {
    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.back()
    }
}
