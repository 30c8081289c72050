//! Application event system
//!
//! Dialog callbacks never touch the disk. They post an [`AppEvent`] on an
//! unbounded channel and the main loop applies it on its next pass.

use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::{
    disk::{Edge, NewPartition},
    error::{AppError, AppResult},
    ui::components::modals::Notifier,
};

use super::state::NotificationLevel;

/// Event handler for async operations
///
/// Owns both ends of the application channel; clones of the sender go to
/// dialog callbacks and the notifier.
pub struct EventHandler {
    /// Sender for application events
    event_sender: mpsc::UnboundedSender<AppEvent>,
    /// Receiver for application events
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Create a new event handler
    pub async fn new() -> AppResult<Self> {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Ok(Self {
            event_sender,
            event_receiver,
        })
    }

    /// Send an event to the application
    pub fn send_event(&self, event: AppEvent) -> AppResult<()> {
        self.event_sender
            .send(event)
            .map_err(|_| AppError::state("Failed to send application event"))?;
        Ok(())
    }

    /// Try to receive an event (non-blocking)
    pub async fn try_receive_event(&mut self) -> Option<AppEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Get a cloned sender for callbacks
    pub fn get_sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_sender.clone()
    }
}

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Show a toast
    Notify {
        message: String,
        level: NotificationLevel,
    },

    /// Create dialog confirmed
    CreatePartition(NewPartition),

    /// Shrink dialog confirmed, or a bar edge dragged inwards
    ShrinkPartition { id: Uuid, size_mb: u64, edge: Edge },

    /// Extend dialog confirmed, or a bar edge dragged outwards
    ExtendPartition { id: Uuid, size_mb: u64, edge: Edge },

    /// Delete dialog confirmed
    DeletePartition { id: Uuid },

    /// Format confirmation accepted
    FormatPartition { id: Uuid },

    /// Reset confirmation accepted
    ResetDisk,

    /// Application shutdown requested
    Shutdown,
}

/// Post an event from a callback. A closed channel only happens during
/// shutdown, so the event is dropped with a warning.
pub fn post(sender: &mpsc::UnboundedSender<AppEvent>, event: AppEvent) {
    if let Err(e) = sender.send(event) {
        warn!("Dropping application event after shutdown: {:?}", e.0);
    }
}

/// [`Notifier`] that turns toasts into [`AppEvent::Notify`]
#[derive(Debug, Clone)]
pub struct EventNotifier {
    sender: mpsc::UnboundedSender<AppEvent>,
}

impl EventNotifier {
    pub fn new(sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { sender }
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        post(
            &self.sender,
            AppEvent::Notify {
                message: message.to_string(),
                level,
            },
        );
    }
}
