//! Modal dialogs
//!
//! A single [`ModalController`] owns the one dialog surface of the
//! application. Callers describe a dialog with a [`DialogRequest`], arm a
//! callback pair and get exactly one of confirm or cancel back. The presets
//! in [`presets`] wrap this for the partition actions.

pub mod controller;
pub mod form;
pub mod presets;
pub mod render;
pub mod request;

pub use controller::{DialogPhase, Focus, ModalConfig, ModalController};
pub use form::{FieldState, FormState};
pub use presets::INVALID_SIZE_MESSAGE;
pub use request::{
    CancelHandler, ConfirmHandler, ConfirmResult, DialogBody, DialogCallbacks, DialogMode,
    DialogOutcome, DialogRequest, FieldKind, FieldSpec, FormData, PropertyEntry, SelectOption,
};

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::{app::state::NotificationLevel, ui::theme::Theme};

/// Trait for modal components
pub trait Modal {
    /// Render the modal
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Handle key events
    fn handle_key_event(&mut self, key: KeyEvent) -> ModalResult;

    /// Handle mouse events
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> ModalResult;

    /// Check if modal is open
    fn is_open(&self) -> bool;

    /// Close the modal
    fn close(&mut self);
}

/// Result from modal interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResult {
    /// Event was not for the modal
    Ignored,
    /// Event changed input or focus only
    Consumed,
    /// Native validation failed; the dialog stays open
    Invalid,
    /// The confirm handler refused the values; the dialog stays open
    Rejected,
    /// User confirmed the dialog
    Confirmed,
    /// User cancelled the dialog
    Cancelled,
}

/// Sink for transient status messages (toasts)
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify(&self, message: &str, level: NotificationLevel);
}
