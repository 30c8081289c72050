//! UI Components module
//!
//! Reusable views of the simulator screen. The modal dialog lives in
//! [`modals`] and is drawn on top of everything else.

pub mod context_menu;
pub mod details_panel;
pub mod disk_bar;
pub mod modals;
pub mod status_bar;

pub use context_menu::{ContextMenuComponent, MenuAction, MenuItem};
pub use details_panel::DetailsPanelComponent;
pub use disk_bar::{BarClick, DiskBarComponent};
pub use modals::{Modal, ModalController, ModalResult};
pub use status_bar::StatusBarComponent;

use ratatui::{layout::Rect, Frame};

use crate::{app::state::AppState, ui::theme::Theme};

/// Trait for UI components that render from application state
pub trait Component {
    /// Render the component
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme);
}
