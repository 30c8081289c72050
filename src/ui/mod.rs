//! User Interface module
//!
//! Terminal interface built on ratatui: a header, the disk bar, the volume
//! list with properties and a status line. The context menu and the modal
//! dialog are drawn as overlays on top.

pub mod components;
pub mod keyboard;
pub mod theme;

use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    app::{
        events::{post, AppEvent},
        state::AppState,
    },
    config::UIConfig,
    disk::{size::format_size, validation, Edge},
    error::AppResult,
};
use components::{
    modals::Modal, BarClick, Component, ContextMenuComponent, DetailsPanelComponent,
    DiskBarComponent, StatusBarComponent,
};
use keyboard::{ActionKey, NavigationHandler, ShortcutManager};
use theme::Theme;

const HEADER_TITLE: &str = "Disk Management";

/// Height of the disk bar including its border
const DISK_BAR_HEIGHT: u16 = 7;

/// Main UI renderer
pub struct UI {
    /// Current theme
    theme: Theme,
    /// UI configuration
    config: UIConfig,
    /// Component instances
    components: UIComponents,
    shortcuts: ShortcutManager,
}

impl UI {
    /// Create a new UI instance
    pub fn new(config: &UIConfig) -> AppResult<Self> {
        debug!("Initializing UI with theme: {}", config.theme);

        let theme = Theme::load(&config.theme)?;
        let components = UIComponents::new(config);

        Ok(Self {
            theme,
            config: config.clone(),
            components,
            shortcuts: ShortcutManager::new(),
        })
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render the entire UI
    pub fn render(&mut self, frame: &mut Frame, state: &mut AppState) {
        let size = frame.size();
        state.ui_state.terminal_size = (size.width, size.height);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),               // Header
                Constraint::Length(DISK_BAR_HEIGHT), // Disk bar
                Constraint::Min(0),                  // Volumes and properties
                Constraint::Length(1),               // Status line
            ])
            .split(size);

        self.render_header(frame, chunks[0], state);
        self.components
            .disk_bar
            .render(frame, chunks[1], state, &self.theme);
        self.components
            .details
            .render(frame, chunks[2], state, &self.theme);
        self.components
            .status_bar
            .render(frame, chunks[3], state, &self.theme);

        if self.components.context_menu.is_open() {
            self.components
                .context_menu
                .render(frame, size, state, &self.theme);
        }

        state.modal.render(frame, size, &self.theme);
    }

    /// Handle key events
    ///
    /// A visible dialog takes every key, then an open context menu, then
    /// the navigation and action shortcuts.
    pub fn handle_key_event(&mut self, key: KeyEvent, state: &mut AppState) -> AppResult<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        if state.modal.is_visible() {
            let result = state.modal.handle_key_event(key);
            debug!("Dialog key result: {:?}", result);
            return Ok(());
        }

        if self.components.context_menu.is_open() {
            if let Some(action) = self.components.context_menu.handle_key(key) {
                self.components.context_menu.close();
                state.dispatch(action);
            }
            return Ok(());
        }

        if let Some(nav) = self.shortcuts.is_navigation_key(&key) {
            state.handle_navigation(nav);
            return Ok(());
        }

        match self.shortcuts.is_action_key(&key) {
            Some(ActionKey::Quit) => state.set_should_quit(true),
            Some(ActionKey::Menu) => self.open_context_menu(state, None),
            Some(action) => {
                if let Some(menu_action) = action.menu_action() {
                    state.dispatch(menu_action);
                }
            }
            None => {}
        }

        Ok(())
    }

    /// Handle mouse events
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, state: &mut AppState) -> AppResult<()> {
        if !self.config.enable_mouse {
            return Ok(());
        }

        if state.modal.is_visible() {
            state.modal.handle_mouse_event(mouse);
            return Ok(());
        }

        if self.components.context_menu.is_open() {
            if let Some(action) = self.components.context_menu.handle_mouse_event(mouse) {
                self.components.context_menu.close();
                state.dispatch(action);
            }
            return Ok(());
        }

        match self.components.disk_bar.handle_mouse_event(mouse) {
            Some(BarClick::Select(id)) => state.select_partition(id),
            Some(BarClick::Menu { id, position }) => {
                state.select_partition(id);
                self.open_context_menu(state, Some(position));
            }
            Some(BarClick::Resize { id, edge, grow_mb }) => {
                resize_partition(state, id, edge, grow_mb);
            }
            None => {}
        }

        Ok(())
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16, state: &mut AppState) {
        debug!("Terminal resized to {}x{}", width, height);
        state.ui_state.terminal_size = (width, height);
        self.components.context_menu.close();
    }

    pub fn context_menu(&self) -> &ContextMenuComponent {
        &self.components.context_menu
    }

    /// Open the context menu for the selected slot, under it unless a
    /// position is given
    fn open_context_menu(&mut self, state: &AppState, position: Option<(u16, u16)>) {
        let Some(partition) = state.selected_partition() else {
            return;
        };

        let position = position.unwrap_or_else(|| {
            self.components
                .disk_bar
                .slot_area(partition.id)
                .map(|area| (area.x, area.y + area.height))
                .unwrap_or((0, 0))
        });

        let items = ContextMenuComponent::partition_menu(partition, state.disk.partitions());
        self.components.context_menu.open(position, items);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let title = format!(" {} ", HEADER_TITLE);
        let summary = format!(
            " {} volumes | {} unallocated",
            state
                .disk
                .partitions()
                .iter()
                .filter(|p| !p.is_unallocated())
                .count(),
            format_size(state.disk.total_unallocated())
        );

        let header = Paragraph::new(summary).style(self.theme.text_style()).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(self.theme.border_style())
                .title_style(self.theme.text_style()),
        );
        frame.render_widget(header, area);
    }
}

/// Container for all UI components
struct UIComponents {
    disk_bar: DiskBarComponent,
    details: DetailsPanelComponent,
    status_bar: StatusBarComponent,
    context_menu: ContextMenuComponent,
}

impl UIComponents {
    fn new(config: &UIConfig) -> Self {
        Self {
            disk_bar: DiskBarComponent::new(),
            details: DetailsPanelComponent::new(),
            status_bar: StatusBarComponent::new(config.toast_duration()),
            context_menu: ContextMenuComponent::new(),
        }
    }
}

/// Post a dragged edge as a shrink or extend. The disk applies its rules
/// when the event arrives, so a refused drag toasts like a refused dialog.
fn resize_partition(state: &AppState, id: Uuid, edge: Edge, grow_mb: i64) {
    let size_mb = grow_mb.unsigned_abs();
    let event = if grow_mb > 0 {
        // Dragging past the free slot takes all of it
        let available = state.disk.index_of(id).and_then(|index| {
            validation::validate_extend_from(state.disk.partitions(), index, 0, edge).ok()
        });
        AppEvent::ExtendPartition {
            id,
            size_mb: available.map_or(size_mb, |available_mb| size_mb.min(available_mb)),
            edge,
        }
    } else {
        AppEvent::ShrinkPartition { id, size_mb, edge }
    };
    post(&state.event_sender(), event);
}
