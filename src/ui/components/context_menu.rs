//! Context menu for partition actions

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};
use tracing::debug;

use crate::{
    app::state::AppState,
    disk::Partition,
    ui::{keyboard::ActionKey, theme::Theme},
};

use super::Component;

/// Context menu item
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub hotkey: Option<String>,
    pub enabled: bool,
    pub icon: Option<String>,
    pub action: MenuAction,
}

/// Partition actions reachable from the menu or the key map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CreatePartition,
    ShrinkVolume,
    ExtendVolume,
    DeleteVolume,
    FormatVolume,
    Properties,
    ResetDisk,

    // Separator (no action)
    Separator,
}

impl MenuItem {
    pub fn new(id: &str, label: &str, action: MenuAction) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            hotkey: None,
            enabled: true,
            icon: None,
            action,
        }
    }

    pub fn with_hotkey(mut self, hotkey: &str) -> Self {
        self.hotkey = Some(hotkey.to_string());
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn separator(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: String::new(),
            hotkey: None,
            enabled: false,
            icon: None,
            action: MenuAction::Separator,
        }
    }

    fn is_selectable(&self) -> bool {
        self.enabled && self.action != MenuAction::Separator
    }
}

/// Context menu component
pub struct ContextMenuComponent {
    is_open: bool,
    position: (u16, u16),
    items: Vec<MenuItem>,
    selected_index: usize,
    list_state: ListState,
    menu_area: Option<Rect>,
}

impl Default for ContextMenuComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextMenuComponent {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            is_open: false,
            position: (0, 0),
            items: Vec::new(),
            selected_index: 0,
            list_state,
            menu_area: None,
        }
    }

    /// Items for a slot on the disk
    ///
    /// Volumes get the full action list with Extend disabled unless free
    /// space follows them; unallocated space only offers Create.
    pub fn partition_menu(partition: &Partition, partitions: &[Partition]) -> Vec<MenuItem> {
        let create = MenuItem::new("create", "Create New Partition", MenuAction::CreatePartition)
            .with_icon("📁")
            .with_hotkey(ActionKey::Create.as_str());

        if partition.is_unallocated() {
            return vec![create];
        }

        let mut items = Vec::new();
        if partitions.iter().any(Partition::is_unallocated) {
            items.push(create);
            items.push(MenuItem::separator("sep1"));
        }

        let can_extend = partitions
            .iter()
            .position(|p| p.id == partition.id)
            .and_then(|index| partitions.get(index + 1))
            .map_or(false, Partition::is_unallocated);

        let extend = MenuItem::new("extend", "Extend Volume", MenuAction::ExtendVolume)
            .with_icon("📈")
            .with_hotkey(ActionKey::Extend.as_str());

        items.extend([
            MenuItem::new("shrink", "Shrink Volume", MenuAction::ShrinkVolume)
                .with_icon("📉")
                .with_hotkey(ActionKey::Shrink.as_str()),
            if can_extend { extend } else { extend.disabled() },
            MenuItem::new("delete", "Delete Volume", MenuAction::DeleteVolume)
                .with_icon("🗑")
                .with_hotkey(ActionKey::Delete.as_str()),
            MenuItem::new("format", "Format Volume", MenuAction::FormatVolume)
                .with_icon("💾")
                .with_hotkey(ActionKey::Format.as_str()),
            MenuItem::separator("sep2"),
            MenuItem::new("properties", "Properties", MenuAction::Properties)
                .with_icon("ℹ")
                .with_hotkey(ActionKey::Properties.as_str()),
        ]);

        items
    }

    /// Open context menu at position with items
    pub fn open(&mut self, position: (u16, u16), items: Vec<MenuItem>) {
        debug!("Opening context menu with {} items", items.len());
        self.is_open = true;
        self.position = position;
        self.items = items;
        self.selected_index = 0;
        self.list_state.select(Some(0));
        self.menu_area = None;
        self.find_first_enabled_item();
    }

    /// Close context menu
    pub fn close(&mut self) {
        self.is_open = false;
        self.items.clear();
        self.menu_area = None;
    }

    /// Check if context menu is open
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.selected_index)
    }

    /// Keyboard input while open; returns the chosen action
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<MenuAction> {
        if !self.is_open {
            return None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close(),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Enter => return self.execute_selected_action(),
            KeyCode::Char(c) => {
                // Hotkeys pick their item directly
                let index = self.items.iter().position(|item| {
                    item.is_selectable() && item.hotkey.as_deref() == Some(c.to_string().as_str())
                });
                if let Some(index) = index {
                    self.selected_index = index;
                    return self.execute_selected_action();
                }
            }
            _ => {}
        }

        None
    }

    /// Mouse input while open; clicks outside close the menu
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<MenuAction> {
        if !self.is_open {
            return None;
        }
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Down(MouseButton::Right)
        ) {
            return None;
        }

        let Some(menu_area) = self.menu_area else {
            return None;
        };

        let inside = mouse.column >= menu_area.x
            && mouse.column < menu_area.x + menu_area.width
            && mouse.row > menu_area.y
            && mouse.row < menu_area.y + menu_area.height.saturating_sub(1);

        if !inside {
            self.close();
            return None;
        }

        let item_index = (mouse.row - menu_area.y - 1) as usize;
        match self.items.get(item_index) {
            Some(item) if item.is_selectable() => {
                self.selected_index = item_index;
                self.execute_selected_action()
            }
            _ => None,
        }
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        self.step(false);
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        self.step(true);
    }

    fn step(&mut self, forward: bool) {
        let len = self.items.len();
        if len == 0 {
            return;
        }

        let start = self.selected_index;
        let mut index = start;
        loop {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if self.items[index].is_selectable() || index == start {
                break;
            }
        }

        self.selected_index = index;
        self.list_state.select(Some(index));
    }

    /// Execute selected action
    fn execute_selected_action(&mut self) -> Option<MenuAction> {
        let action = self
            .items
            .get(self.selected_index)
            .filter(|item| item.is_selectable())
            .map(|item| item.action)?;
        self.close();
        Some(action)
    }

    /// Find first enabled item and select it
    fn find_first_enabled_item(&mut self) {
        if let Some(index) = self.items.iter().position(MenuItem::is_selectable) {
            self.selected_index = index;
            self.list_state.select(Some(index));
        }
    }

    /// Calculate menu area based on position and content
    fn calculate_menu_area(&self, container_area: Rect) -> Rect {
        let width = self.calculate_menu_width().min(container_area.width);
        let height = (self.items.len() as u16 + 2).min(container_area.height); // +2 for borders

        let max_x = container_area.x + container_area.width - width;
        let max_y = container_area.y + container_area.height - height;

        let x = self.position.0.clamp(container_area.x, max_x);
        let y = self.position.1.clamp(container_area.y, max_y);

        Rect::new(x, y, width, height)
    }

    /// Calculate menu width based on content
    fn calculate_menu_width(&self) -> u16 {
        let widest = self
            .items
            .iter()
            .map(|item| {
                let icon = item.icon.as_ref().map_or(0, |_| 3);
                let hotkey = item.hotkey.as_ref().map_or(0, |h| h.chars().count() + 2);
                item.label.chars().count() + icon + hotkey
            })
            .max()
            .unwrap_or(0);

        (widest + 4).max(20) as u16 // +4 for borders and padding
    }
}

impl Component for ContextMenuComponent {
    fn render(&mut self, frame: &mut Frame, area: Rect, _state: &AppState, theme: &Theme) {
        if !self.is_open {
            return;
        }

        let menu_area = self.calculate_menu_area(area);
        self.menu_area = Some(menu_area);

        frame.render_widget(Clear, menu_area);

        let inner_width = menu_area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                if item.action == MenuAction::Separator {
                    return ListItem::new(Line::from("─".repeat(inner_width)))
                        .style(theme.muted_style());
                }

                let mut spans = Vec::new();
                if let Some(ref icon) = item.icon {
                    spans.push(Span::raw(format!("{} ", icon)));
                }

                let label_style = if item.enabled {
                    theme.text_style()
                } else {
                    theme.muted_style()
                };
                spans.push(Span::styled(item.label.clone(), label_style));

                if let Some(ref hotkey) = item.hotkey {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(hotkey.clone(), theme.muted_style()));
                }

                ListItem::new(Line::from(spans))
            })
            .collect();

        let menu_list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style()),
            )
            .highlight_style(theme.menu_highlight_style());

        frame.render_stateful_widget(menu_list, menu_area, &mut self.list_state);
    }
}
