//! Unified keyboard shortcuts and key mappings
//!
//! Disk-view keys live here so the key map, the status bar help and the
//! context menu hotkeys stay consistent.

use crossterm::event::{KeyCode, KeyEvent};

use super::components::context_menu::MenuAction;

/// Movement along the disk bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationKey {
    Previous,
    Next,
    First,
    Last,
}

impl NavigationKey {
    /// Check if a key event matches this navigation key
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match self {
            NavigationKey::Previous => {
                matches!(key.code, KeyCode::Left | KeyCode::Up | KeyCode::Char('h'))
            }
            NavigationKey::Next => {
                matches!(key.code, KeyCode::Right | KeyCode::Down | KeyCode::Char('l'))
            }
            NavigationKey::First => matches!(key.code, KeyCode::Home),
            NavigationKey::Last => matches!(key.code, KeyCode::End),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationKey::Previous => "←/h",
            NavigationKey::Next => "→/l",
            NavigationKey::First => "Home",
            NavigationKey::Last => "End",
        }
    }

    pub fn all() -> &'static [NavigationKey] {
        &[
            NavigationKey::Previous,
            NavigationKey::Next,
            NavigationKey::First,
            NavigationKey::Last,
        ]
    }
}

/// Disk-view action shortcuts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKey {
    Create,     // c
    Shrink,     // s
    Extend,     // e
    Delete,     // d
    Format,     // f
    Properties, // p / i
    Menu,       // Enter / m
    Reset,      // R
    Quit,       // q
}

impl ActionKey {
    /// Check if a key event matches this action key
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match self {
            ActionKey::Create => matches!(key.code, KeyCode::Char('c')),
            ActionKey::Shrink => matches!(key.code, KeyCode::Char('s')),
            ActionKey::Extend => matches!(key.code, KeyCode::Char('e')),
            ActionKey::Delete => matches!(key.code, KeyCode::Char('d') | KeyCode::Delete),
            ActionKey::Format => matches!(key.code, KeyCode::Char('f')),
            ActionKey::Properties => matches!(key.code, KeyCode::Char('p') | KeyCode::Char('i')),
            ActionKey::Menu => matches!(key.code, KeyCode::Enter | KeyCode::Char('m')),
            ActionKey::Reset => matches!(key.code, KeyCode::Char('R')),
            ActionKey::Quit => matches!(key.code, KeyCode::Char('q')),
        }
    }

    /// Get the key representation as string
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKey::Create => "c",
            ActionKey::Shrink => "s",
            ActionKey::Extend => "e",
            ActionKey::Delete => "d",
            ActionKey::Format => "f",
            ActionKey::Properties => "p",
            ActionKey::Menu => "Enter",
            ActionKey::Reset => "R",
            ActionKey::Quit => "q",
        }
    }

    /// Get the description of what this key does
    pub fn description(&self) -> &'static str {
        match self {
            ActionKey::Create => "Create",
            ActionKey::Shrink => "Shrink",
            ActionKey::Extend => "Extend",
            ActionKey::Delete => "Delete",
            ActionKey::Format => "Format",
            ActionKey::Properties => "Properties",
            ActionKey::Menu => "Menu",
            ActionKey::Reset => "Reset",
            ActionKey::Quit => "Quit",
        }
    }

    /// Action run through the dialog dispatcher, if any
    pub fn menu_action(&self) -> Option<MenuAction> {
        match self {
            ActionKey::Create => Some(MenuAction::CreatePartition),
            ActionKey::Shrink => Some(MenuAction::ShrinkVolume),
            ActionKey::Extend => Some(MenuAction::ExtendVolume),
            ActionKey::Delete => Some(MenuAction::DeleteVolume),
            ActionKey::Format => Some(MenuAction::FormatVolume),
            ActionKey::Properties => Some(MenuAction::Properties),
            ActionKey::Reset => Some(MenuAction::ResetDisk),
            ActionKey::Menu | ActionKey::Quit => None,
        }
    }

    pub fn all() -> &'static [ActionKey] {
        &[
            ActionKey::Create,
            ActionKey::Shrink,
            ActionKey::Extend,
            ActionKey::Delete,
            ActionKey::Format,
            ActionKey::Properties,
            ActionKey::Menu,
            ActionKey::Reset,
            ActionKey::Quit,
        ]
    }
}

/// Unified shortcut manager for consistent key handling
#[derive(Debug, Default)]
pub struct ShortcutManager;

impl ShortcutManager {
    pub fn new() -> Self {
        Self
    }

    /// One-line key help for the status bar
    pub fn help_text(&self) -> String {
        let actions = ActionKey::all()
            .iter()
            .map(|key| format!("{}: {}", key.as_str(), key.description()))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("←→: Select | {}", actions)
    }

    /// Check if a key event is a navigation key
    pub fn is_navigation_key(&self, key: &KeyEvent) -> Option<NavigationKey> {
        NavigationKey::all().iter().copied().find(|nav| nav.matches(key))
    }

    /// Check if a key event is an action key
    pub fn is_action_key(&self, key: &KeyEvent) -> Option<ActionKey> {
        ActionKey::all().iter().copied().find(|action| action.matches(key))
    }
}

/// Standard navigation behavior for the partition list
pub trait NavigationHandler {
    /// Get the current selected index
    fn selected_index(&self) -> usize;

    /// Set the selected index
    fn set_selected_index(&mut self, index: usize);

    /// Get the total number of items
    fn item_count(&self) -> usize;

    /// Handle navigation key; returns whether the selection moved
    fn handle_navigation(&mut self, nav_key: NavigationKey) -> bool {
        let current = self.selected_index();
        let count = self.item_count();

        if count == 0 {
            return false;
        }

        let new_index = match nav_key {
            NavigationKey::Previous => current.saturating_sub(1),
            NavigationKey::Next => (current + 1).min(count - 1),
            NavigationKey::First => 0,
            NavigationKey::Last => count - 1,
        };

        if new_index != current {
            self.set_selected_index(new_index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct List {
        index: usize,
        count: usize,
    }

    impl NavigationHandler for List {
        fn selected_index(&self) -> usize {
            self.index
        }

        fn set_selected_index(&mut self, index: usize) {
            self.index = index;
        }

        fn item_count(&self) -> usize {
            self.count
        }
    }

    #[test]
    fn test_navigation_key_matching() {
        let left = KeyEvent::from(KeyCode::Left);
        let h = KeyEvent::from(KeyCode::Char('h'));

        assert!(NavigationKey::Previous.matches(&left));
        assert!(NavigationKey::Previous.matches(&h));
        assert!(!NavigationKey::Next.matches(&left));
    }

    #[test]
    fn test_action_key_matching() {
        let manager = ShortcutManager::new();

        assert_eq!(
            manager.is_action_key(&KeyEvent::from(KeyCode::Char('R'))),
            Some(ActionKey::Reset)
        );
        assert_eq!(
            manager.is_action_key(&KeyEvent::from(KeyCode::Enter)),
            Some(ActionKey::Menu)
        );
        assert_eq!(manager.is_action_key(&KeyEvent::from(KeyCode::Char('r'))), None);
    }

    #[test]
    fn test_navigation_stops_at_ends() {
        let mut list = List { index: 0, count: 3 };

        assert!(!list.handle_navigation(NavigationKey::Previous));
        assert!(list.handle_navigation(NavigationKey::Last));
        assert_eq!(list.index, 2);
        assert!(!list.handle_navigation(NavigationKey::Next));
    }
}
