//! Status bar component
//!
//! Shows the latest toast while it is fresh, key help otherwise, and the
//! disk summary on the right.

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

use crate::{
    app::state::{AppState, LifecyclePhase, NotificationLevel},
    disk::size::format_size,
    ui::{components::Component, keyboard::ShortcutManager, theme::Theme},
};

/// Status bar component at the bottom of the screen
pub struct StatusBarComponent {
    toast_duration: Duration,
    shortcuts: ShortcutManager,
}

impl StatusBarComponent {
    pub fn new(toast_duration: Duration) -> Self {
        Self {
            toast_duration,
            shortcuts: ShortcutManager::new(),
        }
    }

    fn get_disk_summary(&self, state: &AppState) -> String {
        format!(
            "Total: {} | Unallocated: {} ",
            format_size(state.disk.total_size_mb()),
            format_size(state.disk.total_unallocated())
        )
    }
}

impl Component for StatusBarComponent {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let sections = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),     // Toast or help
                Constraint::Length(38), // Disk summary
            ])
            .split(area);

        let toast = state.active_notification(Utc::now(), self.toast_duration);
        let message = match (toast, state.app_state.lifecycle) {
            (_, LifecyclePhase::Starting) => Paragraph::new(" Starting...").style(theme.muted_style()),
            (_, LifecyclePhase::Quitting) => {
                Paragraph::new(" Shutting down...").style(theme.muted_style())
            }
            (Some(notification), LifecyclePhase::Running) => {
                let style = match notification.level {
                    NotificationLevel::Success => theme.success_style(),
                    NotificationLevel::Error => theme.error_style(),
                    NotificationLevel::Warning => theme.warning_style(),
                    NotificationLevel::Info => theme.info_style(),
                };
                Paragraph::new(format!(" {}", notification.message)).style(style)
            }
            (None, LifecyclePhase::Running) => {
                Paragraph::new(format!(" {}", self.shortcuts.help_text())).style(theme.muted_style())
            }
        };
        frame.render_widget(message.alignment(Alignment::Left), sections[0]);

        let summary = Paragraph::new(self.get_disk_summary(state))
            .style(theme.text_style())
            .alignment(Alignment::Right);
        frame.render_widget(summary, sections[1]);
    }
}
