//! Volume list and the properties of the selected slot

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{app::state::AppState, disk::size::format_size, ui::theme::Theme};

use super::Component;

const DETAIL_LABEL_WIDTH: usize = 17;

#[derive(Default)]
pub struct DetailsPanelComponent {
    list_state: ListState,
}

impl DetailsPanelComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_volumes(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let items: Vec<ListItem> = state
            .disk
            .partitions()
            .iter()
            .map(|partition| {
                let file_system = partition.file_system.as_deref().unwrap_or("-");
                let usage = if partition.is_unallocated() {
                    String::new()
                } else {
                    format!("{:>3}%", partition.used_percentage())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<12}", partition.name),
                        theme.partition_style(partition.kind),
                    ),
                    Span::raw(format!(
                        " {:<12} {:>10} {:<5} {}",
                        partition.kind.short_label(),
                        format_size(partition.size_mb),
                        file_system,
                        usage
                    )),
                ]))
            })
            .collect();

        self.list_state.select(Some(state.ui_state.selected_index));

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Volumes ")
                    .borders(Borders::ALL)
                    .border_style(theme.border_style()),
            )
            .highlight_style(theme.highlight_style())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let rows = state
            .selected_partition()
            .and_then(|partition| state.disk.details(partition.id))
            .unwrap_or_default();

        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", label, width = DETAIL_LABEL_WIDTH),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(value, theme.text_style()),
                ])
            })
            .collect();

        let details = Paragraph::new(lines).block(
            Block::default()
                .title(" Properties ")
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        frame.render_widget(details, area);
    }
}

impl Component for DetailsPanelComponent {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        self.render_volumes(frame, chunks[0], state, theme);
        self.render_details(frame, chunks[1], state, theme);
    }
}
