//! Proportional strip of the disk's slots
//!
//! Besides selection and the context menu, a volume's border columns can be
//! dragged. Releasing the drag reports how far the edge moved in MB, scaled
//! by the columns the volume occupies.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    app::state::AppState,
    disk::{size::format_size, Edge, Partition},
    ui::theme::Theme,
};

use super::Component;

/// What a click on the bar asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarClick {
    Select(Uuid),
    Menu { id: Uuid, position: (u16, u16) },
    /// An edge was dragged; positive `grow_mb` moves it away from the volume
    Resize { id: Uuid, edge: Edge, grow_mb: i64 },
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    area: Rect,
    id: Uuid,
    size_mb: u64,
    is_volume: bool,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    slot: Slot,
    edge: Edge,
    origin: u16,
    column: u16,
}

#[derive(Default)]
pub struct DiskBarComponent {
    slots: Vec<Slot>,
    /// Inside of the bar's border from the last render
    bar: Rect,
    drag: Option<Drag>,
}

impl DiskBarComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a mouse event to a slot; left selects, right opens the menu and
    /// a left drag on a volume's border resizes it
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<BarClick> {
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Drag(MouseButton::Left) => {
                let column = self.clamp_column(column);
                if let Some(drag) = self.drag.as_mut() {
                    drag.column = column;
                }
                return None;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let drag = self.drag.take()?;
                return drag_result(&drag, self.clamp_column(column));
            }
            _ => {}
        }

        let slot = *self.slots.iter().find(|slot| {
            let area = slot.area;
            column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
        })?;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = edge_at(&slot, column).map(|edge| Drag {
                    slot,
                    edge,
                    origin: column,
                    column,
                });
                Some(BarClick::Select(slot.id))
            }
            MouseEventKind::Down(MouseButton::Right) => Some(BarClick::Menu {
                id: slot.id,
                position: (column, row),
            }),
            _ => None,
        }
    }

    /// Screen area of a slot from the last render
    pub fn slot_area(&self, id: Uuid) -> Option<Rect> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| slot.area)
    }

    fn clamp_column(&self, column: u16) -> u16 {
        let last = self.bar.right().saturating_sub(1).max(self.bar.x);
        column.clamp(self.bar.x, last)
    }

    fn slot_lines(partition: &Partition, width: u16) -> Vec<Line<'static>> {
        let fit = |text: String| -> String { text.chars().take(width as usize).collect() };
        let mut lines = vec![Line::from(fit(partition.name.clone()))];
        if !partition.is_unallocated() {
            lines.push(Line::from(fit(partition.kind.short_label().to_string())));
        }
        lines.push(Line::from(fit(format_size(partition.size_mb))));
        if !partition.is_unallocated() && partition.used_mb.is_some() {
            lines.push(Line::from(fit(format!("{}% used", partition.used_percentage()))));
        }
        lines
    }
}

impl Component for DiskBarComponent {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let block = Block::default()
            .title(format!(
                " Disk 0 | Basic | {} ",
                format_size(state.disk.total_size_mb())
            ))
            .borders(Borders::ALL)
            .border_style(theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.slots.clear();
        self.bar = inner;
        let partitions = state.disk.partitions();
        let sizes: Vec<u64> = partitions.iter().map(|p| p.size_mb).collect();
        let widths = slot_widths(&sizes, inner.width);

        let mut x = inner.x;
        for (index, (partition, width)) in partitions.iter().zip(widths).enumerate() {
            if width == 0 {
                continue;
            }
            let slot = Rect::new(x, inner.y, width, inner.height);
            x += width;

            let mut style = theme.partition_style(partition.kind);
            if index == state.ui_state.selected_index {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }

            let paragraph = Paragraph::new(Self::slot_lines(partition, width.saturating_sub(1)))
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::RIGHT).border_style(Style::default()));
            frame.render_widget(paragraph, slot);
            self.slots.push(Slot {
                area: slot,
                id: partition.id,
                size_mb: partition.size_mb,
                is_volume: !partition.is_unallocated(),
            });
        }

        if let Some(drag) = &self.drag {
            let marker = Rect::new(drag.column, inner.y, 1, inner.height);
            let lines: Vec<Line> = (0..inner.height).map(|_| Line::from("┃")).collect();
            frame.render_widget(
                Paragraph::new(lines).style(theme.resize_edge_style()),
                marker.intersection(inner),
            );
        }
    }
}

/// Border column of a volume under `column`; one-column slots resize at
/// their end
fn edge_at(slot: &Slot, column: u16) -> Option<Edge> {
    if !slot.is_volume {
        None
    } else if column == slot.area.right().saturating_sub(1) {
        Some(Edge::End)
    } else if column == slot.area.x {
        Some(Edge::Start)
    } else {
        None
    }
}

/// Convert a finished drag into MB using the dragged slot's own scale
fn drag_result(drag: &Drag, column: u16) -> Option<BarClick> {
    let width = i64::from(drag.slot.area.width.max(1));
    let moved = i64::from(column) - i64::from(drag.origin);
    let moved_mb = moved * drag.slot.size_mb as i64 / width;
    let grow_mb = match drag.edge {
        Edge::End => moved_mb,
        Edge::Start => -moved_mb,
    };
    if grow_mb == 0 {
        return None;
    }

    debug!("Edge {:?} of {} dragged by {} MB", drag.edge, drag.slot.id, grow_mb);
    Some(BarClick::Resize {
        id: drag.slot.id,
        edge: drag.edge,
        grow_mb,
    })
}

/// Split `width` columns proportionally to `sizes`.
///
/// Every non-empty slot gets at least one column while space allows, and the
/// widths always add up to `width`.
pub fn slot_widths(sizes: &[u64], width: u16) -> Vec<u16> {
    let total: u64 = sizes.iter().sum();
    if total == 0 || sizes.is_empty() {
        return vec![0; sizes.len()];
    }

    let mut widths: Vec<u16> = sizes
        .iter()
        .map(|size| {
            let share = (*size as u128 * width as u128 / total as u128) as u16;
            if *size > 0 {
                share.max(1)
            } else {
                0
            }
        })
        .collect();

    // Hand out or take back the rounding difference from the widest slots
    loop {
        let assigned: u16 = widths.iter().sum();
        if assigned == width {
            break;
        }
        let Some(widest) = widths
            .iter()
            .enumerate()
            .max_by_key(|(index, w)| (**w, std::cmp::Reverse(*index)))
            .map(|(index, _)| index)
        else {
            break;
        };
        if assigned < width {
            widths[widest] += width - assigned;
        } else if widths[widest] > 1 {
            widths[widest] -= 1;
        } else {
            break;
        }
    }

    widths
}
