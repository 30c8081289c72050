//! Dialog view
//!
//! Pure function of the controller's [`ActiveDialog`]: draws the panel and
//! reports where it and its buttons landed so mouse clicks can be routed.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{
    controller::{ActiveDialog, Focus},
    form::FieldState,
    request::{DialogMode, FieldKind},
};
use crate::ui::theme::Theme;

const PANEL_WIDTH: u16 = 56;
const LABEL_WIDTH: usize = 14;

/// Screen areas of the last rendered dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogLayout {
    /// Where the panel settles once the transition ends
    pub full: Rect,
    /// What was drawn this frame
    pub panel: Rect,
    pub buttons: Vec<(Rect, Focus)>,
}

/// Draw `dialog` over `area`. `progress` runs from 0.0 (hidden) to 1.0.
pub fn render_dialog(
    frame: &mut Frame,
    area: Rect,
    dialog: &ActiveDialog,
    progress: f64,
    theme: &Theme,
) -> DialogLayout {
    let width = PANEL_WIDTH.min(area.width.saturating_sub(4)).max(20);
    let inner_width = width.saturating_sub(2).max(1) as usize;

    let mut lines = Vec::new();
    if let Some(description) = dialog.description() {
        lines.push(Line::from(Span::styled(description.to_string(), theme.muted_style())));
        lines.push(Line::default());
    }
    match dialog.mode() {
        DialogMode::Form => {
            for (index, field) in dialog.form().fields().iter().enumerate() {
                let focused = dialog.focus() == Some(Focus::Field(index));
                field_lines(field, focused, theme, &mut lines);
            }
        }
        DialogMode::Properties => {
            for entry in dialog.properties() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", entry.label, width = LABEL_WIDTH),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(entry.value.clone(), theme.text_style()),
                ]));
            }
        }
    }

    let body_height: usize = lines.iter().map(|line| wrapped_height(line, inner_width)).sum();
    // borders + body + spacer + buttons
    let height = (body_height as u16).saturating_add(4).min(area.height);

    let full = centered_rect(width, height, area);
    let panel = scale_rect(full, progress);

    frame.render_widget(Clear, panel);

    let border_style = if progress < 1.0 {
        theme.muted_style()
    } else {
        theme.dialog_border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", dialog.title()))
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(border_style);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[0]);

    let buttons = match dialog.mode() {
        DialogMode::Form => vec![("Cancel", Focus::Cancel), ("Confirm", Focus::Confirm)],
        DialogMode::Properties => vec![("Close", Focus::Close)],
    };
    let buttons = render_buttons(frame, chunks[1], &buttons, dialog.focus(), theme);

    DialogLayout {
        full,
        panel,
        buttons,
    }
}

fn field_lines(field: &FieldState, focused: bool, theme: &Theme, lines: &mut Vec<Line<'static>>) {
    let spec = &field.spec;

    let mut label = vec![Span::styled(
        spec.label.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if spec.required {
        label.push(Span::styled(" *", theme.error_style()));
    }
    lines.push(Line::from(label));

    let marker = if focused { "> " } else { "  " };
    let mut input = vec![Span::styled(marker, theme.focus_marker_style())];

    match &spec.kind {
        FieldKind::Select(options) => {
            let label = options
                .get(field.selected_index())
                .map(|o| o.label.clone())
                .unwrap_or_default();
            let style = if focused {
                theme.highlight_style()
            } else {
                theme.text_style()
            };
            input.push(Span::styled(format!("< {} >", label), style));
        }
        FieldKind::Text | FieldKind::Number => {
            if field.text().is_empty() && !focused {
                let placeholder = spec.placeholder.clone().unwrap_or_default();
                input.push(Span::styled(placeholder, theme.muted_style()));
            } else if focused {
                input.extend(text_with_cursor(field, theme));
            } else {
                input.push(Span::styled(field.text().to_string(), theme.text_style()));
            }
        }
    }
    lines.push(Line::from(input));

    if let Some(error) = field.error() {
        lines.push(Line::from(Span::styled(format!("  {}", error), theme.error_style())));
    } else if let Some(hint) = &spec.hint {
        lines.push(Line::from(Span::styled(format!("  {}", hint), theme.muted_style())));
    }
}

fn text_with_cursor(field: &FieldState, theme: &Theme) -> Vec<Span<'static>> {
    let text = field.text();
    let cursor = field.cursor();
    let before: String = text.chars().take(cursor).collect();
    let at: String = text.chars().nth(cursor).map(String::from).unwrap_or_else(|| " ".into());
    let after: String = text.chars().skip(cursor + 1).collect();

    vec![
        Span::styled(before, theme.text_style()),
        Span::styled(at, theme.text_style().add_modifier(Modifier::REVERSED)),
        Span::styled(after, theme.text_style()),
    ]
}

fn render_buttons(
    frame: &mut Frame,
    row: Rect,
    buttons: &[(&str, Focus)],
    focus: Option<Focus>,
    theme: &Theme,
) -> Vec<(Rect, Focus)> {
    let widths: Vec<u16> = buttons.iter().map(|(label, _)| label.len() as u16 + 4).collect();
    let total = widths.iter().sum::<u16>() + widths.len().saturating_sub(1) as u16;

    let mut x = row.x + row.width.saturating_sub(total);
    let mut areas = Vec::with_capacity(buttons.len());

    for ((label, target), width) in buttons.iter().zip(widths) {
        let area = Rect::new(x, row.y, width.min(row.right().saturating_sub(x)), row.height.min(1));
        let style = if focus == Some(*target) {
            theme.highlight_style()
        } else {
            theme.text_style()
        };
        frame.render_widget(Paragraph::new(format!("[ {} ]", label)).style(style), area);
        areas.push((area, *target));
        x = x.saturating_add(width + 1);
    }

    areas
}

/// Fixed-size rectangle centered in `r`
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

/// Shrink vertically around the center while a transition runs
fn scale_rect(full: Rect, progress: f64) -> Rect {
    if progress >= 1.0 {
        return full;
    }
    let factor = 0.5 + 0.5 * progress.clamp(0.0, 1.0);
    let height = ((full.height as f64 * factor).round() as u16).max(3).min(full.height);
    Rect::new(full.x, full.y + (full.height - height) / 2, full.width, height)
}

fn wrapped_height(line: &Line, width: usize) -> usize {
    let len = line.width();
    if len == 0 {
        1
    } else {
        (len + width - 1) / width
    }
}
