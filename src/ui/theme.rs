//! Colours for the simulator screen
//!
//! A theme is a [`ColorScheme`] plus the styles the views derive from it.
//! Partition kinds each get their own fill so the disk bar, the volume list
//! and the dialogs agree on what a primary, logical or free slot looks like.

use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

use crate::{disk::PartitionKind, error::AppResult};

/// Names accepted by `[ui] theme`
pub const THEME_NAMES: [&str; 3] = ["default", "dark", "light"];

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ColorScheme,
}

impl Theme {
    /// Theme for a `[ui] theme` value; unknown names get the default
    pub fn load(theme_name: &str) -> AppResult<Self> {
        let colors = match theme_name {
            "default" => ColorScheme::terminal(),
            "dark" => ColorScheme::dark(),
            "light" => ColorScheme::light(),
            other => {
                warn!("Unknown theme \"{}\", using default", other);
                return Ok(Self::default_theme());
            }
        };

        Ok(Self {
            name: theme_name.to_string(),
            colors,
        })
    }

    /// Terminal palette colours, follows the user's terminal scheme
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            colors: ColorScheme::terminal(),
        }
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.colors.border)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.colors.text)
    }

    /// Selected volume row and focused dialog button
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.colors.focus_text)
            .bg(self.colors.focus)
            .add_modifier(Modifier::BOLD)
    }

    /// Context menu cursor
    pub fn menu_highlight_style(&self) -> Style {
        Style::default()
            .bg(self.colors.focus)
            .add_modifier(Modifier::BOLD)
    }

    /// Border of a settled dialog; transitions use the muted style
    pub fn dialog_border_style(&self) -> Style {
        Style::default().fg(self.colors.focus)
    }

    /// `> ` marker in front of the focused field
    pub fn focus_marker_style(&self) -> Style {
        Style::default().fg(self.colors.accent)
    }

    pub fn success_style(&self) -> Style {
        Style::default()
            .fg(self.colors.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(&self) -> Style {
        Style::default()
            .fg(self.colors.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Rule violations, field errors and the required marker
    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.colors.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.colors.info)
    }

    /// Hints, placeholders and disabled menu items
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.colors.muted)
    }

    /// Fill for a slot of the disk bar
    pub fn partition_style(&self, kind: PartitionKind) -> Style {
        let color = match kind {
            PartitionKind::Primary => self.colors.primary_partition,
            PartitionKind::Logical => self.colors.logical_partition,
            PartitionKind::Unallocated => self.colors.unallocated,
        };
        Style::default().fg(Color::Black).bg(color)
    }

    /// Edge being dragged on the disk bar
    pub fn resize_edge_style(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }
}

/// Colours one theme is built from
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub text: Color,
    pub border: Color,
    pub muted: Color,
    /// Background of whatever has focus
    pub focus: Color,
    pub focus_text: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub primary_partition: Color,
    pub logical_partition: Color,
    pub unallocated: Color,
}

impl ColorScheme {
    fn terminal() -> Self {
        Self {
            text: Color::White,
            border: Color::DarkGray,
            muted: Color::DarkGray,
            focus: Color::Blue,
            focus_text: Color::Reset,
            accent: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            primary_partition: Color::Blue,
            logical_partition: Color::Cyan,
            unallocated: Color::DarkGray,
        }
    }

    fn dark() -> Self {
        let cornflower = Color::Rgb(100, 149, 237);
        let turquoise = Color::Rgb(72, 209, 204);
        let dim = Color::Rgb(105, 105, 105);

        Self {
            text: Color::Rgb(220, 220, 220),
            border: dim,
            muted: dim,
            focus: cornflower,
            focus_text: Color::Black,
            accent: Color::Rgb(255, 215, 0),
            success: Color::Rgb(50, 205, 50),
            warning: Color::Rgb(255, 165, 0),
            error: Color::Rgb(220, 20, 60),
            info: Color::Rgb(135, 206, 235),
            primary_partition: cornflower,
            logical_partition: turquoise,
            unallocated: Color::Rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        let blue = Color::Rgb(0, 100, 200);
        let grey = Color::Rgb(120, 120, 120);

        Self {
            text: Color::Black,
            border: grey,
            muted: grey,
            focus: blue,
            focus_text: Color::White,
            accent: Color::Rgb(200, 150, 0),
            success: Color::Rgb(0, 150, 0),
            warning: Color::Rgb(200, 100, 0),
            error: Color::Rgb(200, 0, 0),
            info: blue,
            primary_partition: blue,
            logical_partition: Color::Rgb(0, 150, 150),
            unallocated: Color::Rgb(190, 190, 190),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_loads() {
        for name in THEME_NAMES {
            let theme = Theme::load(name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        let theme = Theme::load("solarized").unwrap();
        assert_eq!(theme.name, "default");
        assert_eq!(theme.colors, Theme::default_theme().colors);
    }

    #[test]
    fn partition_kinds_are_told_apart() {
        let theme = Theme::load("light").unwrap();
        let fills: Vec<Option<Color>> = [
            PartitionKind::Primary,
            PartitionKind::Logical,
            PartitionKind::Unallocated,
        ]
        .into_iter()
        .map(|kind| theme.partition_style(kind).bg)
        .collect();

        assert_ne!(fills[0], fills[1]);
        assert_ne!(fills[1], fills[2]);
    }
}
