//! Color theme for the terminal finder
//!
//! Besides the finder chrome, the theme resolves the highlight groups
//! produced by rendered preview lines. Named groups (`Title`, `Tag`, ...)
//! map to theme colors; groups of the form `#rrggbb` are used as a literal
//! foreground color.

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color for the item under the cursor
    pub selection_bg: Color,
    /// Foreground color for the item under the cursor
    pub selection_fg: Color,
    /// Color for matched characters in fuzzy search
    pub match_highlight: Color,
    /// Color for the cursor indicator
    pub cursor: Color,
    pub border: Color,
    /// Color for dimmed/inactive text
    pub dimmed: Color,
    pub title: Color,
    pub alias: Color,
    pub tag: Color,
    pub location: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme (default)
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            match_highlight: Color::Yellow,
            cursor: Color::Cyan,
            border: Color::DarkGray,
            dimmed: Color::DarkGray,
            title: Color::White,
            alias: Color::Cyan,
            tag: Color::Magenta,
            location: Color::Green,
            error: Color::Red,
        }
    }

    /// Style for the item under the cursor
    #[must_use]
    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the cursor indicator (>)
    #[must_use]
    pub fn cursor_style(&self) -> Style {
        Style::default().fg(self.cursor).add_modifier(Modifier::BOLD)
    }

    /// Style for matched characters in fuzzy search
    #[must_use]
    pub fn match_style(&self) -> Style {
        Style::default()
            .fg(self.match_highlight)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    #[must_use]
    pub fn dimmed_style(&self) -> Style {
        Style::default().fg(self.dimmed)
    }

    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Style for a highlight group emitted by rendered lines
    ///
    /// Unknown groups render unstyled.
    #[must_use]
    pub fn group_style(&self, group: &str) -> Style {
        if let Some(color) = parse_hex_color(group) {
            return Style::default().fg(color);
        }
        match group {
            "Title" => Style::default().fg(self.title).add_modifier(Modifier::BOLD),
            "Alias" => Style::default().fg(self.alias),
            "Tag" => Style::default().fg(self.tag),
            "Location" => Style::default().fg(self.location),
            "Comment" | "Annotation" => self.dimmed_style(),
            "Match" => self.match_style(),
            "Error" => self.error_style(),
            _ => Style::default(),
        }
    }
}

fn parse_hex_color(group: &str) -> Option<Color> {
    let hex = group.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
