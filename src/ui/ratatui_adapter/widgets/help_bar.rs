//! Help bar widget for displaying keybind hints

use crate::keybinds::{KeyAction, Keymap};
use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// A keybind hint to display in the help bar
#[derive(Debug, Clone)]
pub struct KeyHint {
    /// Key combination (e.g., "enter", "ctrl-c/esc")
    pub key: String,
    /// Action description (e.g., "accept")
    pub action: String,
}

impl KeyHint {
    /// Create a new key hint
    #[must_use]
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Help bar widget that displays keybind hints at the bottom
pub struct HelpBar<'a> {
    /// Hints to display
    hints: &'a [KeyHint],
    /// Theme for styling
    theme: &'a Theme,
}

impl<'a> HelpBar<'a> {
    /// Create a new help bar widget
    #[must_use]
    pub const fn new(hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }

    /// Hints for the bound accept and cancel keys plus navigation
    #[must_use]
    pub fn hints_for(keymap: &Keymap) -> Vec<KeyHint> {
        let mut hints = vec![KeyHint::new("↑/↓", "navigate")];
        for action in [KeyAction::Accept, KeyAction::Cancel] {
            let keys: Vec<String> = keymap
                .bindings()
                .into_iter()
                .filter(|(_, bound)| *bound == action)
                .map(|(key, _)| key)
                .collect();
            if !keys.is_empty() {
                let name = match action {
                    KeyAction::Accept => "accept",
                    KeyAction::Cancel => "cancel",
                };
                hints.push(KeyHint::new(keys.join("/"), name));
            }
        }
        hints
    }
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();

        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", self.theme.dimmed_style()));
            }
            spans.push(Span::styled(hint.key.as_str(), self.theme.cursor_style()));
            spans.push(Span::styled(":", self.theme.dimmed_style()));
            spans.push(Span::raw(hint.action.as_str()));
        }

        let line = Line::from(spans);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_keymap() {
        let hints = HelpBar::hints_for(&Keymap::default());
        assert_eq!(hints.len(), 3);
        assert_eq!(hints[1].key, "enter");
        assert_eq!(hints[1].action, "accept");
        assert_eq!(hints[2].key, "ctrl-c/ctrl-q/esc");
    }
}
