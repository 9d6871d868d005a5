//! Conversion between key strings (`"ctrl-c"`) and crossterm key events

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Parse a key string like `"ctrl-t"` into a `KeyEvent`
///
/// # Examples
/// ```
/// use nodeselect::keybinds::parse_key;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let key = parse_key("ctrl-q").unwrap();
/// assert_eq!(key.code, KeyCode::Char('q'));
/// assert!(key.modifiers.contains(KeyModifiers::CONTROL));
/// ```
#[must_use]
pub fn parse_key(s: &str) -> Option<KeyEvent> {
    // "ctrl--" binds the minus key
    let (prefix, key_part) = match s.strip_suffix("--") {
        Some(prefix) => (prefix, "-"),
        None => match s.rsplit_once('-') {
            Some((prefix, key)) if !key.is_empty() => (prefix, key),
            _ => ("", s),
        },
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in prefix.split('-').filter(|p| !p.is_empty()) {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => return None,
        }
    }

    let code = match key_part.to_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "btab" | "backtab" => KeyCode::BackTab,
        "bspace" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" | "pageup" => KeyCode::PageUp,
        "pgdn" | "pagedown" => KeyCode::PageDown,
        s if s.starts_with('f') && s.len() > 1 => s[1..].parse().ok().map(KeyCode::F)?,
        _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
        _ => return None,
    };

    Some(KeyEvent::new(code, modifiers))
}

/// Convert a key event back to its string form
#[must_use]
pub fn key_to_string(key: &KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Backspace => "bspace".to_string(),
        KeyCode::Delete => "del".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pgup".to_string(),
        KeyCode::PageDown => "pgdn".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "btab".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };

    let mut result = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        result.push_str("ctrl-");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        result.push_str("alt-");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT)
        && !matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab)
    {
        result.push_str("shift-");
    }
    result.push_str(&base);

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let key = parse_key("ctrl-c").unwrap();
        assert_eq!(key.code, KeyCode::Char('c'));
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));

        let key = parse_key("enter").unwrap();
        assert_eq!(key.code, KeyCode::Enter);
        assert_eq!(key.modifiers, KeyModifiers::NONE);

        assert_eq!(parse_key("f1").unwrap().code, KeyCode::F(1));
        assert_eq!(parse_key("ctrl--").unwrap().code, KeyCode::Char('-'));
        assert!(parse_key("hyper-x").is_none());
        assert!(parse_key("nonsense").is_none());
    }

    #[test]
    fn test_round_trip_strings() {
        for s in ["enter", "esc", "ctrl-c", "ctrl-q", "alt-up", "f5"] {
            let key = parse_key(s).unwrap();
            assert_eq!(key_to_string(&key).as_deref(), Some(s));
        }
    }
}
