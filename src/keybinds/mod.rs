//! Dialog keybindings
//!
//! Only accepting and cancelling are configurable; cursor movement and query
//! editing keys are handled by the finder itself.
//!
//! Defaults: `enter` accepts, `esc`, `ctrl-c` and `ctrl-q` cancel.
//!
//! In the configuration file bindings are given per action, and replace the
//! defaults of that action:
//!
//! ```toml
//! [keybinds]
//! accept = "ctrl-y"
//! cancel = ["esc", "ctrl-g"]
//! ```

mod keys;

pub use keys::{key_to_string, parse_key};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Action a bound key triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    Accept,
    Cancel,
}

/// Keybind definition - single key or multiple alternatives
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeybindDef {
    Single(String),
    Multiple(Vec<String>),
}

impl KeybindDef {
    fn keys(&self) -> Vec<&str> {
        match self {
            Self::Single(key) => vec![key.as_str()],
            Self::Multiple(keys) => keys.iter().map(String::as_str).collect(),
        }
    }
}

impl KeyAction {
    /// Parse an action name as written in the configuration file
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "accept" => Some(Self::Accept),
            "cancel" | "abort" => Some(Self::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error("Invalid key {0:?}")]
    InvalidKey(String),

    #[error("Unknown keybind action {0:?}")]
    UnknownAction(String),
}

/// Default key strings per action
pub const DEFAULT_BINDINGS: &[(&str, KeyAction)] = &[
    ("enter", KeyAction::Accept),
    ("esc", KeyAction::Cancel),
    ("ctrl-c", KeyAction::Cancel),
    ("ctrl-q", KeyAction::Cancel),
];

/// Lookup table from key presses to actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    binds: HashMap<(KeyCode, KeyModifiers), (String, KeyAction)>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self {
            binds: HashMap::new(),
        };
        for (key, action) in DEFAULT_BINDINGS {
            // Defaults are known-good key strings
            let _ = keymap.bind(key, *action);
        }
        keymap
    }
}

impl Keymap {
    /// Defaults with per-action overrides applied
    ///
    /// # Errors
    ///
    /// Returns `KeymapError` for an unknown action name or an unparseable key string.
    pub fn with_overrides(overrides: &HashMap<String, KeybindDef>) -> Result<Self, KeymapError> {
        let mut keymap = Self::default();
        for (name, def) in overrides {
            let action = KeyAction::from_name(name).ok_or_else(|| KeymapError::UnknownAction(name.clone()))?;
            keymap.binds.retain(|_, (_, bound)| *bound != action);
            for key in def.keys() {
                keymap.bind(key, action)?;
            }
        }
        Ok(keymap)
    }

    /// Bind `key` to `action`, replacing any previous binding of that key
    ///
    /// # Errors
    ///
    /// Returns `KeymapError::InvalidKey` if `key` cannot be parsed.
    pub fn bind(&mut self, key: &str, action: KeyAction) -> Result<(), KeymapError> {
        let event = parse_key(key).ok_or_else(|| KeymapError::InvalidKey(key.to_string()))?;
        self.binds.insert((event.code, event.modifiers), (key.to_string(), action));
        Ok(())
    }

    #[must_use]
    pub fn action_for(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.binds.get(&(key.code, key.modifiers)).map(|(_, action)| *action)
    }

    /// Bound key strings, sorted by action then key
    #[must_use]
    pub fn bindings(&self) -> Vec<(String, KeyAction)> {
        let mut bindings: Vec<_> = self.binds.values().cloned().collect();
        bindings.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        bindings
    }
}
