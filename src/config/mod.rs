//! Configuration module for nodeselect
//!
//! Settings live in `config.toml` inside the user's config directory
//! (`~/.config/nodeselect/config.toml` on Linux). A missing file means
//! defaults; command line flags override whatever the file says.
//!
//! ```toml
//! database = "/home/me/.local/share/nodeselect/db"
//! backend = "eager"
//!
//! [select]
//! prompt = "Find: "
//! auto_select = true
//!
//! [keybinds]
//! cancel = ["esc", "ctrl-g"]
//!
//! [preview]
//! max_lines = 20
//! ```

use crate::keybinds::{KeybindDef, Keymap, KeymapError};
use crate::select::{PreviewSettings, SelectOptions};
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "nodeselect";

/// Which selection backend `find` uses
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Build all items before the finder opens
    Eager,
    /// Stream items into the finder while it is open
    #[default]
    Streaming,
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NodeSelectConfig {
    /// Path of the sled database holding the nodes
    pub database: PathBuf,

    pub backend: Backend,

    /// Dialog defaults
    pub select: SelectOptions,

    /// Per-action key overrides, see [`crate::keybinds`]
    pub keybinds: HashMap<String, KeybindDef>,

    pub preview: PreviewSettings,
}

impl Default for NodeSelectConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            backend: Backend::default(),
            select: SelectOptions::default(),
            keybinds: HashMap::new(),
            preview: PreviewSettings::default(),
        }
    }
}

fn default_database() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("db")
}

impl NodeSelectConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration from the user's config file, or defaults if there is none
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config
            .select
            .validate()
            .map_err(|e| ConfigError::Message(format!("Invalid [select] section: {e}")))?;
        Ok(config)
    }

    /// Save configuration to the user's config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Default keymap with the `[keybinds]` overrides applied
    ///
    /// # Errors
    ///
    /// Returns `KeymapError` for unknown actions or unparseable keys.
    pub fn keymap(&self) -> Result<Keymap, KeymapError> {
        Keymap::with_overrides(&self.keybinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinds::{KeyAction, parse_key};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = NodeSelectConfig::default();
        assert!(config.database.ends_with("nodeselect/db"));
        assert_eq!(config.backend, Backend::Streaming);
        assert_eq!(config.select, SelectOptions::default());
        assert!(config.keybinds.is_empty());
        assert!(config.preview.enabled);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = NodeSelectConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, NodeSelectConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "backend = \"eager\"\n\n[select]\nauto_select = true\n\n[keybinds]\naccept = \"ctrl-y\"\n\n[preview]\nmax_lines = 5\n",
        )
        .unwrap();

        let config = NodeSelectConfig::load_from(&path).unwrap();
        assert_eq!(config.backend, Backend::Eager);
        assert!(config.select.auto_select);
        assert_eq!(config.select.prompt, "Node: ");
        assert_eq!(config.preview.max_lines, 5);
        assert!(config.preview.syntax_highlighting);

        let keymap = config.keymap().unwrap();
        assert_eq!(keymap.action_for(&parse_key("ctrl-y").unwrap()), Some(KeyAction::Accept));
        assert_eq!(keymap.action_for(&parse_key("enter").unwrap()), None);
    }

    #[test]
    fn test_multiline_prompt_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[select]\nprompt = \"a\\nb\"\n").unwrap();
        assert!(NodeSelectConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = NodeSelectConfig::default();
        config.backend = Backend::Eager;
        config.database = dir.path().join("db");
        config
            .keybinds
            .insert("cancel".into(), KeybindDef::Multiple(vec!["esc".into(), "ctrl-g".into()]));
        config.save_to(&path).unwrap();

        assert_eq!(NodeSelectConfig::load_from(&path).unwrap(), config);
    }
}
