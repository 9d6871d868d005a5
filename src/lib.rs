//! nodeselect - Interactive node selection for a knowledge-base explorer
//!
//! This library lets a user pick one knowledge-base node out of a record
//! store with a fuzzy finder. Items are either built up front (eager) or
//! streamed into the finder one at a time while it is already open, and
//! previews are highlighted lazily, only for the rows on screen.

use thiserror::Error;

pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod facade;
pub mod item;
pub mod keybinds;
pub mod lines;
pub mod output;
pub mod select;
pub mod source;
pub mod store;
pub mod ui;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum NodeSelectError {
    /// Record store error
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
    /// Finder error
    #[error("Finder error: {0}")]
    Ui(#[from] ui::UiError),
    #[error(transparent)]
    Render(#[from] lines::RenderError),
    #[error("Keybinding error: {0}")]
    Keymap(#[from] keybinds::KeymapError),
    #[error("Invalid selection options: {0}")]
    Options(#[from] select::SelectOptionsError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// The finder thread panicked or was cancelled
    #[error("Finder task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Invalid node data: {0}")]
    Json(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
