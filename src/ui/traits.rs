//! Core traits for the finder abstraction

use super::error::Result;
use super::types::{DisplayItem, FinderExit, FinderResult};
use crate::keybinds::Keymap;
use crate::lines::{Line, RenderError};
use std::fmt;
use std::sync::Arc;
use std::task::Poll;

/// Display and matching options understood by every finder
///
/// Field numbers are 1-based, like fzf's `--nth` and `--with-nth`. Empty
/// field lists mean the whole entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderOptions {
    pub prompt: String,
    /// Initial query
    pub query: String,
    /// Field separator inside entries
    pub delimiter: Option<char>,
    /// Entries are NUL-terminated on the wire
    pub read0: bool,
    /// Fields the query is matched against
    pub match_fields: Vec<usize>,
    /// Fields shown to the user
    pub display_fields: Vec<usize>,
    /// Accept immediately if exactly one item matches the initial query
    pub select_one: bool,
    /// Exit immediately if nothing matches the initial query
    pub exit_on_empty: bool,
}

impl FinderOptions {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Join the requested fields of `entry` with spaces
    #[must_use]
    pub fn select_fields(&self, entry: &str, fields: &[usize]) -> String {
        let Some(delimiter) = self.delimiter else {
            return entry.to_string();
        };
        if fields.is_empty() {
            return entry.to_string();
        }
        let parts: Vec<&str> = entry.split(delimiter).collect();
        fields
            .iter()
            .filter_map(|&field| field.checked_sub(1).and_then(|i| parts.get(i)))
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Exit decided once all input has arrived and the query is untouched
    ///
    /// `matched` is the number of items matching the initial query.
    #[must_use]
    pub const fn initial_exit(&self, matched: usize) -> Option<FinderExit> {
        if self.select_one && matched == 1 {
            Some(FinderExit::AutoSelected)
        } else if self.exit_on_empty && matched == 0 {
            Some(FinderExit::NoInitialMatch)
        } else {
            None
        }
    }

    /// The options as command line flags for an external `fzf`
    #[must_use]
    pub fn fzf_args(&self) -> Vec<String> {
        let mut args = vec![format!("--prompt={}", self.prompt)];
        if !self.query.is_empty() {
            args.push(format!("--query={}", self.query));
        }
        if let Some(delimiter) = self.delimiter {
            args.push(format!("--delimiter={}", regex_literal(delimiter)));
        }
        if self.read0 {
            args.push("--read0".to_string());
        }
        if !self.match_fields.is_empty() {
            args.push(format!("--nth={}", join_fields(&self.match_fields)));
        }
        if !self.display_fields.is_empty() {
            args.push(format!("--with-nth={}", join_fields(&self.display_fields)));
        }
        if self.select_one {
            args.push("--select-1".to_string());
        }
        if self.exit_on_empty {
            args.push("--exit-0".to_string());
        }
        args.push("--print-query".to_string());
        args
    }
}

fn regex_literal(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        c if c.is_ascii_punctuation() => format!("\\{c}"),
        c => c.to_string(),
    }
}

fn join_fields(fields: &[usize]) -> String {
    fields.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

/// Push-style source of raw entries for streaming finders
pub trait EntryFeed: Send {
    /// Next entry if one is ready, without blocking
    ///
    /// `Ready(None)` marks the end of the feed.
    fn poll_entry(&mut self) -> Poll<Option<String>>;

    /// Block the calling thread until the next entry or the end of the feed
    ///
    /// Must not be called from inside an async task.
    fn next_entry(&mut self) -> Option<String>;
}

/// What the finder filters
pub enum FinderInput {
    /// A complete list
    Items(Vec<DisplayItem>),
    /// Entries arriving one at a time; keys are the raw entries
    Stream(Box<dyn EntryFeed>),
}

impl fmt::Debug for FinderInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Items(items) => f.debug_tuple("Items").field(&items.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Configuration for one finder run
pub struct FinderConfig {
    pub input: FinderInput,
    pub options: FinderOptions,
    /// Preview content per item key (None = no preview)
    pub preview: Option<Arc<dyn PreviewProvider>>,
    pub keymap: Keymap,
}

impl FinderConfig {
    /// Create a configuration without preview and with the default keymap
    #[must_use]
    pub fn new(input: FinderInput, options: FinderOptions) -> Self {
        Self {
            input,
            options,
            preview: None,
            keymap: Keymap::default(),
        }
    }

    #[must_use]
    pub fn with_preview(mut self, preview: Arc<dyn PreviewProvider>) -> Self {
        self.preview = Some(preview);
        self
    }

    #[must_use]
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }
}

/// Trait for fuzzy finder implementations
///
/// Finders own matching and ranking; callers only see the keys of the
/// selected items, the final query and how the finder was left.
pub trait FuzzyFinder {
    /// Run the fuzzy finder with given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the finder cannot be initialized or
    /// if the operation fails.
    fn run(&self, config: FinderConfig) -> Result<FinderResult>;
}

/// Trait for preview providers
pub trait PreviewProvider: Send + Sync {
    /// Render preview lines for the item with `key`
    ///
    /// # Errors
    ///
    /// Returns a `RenderError` if the preview cannot be produced.
    fn preview(&self, key: &str) -> std::result::Result<Vec<Line>, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_fields() {
        let options = FinderOptions {
            delimiter: Some('|'),
            ..FinderOptions::default()
        };
        assert_eq!(options.select_fields("a|b|c", &[3, 1]), "c a");
        assert_eq!(options.select_fields("a|b", &[3]), "");
        assert_eq!(options.select_fields("a|b", &[]), "a|b");
        assert_eq!(FinderOptions::default().select_fields("a|b", &[2]), "a|b");
    }

    #[test]
    fn test_initial_exit() {
        let options = FinderOptions {
            select_one: true,
            exit_on_empty: true,
            ..FinderOptions::default()
        };
        assert_eq!(options.initial_exit(1), Some(FinderExit::AutoSelected));
        assert_eq!(options.initial_exit(0), Some(FinderExit::NoInitialMatch));
        assert_eq!(options.initial_exit(2), None);
        assert_eq!(FinderOptions::default().initial_exit(0), None);
    }

    #[test]
    fn test_fzf_args() {
        let options = FinderOptions {
            prompt: "Node: ".into(),
            query: "rust".into(),
            delimiter: Some('\n'),
            read0: true,
            match_fields: vec![2],
            display_fields: vec![3],
            select_one: true,
            exit_on_empty: false,
        };
        assert_eq!(
            options.fzf_args(),
            vec![
                "--prompt=Node: ",
                "--query=rust",
                "--delimiter=\\n",
                "--read0",
                "--nth=2",
                "--with-nth=3",
                "--select-1",
                "--print-query",
            ]
        );
    }
}
