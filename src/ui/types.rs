//! Common types for the finder abstraction

use super::traits::FinderOptions;
use std::fmt;

/// Item to display in the fuzzy finder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// Identifies the item in [`FinderResult::selected`]
    pub key: String,
    /// What the user sees
    pub display: String,
    /// Text to search against
    pub searchable: String,
}

impl DisplayItem {
    #[must_use]
    pub fn new(key: impl Into<String>, display: impl Into<String>, searchable: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display: display.into(),
            searchable: searchable.into(),
        }
    }

    /// Build a display item from a raw entry, keyed by the entry itself
    ///
    /// Matched and displayed text are cut from the entry according to the
    /// field options.
    #[must_use]
    pub fn from_entry(entry: String, options: &FinderOptions) -> Self {
        let searchable = options.select_fields(&entry, &options.match_fields);
        let display = options.select_fields(&entry, &options.display_fields);
        Self {
            key: entry,
            display,
            searchable,
        }
    }
}

/// How the finder was left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderExit {
    /// The user confirmed, possibly with nothing matching
    Accept,
    /// The user cancelled
    Abort,
    /// Exactly one item matched the initial query and `select_one` was set
    AutoSelected,
    /// Nothing matched the initial query and `exit_on_empty` was set
    NoInitialMatch,
}

impl fmt::Display for FinderExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accept => "accept",
            Self::Abort => "abort",
            Self::AutoSelected => "auto-selected",
            Self::NoInitialMatch => "no-initial-match",
        };
        f.write_str(name)
    }
}

/// Result from fuzzy finder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderResult {
    /// Selected item keys
    pub selected: Vec<String>,
    /// Query text at exit
    pub query: String,
    pub exit: FinderExit,
    /// The final key pressed, if the exit was triggered by a key
    pub final_key: Option<String>,
}

impl FinderResult {
    /// Create result for a confirmed selection
    #[must_use]
    pub fn accepted(selected: Vec<String>, query: impl Into<String>) -> Self {
        Self {
            selected,
            query: query.into(),
            exit: FinderExit::Accept,
            final_key: None,
        }
    }

    /// Create result for aborted operation
    #[must_use]
    pub fn aborted(query: impl Into<String>) -> Self {
        Self {
            selected: Vec::new(),
            query: query.into(),
            exit: FinderExit::Abort,
            final_key: None,
        }
    }

    /// Create result for an exit decided before any user input
    #[must_use]
    pub fn initial(exit: FinderExit, selected: Vec<String>, query: impl Into<String>) -> Self {
        Self {
            selected,
            query: query.into(),
            exit,
            final_key: None,
        }
    }

    /// Attach the key that ended the finder
    #[must_use]
    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.final_key = key;
        self
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.exit == FinderExit::Abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entry_uses_fields() {
        let options = FinderOptions {
            delimiter: Some('\n'),
            match_fields: vec![2],
            display_fields: vec![3],
            ..FinderOptions::default()
        };
        let item = DisplayItem::from_entry("id\nmatch me\nShown".into(), &options);
        assert_eq!(item.key, "id\nmatch me\nShown");
        assert_eq!(item.searchable, "match me");
        assert_eq!(item.display, "Shown");
    }

    #[test]
    fn test_result_constructors() {
        let result = FinderResult::aborted("q").with_key(Some("esc".into()));
        assert!(result.is_aborted());
        assert_eq!(result.final_key.as_deref(), Some("esc"));

        let result = FinderResult::initial(FinderExit::AutoSelected, vec!["a".into()], "q");
        assert_eq!(result.exit, FinderExit::AutoSelected);
        assert!(!result.is_aborted());
    }
}
