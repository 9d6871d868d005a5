//! Selection dialog options

use crate::store::RecordId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default prompt of node selection dialogs
pub const DEFAULT_PROMPT: &str = "Node: ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectOptionsError {
    #[error("Prompt must be a single line: {0:?}")]
    MultilinePrompt(String),

    #[error("Initial input must be a single line: {0:?}")]
    MultilineInput(String),
}

/// Behavior of one selection dialog
///
/// `include` restricts the candidates to the given ids, in that order;
/// `exclude` removes ids and always wins over `include`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    pub prompt: String,
    /// Query the finder starts with
    pub initial_input: String,
    /// Accept a single match of the initial input without confirmation
    pub auto_select: bool,
    /// Report free-text input when nothing matches
    pub allow_select_missing: bool,
    /// Cancel immediately when nothing matches the initial input (streaming only)
    pub cancel_on_no_initial_matches: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<RecordId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<RecordId>>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            initial_input: String::new(),
            auto_select: false,
            allow_select_missing: false,
            cancel_on_no_initial_matches: false,
            include: None,
            exclude: None,
        }
    }
}

impl SelectOptions {
    #[must_use]
    pub fn with_initial_input(mut self, input: impl Into<String>) -> Self {
        self.initial_input = input.into();
        self
    }

    #[must_use]
    pub const fn with_auto_select(mut self, auto_select: bool) -> Self {
        self.auto_select = auto_select;
        self
    }

    #[must_use]
    pub const fn with_allow_select_missing(mut self, allow: bool) -> Self {
        self.allow_select_missing = allow;
        self
    }

    #[must_use]
    pub const fn with_cancel_on_no_initial_matches(mut self, cancel: bool) -> Self {
        self.cancel_on_no_initial_matches = cancel;
        self
    }

    #[must_use]
    pub fn with_include(mut self, ids: Vec<RecordId>) -> Self {
        self.include = Some(ids);
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, ids: Vec<RecordId>) -> Self {
        self.exclude = Some(ids);
        self
    }

    /// Check the options once, before a dialog is built from them
    ///
    /// # Errors
    ///
    /// Returns `SelectOptionsError` if the prompt or the initial input spans
    /// more than one line.
    pub fn validate(&self) -> Result<(), SelectOptionsError> {
        if self.prompt.contains(['\n', '\r', '\0']) {
            return Err(SelectOptionsError::MultilinePrompt(self.prompt.clone()));
        }
        if self.initial_input.contains(['\n', '\r', '\0']) {
            return Err(SelectOptionsError::MultilineInput(self.initial_input.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SelectOptions::default();
        assert_eq!(options.prompt, "Node: ");
        assert!(options.initial_input.is_empty());
        assert!(!options.auto_select);
        assert!(!options.allow_select_missing);
        assert!(!options.cancel_on_no_initial_matches);
        assert!(options.include.is_none());
        assert!(options.exclude.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_multiline() {
        let options = SelectOptions::default().with_initial_input("a\nb");
        assert_eq!(
            options.validate(),
            Err(SelectOptionsError::MultilineInput("a\nb".into()))
        );

        let options = SelectOptions {
            prompt: "two\nlines".into(),
            ..SelectOptions::default()
        };
        assert!(matches!(options.validate(), Err(SelectOptionsError::MultilinePrompt(_))));
    }

    #[test]
    fn test_partial_toml() {
        let options: SelectOptions = toml::from_str("auto_select = true\nexclude = [\"a\"]").unwrap();
        assert!(options.auto_select);
        assert_eq!(options.prompt, DEFAULT_PROMPT);
        assert_eq!(options.exclude, Some(vec![RecordId::new("a").unwrap()]));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(toml::from_str::<SelectOptions>("include = [\"\"]").is_err());
    }
}
