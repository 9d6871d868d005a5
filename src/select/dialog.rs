//! Dialog lifecycle and the accept/cancel decision shared by both backends

use super::options::SelectOptions;
use crate::item::Item;
use crate::ui::{FinderExit, FinderOptions};
use std::fmt;

pub type ChoiceHandler = Box<dyn FnOnce(Item) + Send>;
pub type MissingHandler = Box<dyn FnOnce(String) + Send>;
pub type CancelHandler = Box<dyn FnOnce() + Send>;

/// How a selection dialog ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An item was chosen
    Accepted(Item),
    /// Nothing matched and the query was accepted as free text
    AcceptedMissing(String),
    Canceled,
}

/// Lifecycle of one dialog: `Idle -> Open -> {Accepted, AcceptedMissing, Canceled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    Open,
    Accepted,
    AcceptedMissing,
    Canceled,
}

/// Which backend drives the finder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Eager,
    Streaming,
}

/// Handlers, options and state of one selection dialog
pub struct SelectionCore {
    options: SelectOptions,
    backend: BackendKind,
    state: DialogState,
    on_choice: Option<ChoiceHandler>,
    on_choice_missing: Option<MissingHandler>,
    on_cancel: Option<CancelHandler>,
}

impl fmt::Debug for SelectionCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionCore")
            .field("options", &self.options)
            .field("backend", &self.backend)
            .field("state", &self.state)
            .field("on_choice", &self.on_choice.is_some())
            .field("on_choice_missing", &self.on_choice_missing.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

impl SelectionCore {
    #[must_use]
    pub const fn new(options: SelectOptions, backend: BackendKind) -> Self {
        Self {
            options,
            backend,
            state: DialogState::Idle,
            on_choice: None,
            on_choice_missing: None,
            on_cancel: None,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &SelectOptions {
        &self.options
    }

    #[must_use]
    pub const fn state(&self) -> DialogState {
        self.state
    }

    pub fn set_on_choice(&mut self, f: ChoiceHandler) {
        if self.accepts_handlers() {
            self.on_choice = Some(f);
        }
    }

    pub fn set_on_choice_missing(&mut self, f: MissingHandler) {
        if self.accepts_handlers() {
            self.on_choice_missing = Some(f);
        }
    }

    pub fn set_on_cancel(&mut self, f: CancelHandler) {
        if self.accepts_handlers() {
            self.on_cancel = Some(f);
        }
    }

    fn accepts_handlers(&self) -> bool {
        if self.state == DialogState::Idle {
            return true;
        }
        tracing::warn!(state = ?self.state, "handler registered after the dialog was opened, ignoring");
        false
    }

    /// Whether a finder exit on an empty initial match cancels outright
    ///
    /// Only the streaming backend honors `cancel_on_no_initial_matches`.
    #[must_use]
    pub const fn cancels_on_no_initial_match(&self) -> bool {
        matches!(self.backend, BackendKind::Streaming) && self.options.cancel_on_no_initial_matches
    }

    /// Finder options derived from the dialog options
    #[must_use]
    pub fn finder_options(&self) -> FinderOptions {
        FinderOptions {
            select_one: self.options.auto_select,
            exit_on_empty: self.options.auto_select || self.cancels_on_no_initial_match(),
            ..FinderOptions::new(self.options.prompt.clone()).with_query(self.options.initial_input.clone())
        }
    }

    pub fn open(&mut self) {
        self.state = DialogState::Open;
        tracing::debug!(backend = ?self.backend, prompt = %self.options.prompt, "selection dialog opened");
    }

    /// Decide the outcome of a finder run
    ///
    /// `selected` holds the decoded selection, `query` the query at exit.
    #[must_use]
    pub fn decide(&self, exit: FinderExit, selected: Vec<Item>, query: &str) -> Outcome {
        match exit {
            FinderExit::Abort => Outcome::Canceled,
            FinderExit::Accept | FinderExit::AutoSelected => self.accept(selected, query),
            FinderExit::NoInitialMatch => {
                if self.cancels_on_no_initial_match() {
                    Outcome::Canceled
                } else if self.options.auto_select
                    && !self.options.initial_input.is_empty()
                    && query == self.options.initial_input
                {
                    self.accept(Vec::new(), query)
                } else {
                    Outcome::Canceled
                }
            }
        }
    }

    fn accept(&self, selected: Vec<Item>, query: &str) -> Outcome {
        match selected.into_iter().next() {
            Some(item) => Outcome::Accepted(item),
            None if self.options.allow_select_missing && self.on_choice_missing.is_some() => {
                Outcome::AcceptedMissing(query.to_string())
            }
            None => Outcome::Canceled,
        }
    }

    /// Enter the terminal state for `outcome` and run its handler
    pub fn finish(&mut self, outcome: Outcome) -> Outcome {
        tracing::debug!(outcome = ?outcome, "selection dialog closed");
        match &outcome {
            Outcome::Accepted(item) => {
                self.state = DialogState::Accepted;
                if let Some(f) = self.on_choice.take() {
                    f(item.clone());
                }
            }
            Outcome::AcceptedMissing(query) => {
                self.state = DialogState::AcceptedMissing;
                if let Some(f) = self.on_choice_missing.take() {
                    f(query.clone());
                }
            }
            Outcome::Canceled => {
                self.state = DialogState::Canceled;
                if let Some(f) = self.on_cancel.take() {
                    f();
                }
            }
        }
        outcome
    }
}
