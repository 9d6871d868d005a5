//! Selection dialogs
//!
//! A dialog is built from a [`NodeSelect`](crate::facade::NodeSelect),
//! given handlers, and opened once:
//!
//! ```text
//! NodeSelect ──eager()/streaming()──▶ EagerSelect | StreamingSelect
//!                                        │ on_choice / on_choice_missing / on_cancel
//!                                        ▼
//!                                      open() ──▶ FuzzyFinder::run
//!                                        │
//!                                        ▼
//!                       SelectionCore::decide ──▶ Outcome + handler
//! ```
//!
//! Registering handlers consumes and returns the dialog, and `open` consumes
//! it, so handlers cannot be changed once the finder is running.

mod dialog;
mod eager;
mod options;
mod preview;
mod streaming;

pub use dialog::{BackendKind, DialogState, Outcome, SelectionCore};
pub use eager::EagerSelect;
pub use options::{DEFAULT_PROMPT, SelectOptions, SelectOptionsError};
pub use preview::{NodePreview, PreviewSettings, ResolveKey};
pub use streaming::StreamingSelect;

use crate::NodeSelectError;
use crate::item::Item;
use crate::ui::FuzzyFinder;
use std::sync::Arc;

/// Finder shared between a dialog and the thread it runs on
pub type SharedFinder = Arc<dyn FuzzyFinder + Send + Sync>;

/// Handler registration and opening, common to both backends
pub trait SelectionBackend: Sized {
    /// Called with the chosen item
    #[must_use]
    fn on_choice(self, f: impl FnOnce(Item) + Send + 'static) -> Self;

    /// Called with the query when nothing was chosen and missing selections are allowed
    #[must_use]
    fn on_choice_missing(self, f: impl FnOnce(String) + Send + 'static) -> Self;

    #[must_use]
    fn on_cancel(self, f: impl FnOnce() + Send + 'static) -> Self;

    /// Run the finder and dispatch the outcome to the matching handler
    ///
    /// # Errors
    ///
    /// Returns `NodeSelectError` if the options are invalid or the finder
    /// fails; cancellation is an [`Outcome`], not an error.
    fn open(self) -> Result<Outcome, NodeSelectError>;
}
