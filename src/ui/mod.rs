//! Finder abstraction layer
//!
//! Selection dialogs talk to the fuzzy finder only through
//! [`FuzzyFinder`]. A finder receives either a complete item list or a feed
//! of raw entries ([`FinderInput`]), filters it, and reports the selected
//! keys together with the final query and how it was left
//! ([`FinderExit`]).
//!
//! # Implementations
//!
//! - [`RatatuiFinder`]: interactive terminal finder (ratatui + nucleo)
//! - [`MockFinder`]: scripted finder for tests
//!
//! # Implementing a Custom Finder
//!
//! ```no_run
//! use nodeselect::ui::{FinderConfig, FinderInput, FinderResult, FuzzyFinder, Result};
//!
//! struct FirstItem;
//!
//! impl FuzzyFinder for FirstItem {
//!     fn run(&self, config: FinderConfig) -> Result<FinderResult> {
//!         let selected = match config.input {
//!             FinderInput::Items(items) => items.into_iter().take(1).map(|i| i.key).collect(),
//!             FinderInput::Stream(mut feed) => feed.next_entry().into_iter().collect(),
//!         };
//!         Ok(FinderResult::accepted(selected, config.options.query))
//!     }
//! }
//! ```

mod error;
mod mock;
mod traits;
mod types;

pub mod output;
pub mod ratatui_adapter;

pub use error::{Result, UiError};
pub use mock::{MockAction, MockFinder};
pub use output::{BufferedWriter, MessageLevel, OutputWriter, StdoutWriter};
pub use ratatui_adapter::{RatatuiFinder, Theme};
pub use traits::{EntryFeed, FinderConfig, FinderInput, FinderOptions, FuzzyFinder, PreviewProvider};
pub use types::{DisplayItem, FinderExit, FinderResult};
