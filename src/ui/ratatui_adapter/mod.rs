//! Ratatui-based fuzzy finder adapter
//!
//! Implements [`FuzzyFinder`](crate::ui::FuzzyFinder) with ratatui for the
//! interface, crossterm for terminal events and nucleo for matching.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           RatatuiFinder                     │
//! │  (implements FuzzyFinder trait)             │
//! └────────────────────┬────────────────────────┘
//!                      │
//!        ┌─────────────┼─────────────┐
//!        ▼             ▼             ▼
//! ┌────────────┐ ┌───────────┐ ┌───────────┐
//! │   Nucleo   │ │  Ratatui  │ │ Crossterm │
//! │  (matcher) │ │ (widgets) │ │  (events) │
//! └────────────┘ └───────────┘ └───────────┘
//! ```
//!
//! Previews are laid out into a [`LineBuffer`](crate::lines::LineBuffer);
//! lazy highlights run only for the rows scrolled into view.

mod events;
mod finder;
mod query;
mod state;
mod theme;
pub mod widgets;

pub use finder::RatatuiFinder;
pub use query::QueryLine;
pub use state::{AppState, Exit};
pub use theme::Theme;
