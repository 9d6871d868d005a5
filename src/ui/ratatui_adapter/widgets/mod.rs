//! Ratatui widgets for the fuzzy finder TUI

mod help_bar;
mod item_list;
mod preview_pane;
mod search_bar;

pub use help_bar::{HelpBar, KeyHint};
pub use item_list::ItemList;
pub use preview_pane::{PreviewContent, PreviewPane};
pub use search_bar::SearchBar;
