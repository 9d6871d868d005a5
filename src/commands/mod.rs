//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and runs the operation against the node store.

pub mod entries;
pub mod find;
pub mod node;

// Re-export execute functions for convenience
pub use entries::{decode, execute as entries};
pub use find::execute as find;
pub use node::{add, import, list, remove};
