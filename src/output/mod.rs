//! Output formatting for CLI display
//!
//! Node listings and selection results as printed by the `nodeselect` binary.

use crate::select::Outcome;
use crate::store::Node;
use colored::Colorize;

/// Format a node for `list`
///
/// In quiet mode only the id is printed, one per line, for scripting.
#[must_use]
pub fn node_line(node: &Node, quiet: bool) -> String {
    if quiet {
        return node.id.to_string();
    }

    let mut line = format!("  {} {}", node.id.as_str().dimmed(), node.title.bold());
    if !node.aliases.is_empty() {
        line.push_str(&format!(" (aka {})", node.aliases.join(", ")));
    }
    if !node.tags.is_empty() {
        let tags: Vec<String> = node.tags.iter().map(|tag| format!("#{tag}")).collect();
        line.push_str(&format!(" {}", tags.join(" ").cyan()));
    }
    if let Some(location) = node.location() {
        line.push_str(&format!(" {}", location.to_string().green()));
    }
    line
}

/// What `find` prints for an outcome; `None` when the dialog was cancelled
#[must_use]
pub fn outcome_line(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Accepted(item) => Some(item.id.to_string()),
        Outcome::AcceptedMissing(query) => Some(format!("missing: {query}")),
        Outcome::Canceled => None,
    }
}
