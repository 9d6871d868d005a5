//! Output abstraction layer
//!
//! Command handlers report through [`OutputWriter`], so the CLI can print
//! colored messages while tests capture them with [`BufferedWriter`].

use colored::Colorize;
use std::sync::{Mutex, PoisonError};

/// Trait for output operations
///
/// # Examples
///
/// ```no_run
/// use nodeselect::ui::output::{OutputWriter, StdoutWriter};
///
/// let output = StdoutWriter::new(false);
/// output.write("node-1");
/// output.success("Added node-1");
/// output.error("Something went wrong");
/// ```
pub trait OutputWriter: Send + Sync {
    /// Write a normal message (command results, always shown)
    fn write(&self, message: &str);

    fn error(&self, message: &str);

    fn success(&self, message: &str);

    fn warning(&self, message: &str);

    /// Write an info message (dimmed/secondary)
    fn info(&self, message: &str);
}

/// CLI implementation - writes to stdout/stderr
///
/// In quiet mode only results and errors are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutWriter {
    quiet: bool,
}

impl StdoutWriter {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl OutputWriter for StdoutWriter {
    fn write(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", "✓".green(), message);
        }
    }

    fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", "warning:".yellow(), message);
        }
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", message.dimmed());
        }
    }
}

/// Message level for categorizing output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Normal,
    Error,
    Success,
    Warning,
    Info,
}

/// Writer that keeps every message in memory
#[derive(Debug, Default)]
pub struct BufferedWriter {
    messages: Mutex<Vec<(MessageLevel, String)>>,
}

impl BufferedWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages written so far, oldest first
    #[must_use]
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages of one level, oldest first
    #[must_use]
    pub fn of_level(&self, level: MessageLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: MessageLevel, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

impl OutputWriter for BufferedWriter {
    fn write(&self, message: &str) {
        self.push(MessageLevel::Normal, message);
    }

    fn error(&self, message: &str) {
        self.push(MessageLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.push(MessageLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.push(MessageLevel::Warning, message);
    }

    fn info(&self, message: &str) {
        self.push(MessageLevel::Info, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_writer_keeps_order() {
        let writer = BufferedWriter::new();
        writer.write("a");
        writer.error("b");
        writer.write("c");

        assert_eq!(writer.messages().len(), 3);
        assert_eq!(writer.of_level(MessageLevel::Normal), vec!["a", "c"]);
        assert_eq!(writer.of_level(MessageLevel::Error), vec!["b"]);
    }
}
