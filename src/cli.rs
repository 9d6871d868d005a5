//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for nodeselect using the `clap` crate.
//!
//! # Commands
//!
//! - **find**: Open the node finder and print the chosen id (default)
//! - **add** / **remove** / **list** / **import**: Manage the node store
//! - **entries**: Write encoded entries for an external `fzf --read0`
//! - **decode**: Turn an entry picked by an external finder back into a node
//!
//! Flags given to `find` override the `[select]` section and `backend` of the
//! configuration file.

use crate::config::Backend;
use crate::select::SelectOptions;
use crate::store::RecordId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

fn parse_record_id(s: &str) -> Result<RecordId, String> {
    RecordId::new(s).map_err(|e| e.to_string())
}

/// Dialog flags of the `find` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FindArgs {
    /// Selection backend (overrides config)
    #[arg(short = 'b', long = "backend", value_enum)]
    pub backend: Option<Backend>,

    /// Initial query
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Prompt shown before the query
    #[arg(short = 'p', long = "prompt")]
    pub prompt: Option<String>,

    /// Accept a single match of the initial query without confirmation
    #[arg(short = 'a', long = "auto-select")]
    pub auto_select: bool,

    /// Print `missing: <query>` when nothing is chosen instead of cancelling
    #[arg(short = 'm', long = "allow-missing")]
    pub allow_missing: bool,

    /// Cancel right away when nothing matches the initial query
    #[arg(long = "cancel-on-no-match")]
    pub cancel_on_no_match: bool,

    /// Only offer these nodes, in this order
    #[arg(short = 'i', long = "include", value_name = "ID", num_args = 1.., value_parser = parse_record_id)]
    pub include: Vec<RecordId>,

    /// Never offer these nodes
    #[arg(short = 'e', long = "exclude", value_name = "ID", num_args = 1.., value_parser = parse_record_id)]
    pub exclude: Vec<RecordId>,

    /// Disable the preview pane
    #[arg(long = "no-preview")]
    pub no_preview: bool,
}

impl FindArgs {
    /// Apply the flags on top of the configured dialog options
    #[must_use]
    pub fn apply(&self, mut options: SelectOptions) -> SelectOptions {
        if let Some(query) = &self.query {
            options.initial_input.clone_from(query);
        }
        if let Some(prompt) = &self.prompt {
            options.prompt.clone_from(prompt);
        }
        options.auto_select |= self.auto_select;
        options.allow_select_missing |= self.allow_missing;
        options.cancel_on_no_initial_matches |= self.cancel_on_no_match;
        if !self.include.is_empty() {
            options.include = Some(self.include.clone());
        }
        if !self.exclude.is_empty() {
            options.exclude = Some(self.exclude.clone());
        }
        options
    }
}

#[derive(Parser, Debug)]
#[command(name = "nodeselect")]
#[command(about = "Pick knowledge-base nodes with a fuzzy finder", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Node database path (overrides config)
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the finder and print the chosen node id
    #[command(visible_alias = "f")]
    Find {
        #[command(flatten)]
        args: FindArgs,
    },

    /// Add or replace a node
    Add {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,

        title: String,

        #[arg(short = 'a', long = "alias", value_name = "ALIAS", num_args = 1..)]
        aliases: Vec<String>,

        #[arg(short = 't', long = "tag", value_name = "TAG", num_args = 1..)]
        tags: Vec<String>,

        /// File the node lives in
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,

        /// 1-based line of the node inside the file
        #[arg(long = "row", default_value_t = 1, requires = "file")]
        row: usize,

        /// 1-based column of the node inside the file
        #[arg(long = "col", default_value_t = 1, requires = "file")]
        col: usize,
    },

    /// Remove a node
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },

    /// List all nodes
    #[command(visible_alias = "ls")]
    List,

    /// Insert nodes from a JSON array
    Import {
        /// JSON file, or `-` for stdin
        path: PathBuf,
    },

    /// Write NUL-terminated entries for `fzf --read0`
    Entries {
        /// Print the matching fzf flags instead of the entries
        #[arg(long = "fzf-args")]
        fzf_args: bool,

        #[command(flatten)]
        args: FindArgs,
    },

    /// Read one entry from stdin and print its node
    Decode,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run; `find` with no flags when none was given
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Find {
            args: FindArgs::default(),
        })
    }
}
