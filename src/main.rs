//! nodeselect CLI application entry point
//!
//! Picks knowledge-base nodes out of a sled database with a fuzzy finder and
//! prints the chosen id.
//!
//! # Usage
//!
//! ```bash
//! # Pick a node (default command)
//! nodeselect
//! nodeselect find rust --auto-select
//!
//! # Accept free text when nothing matches
//! nodeselect find --allow-missing
//!
//! # Manage nodes
//! nodeselect add rust "Rust" --alias rustlang --tag lang --file notes/rust.md --row 3
//! nodeselect import nodes.json
//! nodeselect list
//!
//! # Use an external fzf instead of the built-in finder
//! nodeselect entries | fzf $(nodeselect entries --fzf-args) | nodeselect decode
//! ```
//!
//! # Configuration
//!
//! Settings are read from the user's config directory
//! (`~/.config/nodeselect/config.toml` on Linux). Logging goes to stderr and
//! is controlled with `NODESELECT_LOG` (default `warn`).

use nodeselect::{
    NodeSelectError,
    cli::{Cli, Commands},
    commands,
    config::NodeSelectConfig,
    select::Outcome,
    store::{Node, SledStore},
    ui::{OutputWriter, RatatuiFinder, StdoutWriter},
};
use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, NodeSelectError>;

fn init_logging() {
    let filter = EnvFilter::try_from_env("NODESELECT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run the parsed command; `Ok(false)` means the user cancelled
fn run(cli: &Cli, out: &dyn OutputWriter) -> Result<bool> {
    let config = NodeSelectConfig::load()?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.database.clone());
    tracing::debug!(db = %db_path.display(), "opening node database");
    let db = Arc::new(SledStore::open(&db_path)?);

    match cli.get_command() {
        Commands::Find { args } => {
            let outcome = commands::find(db, &config, &args, Arc::new(RatatuiFinder::new()), out)?;
            return Ok(outcome != Outcome::Canceled);
        }
        Commands::Add {
            id,
            title,
            aliases,
            tags,
            file,
            row,
            col,
        } => {
            let mut node = Node::new(id, title).with_aliases(aliases).with_tags(tags);
            if let Some(file) = file {
                node = node.with_location(file, row, col);
            }
            commands::add(&db, &node, out)?;
        }
        Commands::Remove { id } => commands::remove(&db, &id, out)?,
        Commands::List => commands::list(&db, cli.quiet, out)?,
        Commands::Import { path } => {
            let reader: Box<dyn Read> = if path.as_os_str() == "-" {
                Box::new(io::stdin().lock())
            } else {
                Box::new(File::open(&path)?)
            };
            commands::import(&db, reader, out)?;
        }
        Commands::Entries { fzf_args, args } => {
            commands::entries(db, &config, &args, fzf_args, &mut io::stdout().lock())?;
        }
        Commands::Decode => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            commands::decode(db.as_ref(), &raw, out)?;
        }
    }
    Ok(true)
}

/// Main entry point for the nodeselect application
///
/// Exits with status 1 when the selection was cancelled and 2 on errors.
fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse_args();
    let out = StdoutWriter::new(cli.quiet);

    match run(&cli, &out) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            out.error(&e.to_string());
            ExitCode::from(2)
        }
    }
}
