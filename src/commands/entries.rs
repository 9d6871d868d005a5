//! Entries and decode commands - drive an external `fzf`
//!
//! ```bash
//! nodeselect entries | fzf $(nodeselect entries --fzf-args) | nodeselect decode
//! ```

use crate::{
    NodeSelectError,
    cli::FindArgs,
    codec::{Formatter, NodeFormatter, write_entries},
    config::NodeSelectConfig,
    facade::NodeSelect,
    item::Item,
    select::{BackendKind, SelectionCore},
    store::RecordStore,
    ui::{FinderOptions, OutputWriter},
};
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type Result<T> = std::result::Result<T, NodeSelectError>;

/// Finder options for the entries written by [`execute`]
#[must_use]
pub fn entry_options(select: &NodeSelect) -> FinderOptions {
    let core = SelectionCore::new(select.options().clone(), BackendKind::Streaming);
    let mut options = core.finder_options();
    NodeFormatter.enrich(&mut options);
    options
}

/// Execute the entries command
///
/// Writes one NUL-terminated entry per item as records are fetched, or
/// with `fzf_args` the flags an external `fzf` needs to read them.
///
/// # Errors
/// Returns an error if the options are invalid or writing fails
pub fn execute<W: Write>(
    store: Arc<dyn RecordStore>,
    config: &NodeSelectConfig,
    args: &FindArgs,
    fzf_args: bool,
    writer: &mut W,
) -> Result<usize> {
    let select = super::find::node_select(store, config, args)?;
    select.options().validate()?;
    let options = entry_options(&select);

    if fzf_args {
        writeln!(writer, "{}", options.fzf_args().join(" "))?;
        return Ok(0);
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let count = runtime.block_on(write_stream(&select, &options, writer))?;
    tracing::debug!(count, "entries written");
    Ok(count)
}

async fn write_stream<W: Write>(
    select: &NodeSelect,
    options: &FinderOptions,
    writer: &mut W,
) -> std::io::Result<usize> {
    let cancel = CancellationToken::new();
    let mut stream = select.stream(&cancel);
    let mut count = 0;
    while let Some((item, resume)) = stream.next().await {
        count += write_entries(writer, [NodeFormatter.to(&item, options)])?;
        resume.resume();
    }
    Ok(count)
}

/// Split finder output into the printed query, if any, and the selected item
///
/// An entry spans exactly three lines, so a fourth leading line is the
/// query printed by `--print-query`. Only the one terminator the finder
/// appends is removed; an entry may end in an empty label.
#[must_use]
pub fn decode_selection(raw: &str, options: &FinderOptions) -> (Option<String>, Option<Item>) {
    let raw = raw.strip_suffix('\0').or_else(|| raw.strip_suffix('\n')).unwrap_or(raw);
    if raw.matches('\n').count() >= 3
        && let Some((query, entry)) = raw.split_once('\n')
    {
        return (Some(query.to_string()), NodeFormatter.decode(entry, options));
    }
    match NodeFormatter.decode(raw, options) {
        Some(item) => (None, Some(item)),
        None => (Some(raw.to_string()), None),
    }
}

/// Execute the decode command
///
/// Prints the id of the selected node and, when it has one, its location.
/// When only a query was selected, prints `missing: <query>`.
///
/// # Errors
/// Returns an error if nothing could be decoded or the store cannot be read
pub fn decode(store: &dyn RecordStore, raw: &str, out: &dyn OutputWriter) -> Result<Option<Item>> {
    let (query, item) = decode_selection(raw, &entry_options_default());

    let Some(item) = item else {
        return match query.filter(|q| !q.is_empty()) {
            Some(query) => {
                out.write(&format!("missing: {query}"));
                Ok(None)
            }
            None => Err(NodeSelectError::InvalidInput("no entry on stdin".into())),
        };
    };

    out.write(item.id.as_str());
    match store.get_sync(&item.id)? {
        Some(node) => {
            if let Some(location) = node.location() {
                out.write(&location.to_string());
            }
        }
        None => out.warning(&format!("Node {} is no longer in the database", item.id)),
    }
    Ok(Some(item))
}

fn entry_options_default() -> FinderOptions {
    let mut options = FinderOptions::default();
    NodeFormatter.enrich(&mut options);
    options
}
