//! Find command - open the node finder and report the choice

use crate::{
    NodeSelectError,
    cli::FindArgs,
    config::{Backend, NodeSelectConfig},
    facade::NodeSelect,
    output,
    select::{Outcome, SelectionBackend, SharedFinder},
    store::RecordStore,
    ui::OutputWriter,
};
use std::sync::Arc;

type Result<T> = std::result::Result<T, NodeSelectError>;

/// Dialog for the `find` and `entries` commands: config first, then flags
///
/// # Errors
/// Returns an error if the configured keybindings are invalid
pub fn node_select(store: Arc<dyn RecordStore>, config: &NodeSelectConfig, args: &FindArgs) -> Result<NodeSelect> {
    let mut preview = config.preview.clone();
    preview.enabled &= !args.no_preview;

    Ok(NodeSelect::new(store)
        .with_options(args.apply(config.select.clone()))
        .with_keymap(config.keymap()?)
        .with_preview(preview))
}

/// Execute the find command
///
/// Prints the chosen node id, or `missing: <query>` when missing
/// selections are allowed and nothing was chosen.
///
/// # Errors
/// Returns an error if the options are invalid or the finder fails
pub fn execute(
    store: Arc<dyn RecordStore>,
    config: &NodeSelectConfig,
    args: &FindArgs,
    finder: SharedFinder,
    out: &dyn OutputWriter,
) -> Result<Outcome> {
    let select = node_select(store, config, args)?;
    let backend = args.backend.unwrap_or(config.backend);
    tracing::debug!(?backend, "opening node finder");

    let outcome = match backend {
        Backend::Eager => open(select.eager(finder))?,
        Backend::Streaming => open(select.streaming(finder))?,
    };

    match output::outcome_line(&outcome) {
        Some(line) => out.write(&line),
        None => out.info("Selection cancelled."),
    }
    Ok(outcome)
}

fn open<B: SelectionBackend>(dialog: B) -> Result<Outcome> {
    dialog
        .on_choice(|item| tracing::debug!(id = %item.id, label = %item.label, "node chosen"))
        .on_choice_missing(|query| tracing::debug!(%query, "no node chosen, keeping query"))
        .on_cancel(|| tracing::debug!("node selection cancelled"))
        .open()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rid, sample_store};
    use crate::ui::{BufferedWriter, MessageLevel, MockFinder};

    fn run(args: &FindArgs, finder: MockFinder) -> (Outcome, BufferedWriter) {
        let out = BufferedWriter::new();
        let outcome = execute(sample_store(), &NodeSelectConfig::default(), args, Arc::new(finder), &out).unwrap();
        (outcome, out)
    }

    #[test]
    fn test_prints_chosen_id_with_both_backends() {
        for backend in [Backend::Eager, Backend::Streaming] {
            let args = FindArgs {
                backend: Some(backend),
                query: Some("rustlang".into()),
                ..FindArgs::default()
            };
            let (outcome, out) = run(&args, MockFinder::accept());

            assert!(matches!(outcome, Outcome::Accepted(item) if item.id == rid("rust")));
            assert_eq!(out.of_level(MessageLevel::Normal), ["rust"]);
        }
    }

    #[test]
    fn test_missing_query_is_printed() {
        let args = FindArgs {
            backend: Some(Backend::Eager),
            allow_missing: true,
            ..FindArgs::default()
        };
        let (outcome, out) = run(&args, MockFinder::accept_query("brand new"));

        assert_eq!(outcome, Outcome::AcceptedMissing("brand new".into()));
        assert_eq!(out.of_level(MessageLevel::Normal), ["missing: brand new"]);
    }

    #[test]
    fn test_cancel_prints_nothing() {
        let (outcome, out) = run(&FindArgs::default(), MockFinder::aborted());

        assert_eq!(outcome, Outcome::Canceled);
        assert!(out.of_level(MessageLevel::Normal).is_empty());
        assert_eq!(out.of_level(MessageLevel::Info), ["Selection cancelled."]);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = NodeSelectConfig::default();
        config.select.prompt = "Pick: ".into();
        config.preview.enabled = true;
        let args = FindArgs {
            query: Some("sl".into()),
            no_preview: true,
            ..FindArgs::default()
        };

        let select = node_select(sample_store(), &config, &args).unwrap();
        assert_eq!(select.options().prompt, "Pick: ");
        assert_eq!(select.options().initial_input, "sl");
        assert!(!select.preview().enabled);
    }
}
