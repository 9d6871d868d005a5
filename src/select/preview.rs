//! Node previews for the finder's preview pane

use crate::lines::{Line, RenderError, Segment, render};
use crate::store::{Node, RecordId, RecordStore, StoreError};
use crate::ui::PreviewProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::sync::Arc;

/// Maps a finder key back to the record it was built from
pub type ResolveKey = Arc<dyn Fn(&str) -> Option<RecordId> + Send + Sync>;

/// Preview pane settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub enabled: bool,
    /// Lines of the node's file shown below the header
    pub max_lines: usize,
    /// Highlight file excerpts (needs the `syntax-highlighting` feature)
    pub syntax_highlighting: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_lines: 40,
            syntax_highlighting: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum PreviewError {
    #[error("unknown entry")]
    UnknownKey,

    #[error("node {0} not found")]
    NotFound(RecordId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot read {path}: {source}")]
    Io { path: String, source: io::Error },
}

/// Renders a header and a file excerpt for the node behind a finder key
pub struct NodePreview {
    store: Arc<dyn RecordStore>,
    resolve: ResolveKey,
    settings: PreviewSettings,
}

impl fmt::Debug for NodePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePreview")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl NodePreview {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, resolve: ResolveKey, settings: PreviewSettings) -> Self {
        Self {
            store,
            resolve,
            settings,
        }
    }

    fn lines_for(&self, key: &str) -> Result<Vec<Line>, PreviewError> {
        let id = (self.resolve)(key).ok_or(PreviewError::UnknownKey)?;
        let node = self
            .store
            .get_sync(&id)?
            .ok_or_else(|| PreviewError::NotFound(id.clone()))?;
        node_lines(&node, &self.settings)
    }
}

impl PreviewProvider for NodePreview {
    fn preview(&self, key: &str) -> Result<Vec<Line>, RenderError> {
        render(|| self.lines_for(key))
    }
}

fn separated(items: &[String], prefix: &str, group: &str) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            segments.push(Segment::text(" "));
        }
        segments.push(Segment::highlighted(format!("{prefix}{item}"), group));
    }
    segments
}

fn node_lines(node: &Node, settings: &PreviewSettings) -> Result<Vec<Line>, PreviewError> {
    let mut lines = vec![Line::from(vec![Segment::highlighted(node.title.clone(), "Title")])];

    if !node.aliases.is_empty() {
        lines.push(Line::from(vec![crate::group![
            Segment::highlighted("aka ", "Comment"),
            separated(&node.aliases, "", "Alias"),
        ]]));
    }
    if !node.tags.is_empty() {
        lines.push(Line::from(separated(&node.tags, "#", "Tag")));
    }

    let Some(location) = node.location() else {
        return Ok(lines);
    };
    lines.push(Line::from(vec![Segment::highlighted(location.to_string(), "Location")]));

    if settings.max_lines == 0 {
        return Ok(lines);
    }
    let content = fs::read_to_string(&location.file).map_err(|source| PreviewError::Io {
        path: location.file.display().to_string(),
        source,
    })?;
    lines.push(Line::from(""));

    let extension = location
        .file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    let excerpt = content.lines().skip(location.row.saturating_sub(1)).take(settings.max_lines);
    lines.extend(excerpt.map(|text| excerpt_line(text, &extension, settings)));
    Ok(lines)
}

#[cfg(feature = "syntax-highlighting")]
fn excerpt_line(text: &str, extension: &str, settings: &PreviewSettings) -> Line {
    use crate::lines::LazyLine;
    use std::collections::HashMap;
    use std::sync::{LazyLock, Mutex, PoisonError};

    // One highlight function per extension, so consecutive excerpt rows coalesce
    static HIGHLIGHTERS: LazyLock<Mutex<HashMap<String, crate::lines::HighlightFn>>> =
        LazyLock::new(|| Mutex::new(HashMap::new()));

    if !settings.syntax_highlighting || extension.is_empty() {
        return Line::from(text);
    }
    let f = HIGHLIGHTERS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(extension.to_string())
        .or_insert_with(|| crate::lines::syntax::highlighter(extension))
        .clone();
    Line::Lazy(LazyLine::new(text, f))
}

#[cfg(not(feature = "syntax-highlighting"))]
fn excerpt_line(text: &str, _extension: &str, _settings: &PreviewSettings) -> Line {
    Line::from(text)
}
