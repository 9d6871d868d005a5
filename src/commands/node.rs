//! Node management commands - add, remove, list and import

use crate::{
    NodeSelectError, output,
    store::{Node, RecordId, RecordStore, SledStore},
    ui::OutputWriter,
};
use std::io::Read;

type Result<T> = std::result::Result<T, NodeSelectError>;

/// Insert or replace a node
///
/// # Errors
/// Returns an error if the node cannot be written
pub fn add(db: &SledStore, node: &Node, out: &dyn OutputWriter) -> Result<()> {
    let replaced = db.get_sync(&node.id)?.is_some();
    db.insert(node)?;
    db.flush()?;
    tracing::debug!(id = %node.id, replaced, "node stored");

    if replaced {
        out.success(&format!("Updated node {}", node.id));
    } else {
        out.success(&format!("Added node {}", node.id));
    }
    Ok(())
}

/// Remove a node
///
/// # Errors
/// Returns an error if the store cannot be written
pub fn remove(db: &SledStore, id: &RecordId, out: &dyn OutputWriter) -> Result<()> {
    if db.remove(id)? {
        db.flush()?;
        out.success(&format!("Removed node {id}"));
    } else {
        out.warning(&format!("No node with id {id}"));
    }
    Ok(())
}

/// Print every node
///
/// # Errors
/// Returns an error if the nodes cannot be read
pub fn list(db: &SledStore, quiet: bool, out: &dyn OutputWriter) -> Result<()> {
    let nodes = db.list_all()?;

    if nodes.is_empty() {
        out.info("No nodes found in database.");
        return Ok(());
    }
    out.info("Nodes in database:");
    for node in &nodes {
        out.write(&output::node_line(node, quiet));
    }
    Ok(())
}

/// Insert nodes from a JSON array read from `reader`
///
/// Nothing is written if any node fails to parse.
///
/// # Errors
/// Returns an error if the input is not a JSON array of nodes or the store cannot be written
pub fn import<R: Read>(db: &SledStore, reader: R, out: &dyn OutputWriter) -> Result<usize> {
    let nodes: Vec<Node> = serde_json::from_reader(reader)?;
    for node in &nodes {
        db.insert(node)?;
    }
    db.flush()?;

    out.success(&format!("Imported {} node(s)", nodes.len()));
    Ok(nodes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rid;
    use crate::ui::{BufferedWriter, MessageLevel};
    use tempfile::TempDir;

    fn open() -> (TempDir, SledStore) {
        let dir = TempDir::new().unwrap();
        let db = SledStore::open(dir.path().join("db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_add_then_update() {
        let (_dir, db) = open();
        let out = BufferedWriter::new();

        add(&db, &Node::new(rid("n"), "First"), &out).unwrap();
        add(&db, &Node::new(rid("n"), "Second"), &out).unwrap();

        assert_eq!(db.count(), 1);
        assert_eq!(db.list_all().unwrap()[0].title, "Second");
        assert_eq!(out.of_level(MessageLevel::Success), ["Added node n", "Updated node n"]);
    }

    #[test]
    fn test_remove_missing_warns() {
        let (_dir, db) = open();
        let out = BufferedWriter::new();

        remove(&db, &rid("ghost"), &out).unwrap();
        assert_eq!(out.of_level(MessageLevel::Warning), ["No node with id ghost"]);
    }

    #[test]
    fn test_import_and_list() {
        let (_dir, db) = open();
        let out = BufferedWriter::new();
        let json = r#"[
            {"id": "rust", "title": "Rust", "tags": ["lang"]},
            {"id": "sled", "title": "Sled", "file": "notes/sled.md", "row": 4}
        ]"#;

        assert_eq!(import(&db, json.as_bytes(), &out).unwrap(), 2);
        list(&db, true, &out).unwrap();

        assert_eq!(out.of_level(MessageLevel::Normal), ["rust", "sled"]);
        let sled = &db.list_all().unwrap()[1];
        assert_eq!(sled.location().unwrap().to_string(), "notes/sled.md:4:1");
    }

    #[test]
    fn test_import_rejects_empty_ids() {
        let (_dir, db) = open();
        let out = BufferedWriter::new();

        let result = import(&db, r#"[{"id": "", "title": "Nameless"}]"#.as_bytes(), &out);
        assert!(matches!(result, Err(NodeSelectError::Json(_))));
        assert_eq!(db.count(), 0);
    }
}
