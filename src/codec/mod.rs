//! Item <-> entry codec for text-based finders
//!
//! A fuzzy finder that only understands flat text receives each [`Item`] as
//! an *entry*:
//!
//! ```text
//! id <FIELD> value <FIELD> label [<MARK> annotation]
//! ```
//!
//! # Escaping rules
//!
//! - `FIELD` is the delimiter from [`FinderOptions`], `'\n'` after
//!   [`Formatter::enrich`]. Entries are terminated out of band by NUL
//!   (`--read0` style), so the newline never ends an entry.
//! - `'\n'`, `'\r'` and the delimiter inside any field become a space, which
//!   keeps exactly three fields.
//! - NUL inside any field becomes the two characters `\0`. It is not
//!   unescaped on decode.
//! - `MARK` is U+00A0 (no-break space). Inside an annotation it becomes a
//!   plain space; the decoder splits the third field at the *last* mark, so
//!   labels keep any no-break spaces of their own. A label holding a mark is
//!   always followed by one, with nothing after it when there is no
//!   annotation. An empty annotation is encoded like none.
//!
//! Decoding an entry with fewer than three fields, or with an empty id,
//! yields `None`; query-only and blank entries are expected input.

use crate::item::{Item, join_label, split_label};
use crate::store::RecordId;
use crate::ui::FinderOptions;
use std::io::{self, Write};

/// Field separator installed by [`NodeFormatter::enrich`]
pub const FIELD_DELIMITER: char = '\n';
/// Separates the label from the annotation inside the third field
pub const ANNOTATION_MARK: char = '\u{a0}';
/// Terminates each entry on the wire
pub const ENTRY_TERMINATOR: u8 = 0;

/// Translates items to and from finder entries
pub trait Formatter: Send + Sync {
    /// Declare delimiter and match/display fields on the finder options
    fn enrich(&self, options: &mut FinderOptions);

    /// Encode an item as an entry
    fn to(&self, item: &Item, options: &FinderOptions) -> String;

    /// Recover the record id from an entry, for resolving preview locations
    fn from(&self, entry: &str, options: &FinderOptions) -> Option<String>;

    /// Recover the whole item from an entry
    fn decode(&self, entry: &str, options: &FinderOptions) -> Option<Item>;
}

/// Codec for knowledge-base node items
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFormatter;

impl NodeFormatter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn delimiter(options: &FinderOptions) -> char {
    options.delimiter.unwrap_or(FIELD_DELIMITER)
}

fn escape_field(field: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' | '\r' => out.push(' '),
            c if c == delimiter => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

impl Formatter for NodeFormatter {
    fn enrich(&self, options: &mut FinderOptions) {
        options.delimiter = Some(FIELD_DELIMITER);
        options.read0 = true;
        options.match_fields = vec![2];
        options.display_fields = vec![3];
    }

    fn to(&self, item: &Item, options: &FinderOptions) -> String {
        let delim = delimiter(options);
        let mut entry = escape_field(item.id.as_str(), delim);
        entry.push(delim);
        entry.push_str(&escape_field(&item.value, delim));
        entry.push(delim);
        let annotation = item.annotation.as_deref().map(|a| escape_field(a, delim));
        entry.push_str(&join_label(&escape_field(&item.label, delim), annotation.as_deref()));
        entry
    }

    fn from(&self, entry: &str, options: &FinderOptions) -> Option<String> {
        self.decode(entry, options).map(|item| item.id.into_string())
    }

    fn decode(&self, entry: &str, options: &FinderOptions) -> Option<Item> {
        let entry = entry.trim_end_matches('\0');
        let mut fields = entry.splitn(3, delimiter(options));
        let (Some(id), Some(value), Some(rest)) = (fields.next(), fields.next(), fields.next()) else {
            return None;
        };
        let id = RecordId::new(id).ok()?;
        let (label, annotation) = split_label(rest);
        Some(Item::new(id, label, value).with_annotation(annotation.map(str::to_string)))
    }
}

/// Write entries NUL-terminated, as consumed by `fzf --read0`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_entries<W, I, S>(writer: &mut W, entries: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut count = 0;
    for entry in entries {
        writer.write_all(entry.as_ref().as_bytes())?;
        writer.write_all(&[ENTRY_TERMINATOR])?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> FinderOptions {
        let mut options = FinderOptions::default();
        NodeFormatter.enrich(&mut options);
        options
    }

    fn item(id: &str, label: &str, value: &str) -> Item {
        Item::new(RecordId::new(id).unwrap(), label, value)
    }

    #[test]
    fn test_enrich_sets_fields() {
        let options = options();
        assert_eq!(options.delimiter, Some('\n'));
        assert!(options.read0);
        assert_eq!(options.match_fields, vec![2]);
        assert_eq!(options.display_fields, vec![3]);
    }

    #[test]
    fn test_round_trip() {
        let options = options();
        let original = item("node-1", "Ownership", "ownership borrowing")
            .with_annotation(Some("#rust #memory".into()));

        let entry = NodeFormatter.to(&original, &options);
        assert_eq!(entry, "node-1\nownership borrowing\nOwnership\u{a0}#rust #memory");
        assert_eq!(NodeFormatter.decode(&entry, &options), Some(original));
    }

    #[test]
    fn test_newlines_become_spaces() {
        let options = options();
        let original = item("a\nb", "multi\nline", "x\r\ny");
        let decoded = NodeFormatter.decode(&NodeFormatter.to(&original, &options), &options).unwrap();

        assert_eq!(decoded.id.as_str(), "a b");
        assert_eq!(decoded.value, "x  y");
        assert_eq!(decoded.label, "multi line");
        assert_eq!(decoded.annotation, None);
    }

    #[test]
    fn test_nul_is_escaped() {
        let options = options();
        let entry = NodeFormatter.to(&item("id\0", "lab\0el", "v"), &options);
        assert!(!entry.contains('\0'));
        assert!(entry.starts_with("id\\0\n"));
    }

    #[test]
    fn test_label_keeps_own_mark() {
        let options = options();
        let original = item("n", "New\u{a0}York", "new york").with_annotation(Some("a\u{a0}b".into()));
        let decoded = NodeFormatter.decode(&NodeFormatter.to(&original, &options), &options).unwrap();

        assert_eq!(decoded.label, "New\u{a0}York");
        assert_eq!(decoded.annotation.as_deref(), Some("a b"));
    }

    #[test]
    fn test_label_mark_without_annotation() {
        let options = options();
        let original = item("n", "New\u{a0}York", "new york");
        let entry = NodeFormatter.to(&original, &options);

        assert_eq!(entry, "n\nnew york\nNew\u{a0}York\u{a0}");
        assert_eq!(NodeFormatter.decode(&entry, &options), Some(original));
    }

    #[test]
    fn test_empty_annotation_matches_display() {
        let options = options();
        let original = item("n", "Rust", "rust").with_annotation(Some(String::new()));
        let entry = NodeFormatter.to(&original, &options);

        assert_eq!(entry, "n\nrust\nRust");
        assert_eq!(entry.rsplit('\n').next(), Some(original.display().as_str()));
        assert_eq!(NodeFormatter.decode(&entry, &options).unwrap().annotation, None);
    }

    #[test]
    fn test_empty_label_round_trips() {
        let options = options();
        let original = item("n", "", "v");
        assert_eq!(NodeFormatter.decode(&NodeFormatter.to(&original, &options), &options), Some(original));
    }

    #[test]
    fn test_malformed_entries_decode_to_none() {
        let options = options();
        assert!(NodeFormatter.decode("", &options).is_none());
        assert!(NodeFormatter.decode("just a query", &options).is_none());
        assert!(NodeFormatter.decode("id\nvalue", &options).is_none());
        assert!(NodeFormatter.decode("\nvalue\nlabel", &options).is_none());
    }

    #[test]
    fn test_from_returns_id() {
        let options = options();
        let entry = NodeFormatter.to(&item("node-9", "L", "V"), &options);
        assert_eq!(NodeFormatter.from(&entry, &options).as_deref(), Some("node-9"));
        assert_eq!(NodeFormatter.from(&format!("{entry}\0"), &options).as_deref(), Some("node-9"));
    }

    #[test]
    fn test_write_entries_nul_terminated() {
        let mut out = Vec::new();
        let count = write_entries(&mut out, ["a\nb\nc", "d\ne\nf"]).unwrap();
        assert_eq!(count, 2);
        assert_eq!(out, b"a\nb\nc\0d\ne\nf\0");
    }
}
