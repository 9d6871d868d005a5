//! Candidate items offered for selection

use crate::codec::ANNOTATION_MARK;
use crate::store::RecordId;

/// A candidate shown in a selection dialog
///
/// Several items may share one `id` (a node and its aliases).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: RecordId,
    /// What the user sees
    pub label: String,
    /// What the query is matched against
    pub value: String,
    /// Secondary text shown after the label
    pub annotation: Option<String>,
}

impl Item {
    #[must_use]
    pub fn new(id: RecordId, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            value: value.into(),
            annotation: None,
        }
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = annotation;
        self
    }

    /// Label and annotation joined as the third entry field, as the finder shows them
    #[must_use]
    pub fn display(&self) -> String {
        join_label(&self.label, self.annotation.as_deref())
    }
}

/// Join a label and its annotation with [`ANNOTATION_MARK`]
///
/// An empty annotation counts as none. Marks inside the annotation become
/// spaces, so the last mark always ends the label; a label holding marks
/// of its own is closed with one even without an annotation.
pub(crate) fn join_label(label: &str, annotation: Option<&str>) -> String {
    let annotation = annotation.filter(|a| !a.is_empty());
    if annotation.is_none() && !label.contains(ANNOTATION_MARK) {
        return label.to_string();
    }
    let mut joined = label.to_string();
    joined.push(ANNOTATION_MARK);
    if let Some(annotation) = annotation {
        joined.push_str(&annotation.replace(ANNOTATION_MARK, " "));
    }
    joined
}

/// Split the text produced by [`join_label`] back into label and annotation
pub(crate) fn split_label(joined: &str) -> (&str, Option<&str>) {
    match joined.rsplit_once(ANNOTATION_MARK) {
        Some((label, "")) => (label, None),
        Some((label, annotation)) => (label, Some(annotation)),
        None => (joined, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str, annotation: Option<&str>) -> Item {
        Item::new(RecordId::new("n").unwrap(), label, "v").with_annotation(annotation.map(str::to_string))
    }

    #[test]
    fn test_empty_annotation_is_not_shown() {
        assert_eq!(item("Rust", Some("")).display(), "Rust");
        assert_eq!(item("Rust", None).display(), "Rust");
        assert_eq!(item("Rust", Some("#lang")).display(), "Rust\u{a0}#lang");
    }

    #[test]
    fn test_display_splits_back_into_label_and_annotation() {
        let cases = [
            ("New\u{a0}York", None),
            ("New\u{a0}York", Some("#city")),
            ("Rust", Some("#lang")),
            ("Rust", None),
            ("", None),
        ];
        for (label, annotation) in cases {
            assert_eq!(split_label(&item(label, annotation).display()), (label, annotation));
        }
    }
}
