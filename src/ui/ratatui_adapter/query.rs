//! Editable query line for the finder's search bar

/// Query text with a byte-offset cursor
///
/// Starts from the initial query and records whether it was ever edited;
/// the initial-match exits only apply while it is untouched.
#[derive(Debug, Clone, Default)]
pub struct QueryLine {
    text: String,
    cursor: usize,
    touched: bool,
}

impl QueryLine {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        let text = initial.into();
        Self {
            cursor: text.len(),
            text,
            touched: false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor].char_indices().next_back().map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.touched = true;
    }

    /// Remove the character before the cursor; false when there is none
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.prev_boundary();
        self.text.drain(start..self.cursor);
        self.cursor = start;
        self.touched = true;
        true
    }

    /// Remove the character under the cursor; false at the end of the line
    pub fn delete(&mut self) -> bool {
        let end = self.next_boundary();
        if end == self.cursor {
            return false;
        }
        self.text.drain(self.cursor..end);
        self.touched = true;
        true
    }

    /// Remove the word before the cursor, along with trailing spaces
    pub fn delete_word(&mut self) {
        let head = self.text[..self.cursor].trim_end();
        let start = head.rfind(' ').map_or(0, |i| i + 1);
        self.text.drain(start..self.cursor);
        self.cursor = start;
        self.touched = true;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.touched = true;
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn right(&mut self) {
        self.cursor = self.next_boundary();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_marks_touched() {
        let mut query = QueryLine::new("");
        assert!(!query.is_touched());

        "hello".chars().for_each(|c| query.insert(c));
        assert_eq!(query.as_str(), "hello");
        assert_eq!(query.cursor(), 5);
        assert!(query.is_touched());

        assert!(query.backspace());
        query.left();
        query.left();
        query.insert('y');
        assert_eq!(query.as_str(), "heyll");

        query.clear();
        assert_eq!((query.as_str(), query.cursor()), ("", 0));
        assert!(!query.backspace());
        assert!(!query.delete());
    }

    #[test]
    fn test_cursor_moves_leave_initial_untouched() {
        let mut query = QueryLine::new("rust lang");
        assert_eq!(query.cursor(), 9);

        query.left();
        query.right();
        query.right();
        assert_eq!(query.cursor(), 9);
        assert!(!query.is_touched());

        query.delete_word();
        assert_eq!(query.as_str(), "rust ");
        assert!(query.is_touched());
    }

    #[test]
    fn test_multibyte_boundaries() {
        let mut query = QueryLine::new("añb");
        query.left();
        query.left();
        assert_eq!(query.cursor(), 1);
        assert!(query.delete());
        assert_eq!(query.as_str(), "ab");
        query.right();
        query.insert('é');
        assert_eq!(query.into_string(), "abé");
    }
}
