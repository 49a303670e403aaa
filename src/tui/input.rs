//! Input field handling for the terminal user interface.

/// A text input field with cursor position, active state, and a slot for
/// the field's current validation error.
///
/// `cursor` is a byte offset into `value`, always kept on a char boundary.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
    pub error: Option<String>,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
            active: false,
            error: None,
        }
    }

    /// Insert a character at the current cursor position.
    /// Any pending validation error on this field is cleared.
    pub fn handle_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.error = None;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.value.remove(self.cursor);
            self.error = None;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
            self.error = None;
        }
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        if let Some(next) = self.value[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Cursor position in characters, for on-screen placement.
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    /// The value with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Whether the field holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// The trimmed value as an optional, `None` when blank.
    pub fn opt(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.trimmed().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_clears_the_field_error() {
        let mut f = InputField::new();
        f.error = Some("Title is required".into());
        f.handle_char('a');
        assert!(f.error.is_none());
        assert_eq!(f.value, "a");
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut f = InputField::new();
        for c in "José".chars() {
            f.handle_char(c);
        }
        f.handle_char('!');
        assert_eq!(f.value, "José!");
        assert_eq!(f.cursor_column(), 5);
        f.move_cursor_left();
        f.move_cursor_left();
        f.handle_delete();
        assert_eq!(f.value, "Jos!");
        f.handle_char('e');
        assert_eq!(f.value, "Jose!");
    }

    #[test]
    fn backspace_removes_whole_multibyte_char() {
        let mut f = InputField::with_value("naïve");
        f.handle_backspace();
        f.handle_backspace();
        f.handle_backspace();
        assert_eq!(f.value, "na");
        assert_eq!(f.cursor_column(), 2);
    }

    #[test]
    fn blank_and_opt() {
        let f = InputField::with_value("   ");
        assert!(f.is_blank());
        assert!(f.opt().is_none());
        let f = InputField::with_value("  hi ");
        assert_eq!(f.opt().as_deref(), Some("hi"));
    }
}
