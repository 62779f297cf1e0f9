//! Input field handling for the terminal user interface.

/// A text input field with cursor position and active state management.
/// The cursor is a character index, not a byte index.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            active: false,
        }
    }

    /// The field's value with surrounding whitespace removed. Validation works
    /// on this, never the raw value.
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Reset the field to empty.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    /// Move cursor one position to the left.
    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor one position to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut field = InputField::new();
        for c in "abc".chars() {
            field.handle_char(c);
        }
        assert_eq!(field.value, "abc");
        field.move_cursor_left();
        field.handle_backspace();
        assert_eq!(field.value, "ac");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut field = InputField::with_value("café");
        assert_eq!(field.cursor, 4);
        field.handle_char('s');
        assert_eq!(field.value, "cafés");
        field.handle_backspace();
        field.handle_backspace();
        assert_eq!(field.value, "caf");
    }

    #[test]
    fn test_trimmed() {
        let field = InputField::with_value("  Add cameras  ");
        assert_eq!(field.trimmed(), "Add cameras");
        assert_eq!(InputField::new().trimmed(), "");
    }
}
