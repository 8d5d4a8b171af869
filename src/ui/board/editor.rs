use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    None,
    Cancel,
    Submit,
}

/// Single-line text buffer with a cursor, used for the new-task input and
/// for inline edits. The cursor counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    value: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `value` with the cursor after the last char.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LineAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('u') => self.clear(),
                KeyCode::Char('a') => self.cursor = 0,
                KeyCode::Char('e') => self.cursor = self.len(),
                _ => {}
            }
            return LineAction::None;
        }

        match key.code {
            KeyCode::Esc => return LineAction::Cancel,
            KeyCode::Enter => return LineAction::Submit,
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Char(ch) if !ch.is_control() => {
                let idx = self.byte_index(self.cursor);
                self.value.insert(idx, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        LineAction::None
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(editor: &mut LineEditor, text: &str) {
        for ch in text.chars() {
            editor.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "milk");
        editor.handle_key(key(KeyCode::Home));
        type_text(&mut editor, "Buy ");
        assert_eq!(editor.value(), "Buy milk");
        assert_eq!(editor.cursor(), 4);
    }

    #[test]
    fn backspace_and_delete_handle_multibyte_chars() {
        let mut editor = LineEditor::with_value("café!");
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.value(), "café");
        editor.handle_key(key(KeyCode::Left));
        editor.handle_key(key(KeyCode::Delete));
        assert_eq!(editor.value(), "caf");
        editor.handle_key(key(KeyCode::Home));
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.value(), "caf");
    }

    #[test]
    fn ctrl_u_clears_and_ctrl_chars_do_not_type() {
        let mut editor = LineEditor::with_value("draft");
        let action = editor.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(action, LineAction::None);
        assert_eq!(editor.value(), "draft");
        editor.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(editor.is_empty());
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn enter_and_esc_report_actions() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), LineAction::Submit);
        assert_eq!(editor.handle_key(key(KeyCode::Esc)), LineAction::Cancel);
    }
}
