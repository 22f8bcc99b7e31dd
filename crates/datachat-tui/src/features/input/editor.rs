//! Single-line text editor used by the query input and the path prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Editable line with a cursor measured in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    text: String,
    cursor: usize,
}

impl LineEditor {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display width of the text before the cursor.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.byte_index()].width()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Inserts text at the cursor. Newlines become spaces.
    pub fn insert_str(&mut self, text: &str) {
        let cleaned: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect();
        if cleaned.is_empty() {
            return;
        }
        let idx = self.byte_index();
        self.text.insert_str(idx, &cleaned);
        self.cursor += cleaned.chars().count();
    }

    /// Applies an editing key. Returns true if the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                false
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.len();
                false
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                let idx = self.byte_index();
                self.text.insert(idx, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let idx = self.byte_index();
                self.text.remove(idx);
                true
            }
            KeyCode::Delete if self.cursor < self.len() => {
                let idx = self.byte_index();
                self.text.remove(idx);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.len();
                false
            }
            _ => false,
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(editor: &mut LineEditor, text: &str) {
        for c in text.chars() {
            editor.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut editor = LineEditor::default();
        type_str(&mut editor, "héllo");
        assert_eq!(editor.text(), "héllo");
        assert_eq!(editor.cursor(), 5);

        assert!(editor.handle_key(key(KeyCode::Backspace)));
        assert_eq!(editor.text(), "héll");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut editor = LineEditor::default();
        type_str(&mut editor, "ac");
        editor.handle_key(key(KeyCode::Left));
        type_str(&mut editor, "b");
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn test_delete_and_bounds() {
        let mut editor = LineEditor::default();
        assert!(!editor.handle_key(key(KeyCode::Backspace)));
        type_str(&mut editor, "xy");
        editor.handle_key(key(KeyCode::Home));
        assert!(editor.handle_key(key(KeyCode::Delete)));
        assert_eq!(editor.text(), "y");
        editor.handle_key(key(KeyCode::End));
        assert!(!editor.handle_key(key(KeyCode::Delete)));
    }

    #[test]
    fn test_control_chars_do_not_insert() {
        let mut editor = LineEditor::default();
        editor.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut editor = LineEditor::default();
        editor.insert_str("line one\nline two");
        assert_eq!(editor.text(), "line one line two");
        assert_eq!(editor.cursor_column(), 17);
    }
}
