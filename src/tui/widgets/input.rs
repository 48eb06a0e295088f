use crate::models::{Draft, Field};

/// Shown in place of a stored line break
const NEWLINE_GLYPH: char = '↵';

/// Single-line text input with a character cursor. Stored line breaks are
/// kept in the value but cannot be typed.
#[derive(Debug, Clone, Default)]
pub struct Input {
    chars: Vec<char>,
    cursor: usize,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(content: &str) -> Self {
        let chars: Vec<char> = content.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    /// Delete key
    pub fn delete_forward(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Text visible in a box `width` columns wide, and the cursor column in it
    pub fn visible(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let start = self.cursor.saturating_sub(width - 1);
        let text = self
            .chars
            .iter()
            .skip(start)
            .take(width)
            .map(|&c| if c == '\n' { NEWLINE_GLYPH } else { c })
            .collect();
        (text, self.cursor - start)
    }
}

/// The six form inputs, one per appointment field
#[derive(Debug, Clone, Default)]
pub struct FormInputs {
    inputs: [Input; 6],
}

impl FormInputs {
    fn index(field: Field) -> usize {
        Field::ALL.iter().position(|f| *f == field).unwrap_or(0)
    }

    pub fn get(&self, field: Field) -> &Input {
        &self.inputs[Self::index(field)]
    }

    pub fn get_mut(&mut self, field: Field) -> &mut Input {
        &mut self.inputs[Self::index(field)]
    }

    /// Fill every input from a staging record
    pub fn load(&mut self, draft: &Draft) {
        for field in Field::ALL {
            *self.get_mut(field) = Input::from_string(draft.get(field));
        }
    }

    pub fn clear(&mut self) {
        self.inputs.iter_mut().for_each(Input::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_editing_in_the_middle() {
        let mut input = Input::from_string("Rx");
        input.move_cursor_left();
        input.insert_char('e');
        assert_eq!(input.value(), "Rex");
        input.move_cursor_end();
        input.delete_char();
        assert_eq!(input.value(), "Re");
        input.move_cursor_home();
        input.delete_forward();
        assert_eq!(input.value(), "e");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn handles_multibyte_text() {
        let mut input = Input::from_string("Síntomas");
        input.move_cursor_home();
        input.move_cursor_right();
        input.move_cursor_right();
        input.delete_char();
        assert_eq!(input.value(), "Sntomas");
    }

    #[test]
    fn typed_newlines_are_ignored() {
        let mut input = Input::new();
        input.insert_char('\n');
        assert_eq!(input.value(), "");
    }

    #[test]
    fn stored_line_breaks_survive_editing() {
        let mut input = Input::from_string("cough\nsince monday");
        input.insert_char('!');
        assert_eq!(input.value(), "cough\nsince monday!");
        assert_eq!(input.visible(40), ("cough↵since monday!".to_string(), 19));
    }

    #[test]
    fn visible_window_follows_cursor() {
        let input = Input::from_string("abcdefgh");
        assert_eq!(input.visible(4), ("fgh".to_string(), 3));
        let mut input = input;
        input.move_cursor_home();
        assert_eq!(input.visible(4), ("abcd".to_string(), 0));
    }

    #[test]
    fn form_inputs_load_and_clear() {
        let mut inputs = FormInputs::default();
        let mut draft = Draft::default();
        draft.set(Field::Owner, "Ana");
        inputs.load(&draft);
        assert_eq!(inputs.get(Field::Owner).value(), "Ana");
        assert_eq!(inputs.get(Field::Pet).value(), "");
        inputs.clear();
        assert_eq!(inputs.get(Field::Owner).value(), "");
    }
}
