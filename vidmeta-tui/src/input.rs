/// Byte-offset caret over a line of text owned elsewhere.
///
/// The text lives in the page so the controller can clear it; the editor only
/// remembers where the caret is and keeps it on a char boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineEditor {
    cursor: usize,
}

impl LineEditor {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pull the caret back inside `text` after it changed underneath us.
    pub fn clamp(&mut self, text: &str) {
        if self.cursor > text.len() {
            self.cursor = text.len();
        }
        while self.cursor > 0 && !text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn left(&mut self, text: &str) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        while self.cursor > 0 && !text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn right(&mut self, text: &str) {
        if self.cursor >= text.len() {
            return;
        }
        self.cursor += 1;
        while self.cursor < text.len() && !text.is_char_boundary(self.cursor) {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self, text: &str) {
        self.cursor = text.len();
    }

    pub fn insert(&mut self, text: &mut String, ch: char) {
        text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Insert pasted text, flattening line breaks into spaces.
    pub fn insert_str(&mut self, text: &mut String, pasted: &str) {
        let flat: String = pasted
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        text.insert_str(self.cursor, &flat);
        self.cursor += flat.len();
    }

    pub fn backspace(&mut self, text: &mut String) {
        if self.cursor == 0 {
            return;
        }
        let mut prev = self.cursor - 1;
        while prev > 0 && !text.is_char_boundary(prev) {
            prev -= 1;
        }
        text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete(&mut self, text: &mut String) {
        if self.cursor >= text.len() {
            return;
        }
        let start = self.cursor;
        let mut end = start + 1;
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        text.drain(start..end);
    }
}
