use showbox_engine::input::{Key, Modifiers};

/// Single-line text field state owned by the host and edited by typed input.
///
/// Examples create fields through the façade and draw them themselves; the
/// host routes committed text and editing keys to whichever field has focus.
/// Offsets are kept as UTF-8 byte offsets internally and reported as char
/// indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    text: String,
    /// Byte offset of the caret, always on a char boundary.
    caret: usize,
    /// Byte offset of the selection anchor. `caret == anchor` means no selection.
    anchor: usize,
    /// Maximum length in chars. `None` = unlimited.
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn new(text: impl Into<String>, max_chars: Option<usize>) -> Self {
        let mut input = Self { text: String::new(), caret: 0, anchor: 0, max_chars };
        input.set_text(text);
        input
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the contents, truncated to the length limit; the caret moves to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let mut text: String = text.into();
        text.retain(|c| !c.is_control());
        if let Some(max) = self.max_chars
            && let Some((cut, _)) = text.char_indices().nth(max)
        {
            text.truncate(cut);
        }
        self.text = text;
        self.caret = self.text.len();
        self.anchor = self.caret;
    }

    /// Caret position as a char index.
    pub fn caret(&self) -> usize {
        self.text[..self.caret].chars().count()
    }

    /// Anchor position as a char index.
    pub fn anchor(&self) -> usize {
        self.text[..self.anchor].chars().count()
    }

    /// Moves the caret to char index `pos` (clamped). With `select`, the
    /// anchor stays put and the selection grows or shrinks.
    pub fn set_caret(&mut self, pos: usize, select: bool) {
        self.caret = byte_offset(&self.text, pos);
        if !select {
            self.anchor = self.caret;
        }
    }

    /// Returns `(lo, hi)` sorted char range of the selection.
    pub fn selection(&self) -> (usize, usize) {
        let (a, b) = (self.caret(), self.anchor());
        (a.min(b), a.max(b))
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.caret != self.anchor
    }

    // ── caret movement ────────────────────────────────────────────────────

    /// If there is a selection and `shift` is false, collapses to its left edge.
    pub fn move_left(&mut self, shift: bool) {
        if !shift && self.has_selection() {
            let left = self.caret.min(self.anchor);
            self.caret = left;
            self.anchor = left;
        } else {
            self.caret = prev_char(&self.text, self.caret);
            if !shift {
                self.anchor = self.caret;
            }
        }
    }

    pub fn move_right(&mut self, shift: bool) {
        if !shift && self.has_selection() {
            let right = self.caret.max(self.anchor);
            self.caret = right;
            self.anchor = right;
        } else {
            self.caret = next_char(&self.text, self.caret);
            if !shift {
                self.anchor = self.caret;
            }
        }
    }

    pub fn move_word_left(&mut self, shift: bool) {
        self.caret = prev_word(&self.text, self.caret);
        if !shift {
            self.anchor = self.caret;
        }
    }

    pub fn move_word_right(&mut self, shift: bool) {
        self.caret = next_word(&self.text, self.caret);
        if !shift {
            self.anchor = self.caret;
        }
    }

    pub fn move_home(&mut self, shift: bool) {
        self.caret = 0;
        if !shift {
            self.anchor = 0;
        }
    }

    pub fn move_end(&mut self, shift: bool) {
        self.caret = self.text.len();
        if !shift {
            self.anchor = self.caret;
        }
    }

    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.caret = self.text.len();
    }

    // ── editing ───────────────────────────────────────────────────────────

    /// Inserts `s` at the caret, replacing the selection. Control characters
    /// are dropped and the insert is cut short at the length limit.
    /// Returns `true` if the text changed.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let deleted = self.delete_selection();
        let room = match self.max_chars {
            Some(max) => max.saturating_sub(self.text.chars().count()),
            None => usize::MAX,
        };
        let insert: String = s.chars().filter(|c| !c.is_control()).take(room).collect();
        if insert.is_empty() {
            return deleted;
        }
        self.text.insert_str(self.caret, &insert);
        self.caret += insert.len();
        self.anchor = self.caret;
        true
    }

    /// Backspace. Deletes the selection if any.
    pub fn delete_backward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret == 0 {
            return false;
        }
        let prev = prev_char(&self.text, self.caret);
        self.text.drain(prev..self.caret);
        self.caret = prev;
        self.anchor = prev;
        true
    }

    /// Delete key. Deletes the selection if any.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret >= self.text.len() {
            return false;
        }
        let next = next_char(&self.text, self.caret);
        self.text.drain(self.caret..next);
        true
    }

    /// Applies an editing key. Returns `true` if the key was an editing key.
    ///
    /// Enter and Escape are not handled: their meaning belongs to the example
    /// (submit) or the host (drop focus).
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let shift = modifiers.shift;
        let word = modifiers.ctrl || modifiers.alt;
        match key {
            Key::Backspace => {
                self.delete_backward();
            }
            Key::Delete => {
                self.delete_forward();
            }
            Key::ArrowLeft if word => self.move_word_left(shift),
            Key::ArrowLeft => self.move_left(shift),
            Key::ArrowRight if word => self.move_word_right(shift),
            Key::ArrowRight => self.move_right(shift),
            Key::Home => self.move_home(shift),
            Key::End => self.move_end(shift),
            Key::A if modifiers.ctrl || modifiers.meta => self.select_all(),
            _ => return false,
        }
        true
    }

    fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let (lo, hi) = (self.caret.min(self.anchor), self.caret.max(self.anchor));
        self.text.drain(lo..hi);
        self.caret = lo;
        self.anchor = lo;
        true
    }
}

// ── UTF-8 helpers ─────────────────────────────────────────────────────────

/// Byte offset of char index `pos`, clamped to the end of `s`.
fn byte_offset(s: &str, pos: usize) -> usize {
    s.char_indices().nth(pos).map_or(s.len(), |(i, _)| i)
}

fn prev_char(s: &str, from: usize) -> usize {
    if from == 0 {
        return 0;
    }
    let mut i = from - 1;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_char(s: &str, from: usize) -> usize {
    if from >= s.len() {
        return s.len();
    }
    let mut i = from + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Jump backward over whitespace, then over the word before it.
fn prev_word(s: &str, from: usize) -> usize {
    let trimmed = s[..from].trim_end();
    trimmed.trim_end_matches(|c: char| !c.is_whitespace()).len()
}

/// Jump forward over the rest of the word, then over whitespace.
fn next_word(s: &str, from: usize) -> usize {
    let after = &s[from..];
    let after_word = after.trim_start_matches(|c: char| !c.is_whitespace());
    let after_ws = after_word.trim_start();
    from + (after.len() - after_ws.len())
}
