// Key buffer - rolling record of recently typed characters

/// Text typed since the last reset, capped from the front.
#[derive(Debug, Default, Clone)]
pub struct KeyBuffer {
    text: String,
    chars: usize,
}

impl KeyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append typed text, then drop the oldest characters beyond `max_chars`.
    pub fn push_str(&mut self, typed: &str, max_chars: usize) {
        self.text.push_str(typed);
        self.chars += typed.chars().count();
        self.trim_front(max_chars);
    }

    /// Remove the last character. No-op when empty.
    pub fn pop(&mut self) {
        if self.text.pop().is_some() {
            self.chars -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.chars = 0;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn trim_front(&mut self, max_chars: usize) {
        if self.chars <= max_chars {
            return;
        }
        let excess = self.chars - max_chars;
        let cut = self
            .text
            .char_indices()
            .nth(excess)
            .map(|(byte_index, _)| byte_index)
            .unwrap_or(self.text.len());
        self.text.drain(..cut);
        self.chars = max_chars;
    }
}

#[cfg(test)]
#[path = "buffer_test.rs"]
mod tests;
