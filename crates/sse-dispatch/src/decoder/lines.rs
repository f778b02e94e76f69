//! Line segmentation
//!
//! Splits decoded text on `\n`, dropping one trailing `\r` so that both `\n`
//! and `\r\n` endings are accepted. A lone `\r` is not a terminator.

/// Buffer of decoded text that has not been terminated yet
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: String,
    /// Length of the buffer prefix already known to hold no `\n`
    scanned: usize,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append decoded text
    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Take every complete line, without terminators
    ///
    /// The consumed prefix is removed in one pass, and text that was already
    /// scanned is not searched again.
    pub fn take_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut search_from = self.scanned;

        while let Some(offset) = self.buffer[search_from..].find('\n') {
            let end = search_from + offset;
            let line = &self.buffer[start..end];
            lines.push(line.strip_suffix('\r').unwrap_or(line).to_string());
            start = end + 1;
            search_from = start;
        }

        self.buffer.drain(..start);
        self.scanned = self.buffer.len();
        lines
    }

    /// Take whatever is left as a final line, once the stream has ended
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        self.scanned = 0;
        let mut line = std::mem::take(&mut self.buffer);
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }
}
