//! Incremental UTF-8 text decoding
//!
//! Chunk boundaries may fall inside a multi-byte character. The decoder keeps
//! the incomplete tail of one chunk and completes it with the next.

const REPLACEMENT: char = '\u{FFFD}';
const BOM: char = '\u{FEFF}';

/// Stateful UTF-8 decoder
///
/// Invalid sequences decode to U+FFFD instead of failing.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Bytes of a character that has not fully arrived yet (at most 3)
    pending: Vec<u8>,
    /// Drop a leading byte-order mark
    strip_bom: bool,
    /// Whether any text has been produced yet
    started: bool,
}

impl Utf8Decoder {
    /// Create a decoder
    pub fn new(strip_bom: bool) -> Self {
        Self {
            strip_bom,
            ..Self::default()
        }
    }

    /// Decode the next chunk, holding back an incomplete trailing character
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let joined: Vec<u8>;
        let mut input: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            joined = std::mem::take(&mut self.pending);
            &joined
        };

        let mut text = String::with_capacity(input.len());
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    // Borrowed: the prefix was just validated
                    text.push_str(&String::from_utf8_lossy(valid));

                    match e.error_len() {
                        Some(len) => {
                            text.push(REPLACEMENT);
                            input = &rest[len..];
                        }
                        None => {
                            self.pending.extend_from_slice(rest);
                            break;
                        }
                    }
                }
            }
        }

        self.strip_leading_bom(text)
    }

    /// Reset at end of stream
    ///
    /// Bytes of a character cut off by the end of the stream produce no text;
    /// they are discarded and their count returned.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    fn strip_leading_bom(&mut self, text: String) -> String {
        if self.started || text.is_empty() {
            return text;
        }
        self.started = true;

        match text.strip_prefix(BOM) {
            Some(rest) if self.strip_bom => rest.to_string(),
            _ => text,
        }
    }
}
