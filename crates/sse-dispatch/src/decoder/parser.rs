//! SSE (Server-Sent Events) parser
//!
//! Turns raw body chunks into completed events. Chunks may be split anywhere,
//! including inside a line or a multi-byte character.

use tracing::trace;

use super::lines::LineBuffer;
use super::types::{Payload, SseEvent};
use super::utf8::Utf8Decoder;
use crate::config::DecoderConfig;

/// SSE parser state
///
/// One decoder handles exactly one stream. Feed it every chunk in order with
/// [`feed`](Self::feed), then call [`finish`](Self::finish) at end of stream
/// to flush a trailing event that was not followed by a blank line.
#[derive(Debug)]
pub struct SseDecoder {
    config: DecoderConfig,
    /// Incremental text decoder
    text: Utf8Decoder,
    /// Buffer for incomplete lines
    lines: LineBuffer,
    /// Type of the event being accumulated
    event_type: String,
    /// Data lines of the event being accumulated
    data_lines: Vec<String>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDecoder {
    /// Create a new SSE decoder with the default configuration
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a new SSE decoder
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            text: Utf8Decoder::new(config.strip_bom),
            lines: LineBuffer::new(),
            event_type: config.default_event_type.clone(),
            data_lines: Vec::new(),
            config,
        }
    }

    /// Feed bytes into the decoder and extract any complete events
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        let text = self.text.decode(bytes);
        self.lines.push_str(&text);

        let mut events = Vec::new();
        for line in self.lines.take_lines() {
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush the decoder at end of stream
    ///
    /// Unterminated trailing text is handled as one last line, then the
    /// pending event is dispatched even without a closing blank line.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let dropped = self.text.finish();
        if dropped > 0 {
            trace!("Dropped {} bytes of an incomplete character at end of stream", dropped);
        }

        let mut events = Vec::new();
        if let Some(line) = self.lines.take_remainder() {
            events.extend(self.process_line(&line));
        }
        events.extend(self.dispatch_event());
        events
    }

    /// Process a single line (terminator already removed)
    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        // Comment line (keepalive)
        if line.starts_with(':') {
            trace!("SSE keepalive/comment");
            return None;
        }

        // Empty line signals end of event
        if line.is_empty() {
            return self.dispatch_event();
        }

        if let Some(value) = line.strip_prefix("event:") {
            let value = value.trim();
            self.event_type = if value.is_empty() {
                self.config.default_event_type.clone()
            } else {
                value.to_string()
            };
        } else if let Some(value) = line.strip_prefix("data:") {
            // Only the first space after the colon belongs to the framing
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.data_lines.push(value.to_string());
        } else {
            // Unknown field - ignore per SSE spec
            trace!("SSE unknown line: {}", line);
        }

        None
    }

    /// Dispatch the accumulated event, resetting the pending state
    fn dispatch_event(&mut self) -> Option<SseEvent> {
        let event_type = std::mem::replace(
            &mut self.event_type,
            self.config.default_event_type.clone(),
        );

        // If no data, nothing to dispatch
        if self.data_lines.is_empty() {
            trace!("SSE event '{}' has no data, skipping", event_type);
            return None;
        }

        let data = std::mem::take(&mut self.data_lines).join("\n");
        let payload = if self.config.parse_json {
            Payload::parse(data)
        } else {
            Payload::Text(data)
        };

        Some(SseEvent {
            event_type,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn decode_all(input: &[u8]) -> Vec<SseEvent> {
        let mut decoder = SseDecoder::new();
        let mut events = decoder.feed(input);
        events.extend(decoder.finish());
        events
    }

    fn text(s: &str) -> Payload {
        Payload::Text(s.to_string())
    }

    const DOCUMENT: &str = concat!(
        ": stream opened\r\n",
        "event: progress\r\n",
        "data: {\"step\":1,\"label\":\"压缩图片\"}\r\n",
        "\r\n",
        "data: first line\n",
        "data:second line\n",
        "data:  indented\n",
        "\n",
        "event: ping\n",
        "\n",
        "id: 7\n",
        "retry: 1000\n",
        "data: 42\n",
        "\n",
        "event: done\n",
        "data: café ☕ 😀\n",
    );

    fn document_events() -> Vec<SseEvent> {
        vec![
            SseEvent::new("progress", json!({"step": 1, "label": "压缩图片"})),
            SseEvent::new("message", text("first line\nsecond line\n indented")),
            SseEvent::new("message", json!(42)),
            SseEvent::new("done", text("café ☕ 😀")),
        ]
    }

    #[test]
    fn test_parse_simple_event() {
        let events = decode_all(b"data: {\"x\":1}\n\n");
        assert_eq!(events, vec![SseEvent::new("message", json!({"x": 1}))]);
    }

    #[test]
    fn test_parse_text_event() {
        let events = decode_all(b"data: hello\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text("hello"))]);
    }

    #[test]
    fn test_multiline_data_joined() {
        let events = decode_all(b"data: a\ndata: b\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text("a\nb"))]);
    }

    #[test]
    fn test_named_event() {
        let events = decode_all(b"event: ping\ndata: 1\n\n");
        assert_eq!(events, vec![SseEvent::new("ping", json!(1))]);
    }

    #[test]
    fn test_blank_event_name_uses_default() {
        let events = decode_all(b"event:   \ndata: x\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text("x"))]);
    }

    #[test]
    fn test_event_name_trimmed() {
        let events = decode_all(b"event:\t update \ndata: x\n\n");
        assert_eq!(events[0].event_type, "update");
    }

    #[test]
    fn test_only_one_leading_space_stripped() {
        let events = decode_all(b"data:  x\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text(" x"))]);
    }

    #[test]
    fn test_empty_data_line_dispatches_empty_text() {
        let events = decode_all(b"data:\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text(""))]);
    }

    #[test]
    fn test_event_without_data_resets_type() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: ping\n\n").is_empty());

        let events = decoder.feed(b"data: after\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text("after"))]);
    }

    #[test]
    fn test_ignore_comments() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: a\n").is_empty());
        assert!(decoder.feed(b": keepalive\n").is_empty());
        // comment is not a boundary and does not clear the pending type
        let events = decoder.feed(b"data: 1\n:\n\n");
        assert_eq!(events, vec![SseEvent::new("a", json!(1))]);
    }

    #[test]
    fn test_comment_only_stream() {
        assert!(decode_all(b": one\n: two\n\n:three").is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let events = decode_all(b"id: 1\nretry: 10\nfoo\nDATA: no\ndata : no\ndata: yes\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text("yes"))]);
    }

    #[test]
    fn test_trailing_event_flushed_without_blank_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: last").is_empty());
        assert_eq!(decoder.finish(), vec![SseEvent::new("message", text("last"))]);
    }

    #[test]
    fn test_trailing_terminated_line_flushed() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: end\ndata: last\r\n").is_empty());
        assert_eq!(decoder.finish(), vec![SseEvent::new("end", text("last"))]);
    }

    #[test]
    fn test_trailing_cr_only() {
        let mut decoder = SseDecoder::new();
        let mut events = decoder.feed(b"data: a\n\r");
        events.extend(decoder.finish());
        assert_eq!(events, vec![SseEvent::new("message", text("a"))]);
    }

    #[test]
    fn test_finish_on_empty_stream() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_parse_multiple_events() {
        let events = decode_all(DOCUMENT.as_bytes());
        assert_eq!(events, document_events());
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    #[case(7)]
    #[case(16)]
    #[case(64)]
    fn test_chunk_size_does_not_change_events(#[case] size: usize) {
        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for chunk in DOCUMENT.as_bytes().chunks(size) {
            events.extend(decoder.feed(chunk));
        }
        events.extend(decoder.finish());

        assert_eq!(events, document_events());
    }

    #[test]
    fn test_every_two_way_split() {
        let bytes = DOCUMENT.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = SseDecoder::new();
            let (head, tail) = bytes.split_at(split);
            let mut events = decoder.feed(head);
            events.extend(decoder.feed(tail));
            events.extend(decoder.finish());

            assert_eq!(events, document_events(), "split at byte {}", split);
        }
    }

    #[test]
    fn test_split_inside_multibyte_character() {
        let mut decoder = SseDecoder::new();
        // "é" is C3 A9
        assert!(decoder.feed(b"data: caf\xC3").is_empty());
        let events = decoder.feed(b"\xA9\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text("café"))]);
    }

    #[test]
    fn test_split_between_cr_and_lf() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: x\r").is_empty());
        assert!(decoder.feed(b"\n\r").is_empty());
        let events = decoder.feed(b"\n");
        assert_eq!(events, vec![SseEvent::new("message", text("x"))]);
    }

    #[test]
    fn test_character_cut_off_at_end_is_dropped() {
        // "€" is E2 82 AC; the stream ends after two of its bytes
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: x\xE2\x82").is_empty());
        assert_eq!(decoder.finish(), vec![SseEvent::new("message", text("x"))]);
    }

    #[test]
    fn test_large_chunk_with_many_events() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: x\n\n".repeat(100_000).as_bytes());
        assert_eq!(events.len(), 100_000);
        assert!(events.iter().all(|e| e.payload == text("x")));
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_bom_at_stream_start() {
        let events = decode_all("\u{FEFF}data: 1\n\n".as_bytes());
        assert_eq!(events, vec![SseEvent::new("message", json!(1))]);
    }

    #[test]
    fn test_raw_text_config() {
        let mut decoder = SseDecoder::with_config(DecoderConfig::raw_text());
        let events = decoder.feed(b"data: {\"x\":1}\n\n");
        assert_eq!(events, vec![SseEvent::new("message", text("{\"x\":1}"))]);
    }

    #[test]
    fn test_custom_default_event_type() {
        let config = DecoderConfig::default().with_default_event_type("update");
        let mut decoder = SseDecoder::with_config(config);
        let events = decoder.feed(b"data: 1\n\nevent: x\n\ndata: 2\n\n");
        assert_eq!(
            events,
            vec![
                SseEvent::new("update", json!(1)),
                SseEvent::new("update", json!(2)),
            ]
        );
    }
}
