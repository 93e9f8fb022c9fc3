// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Chunk reassembly for raw terminal input. See [`StdinBuffer`].

use super::{ScanOutcome, Utf8ChunkDecoder, scan_sequence};
use crate::{DEBUG_TUI_INPUT_PARSING, DEFAULT_SEQUENCE_TIMEOUT, FlushDeadline, PASTE_END,
            PASTE_START};
use std::time::Duration;
use tokio::time::Instant;

/// One unit produced by [`StdinBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinBufferOutput {
    /// A single char, or one complete (or timed out) escape sequence.
    Sequence(String),
    /// Everything between `ESC[200~` and `ESC[201~`, markers excluded, as received.
    Paste(String),
}

/// A chunk of input, either already decoded text or raw bytes from stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputChunk {
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&str> for InputChunk {
    fn from(it: &str) -> Self { Self::Text(it.to_string()) }
}

impl From<String> for InputChunk {
    fn from(it: String) -> Self { Self::Text(it) }
}

impl From<&[u8]> for InputChunk {
    fn from(it: &[u8]) -> Self { Self::Bytes(it.to_vec()) }
}

impl From<Vec<u8>> for InputChunk {
    fn from(it: Vec<u8>) -> Self { Self::Bytes(it) }
}

impl<const N: usize> From<&[u8; N]> for InputChunk {
    fn from(it: &[u8; N]) -> Self { Self::Bytes(it.to_vec()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum PasteCaptureState {
    #[default]
    Inactive,
    Accumulating(String),
}

/// Turns an arbitrarily chunked input stream into complete terminal sequences.
///
/// ```text
/// ┌────────────────────────────────────────────────────────┐
/// │ pending: [ complete units ... ][ incomplete tail ]     │
/// │           └ emitted now ─────┘  └ held, deadline armed │
/// └────────────────────────────────────────────────────────┘
/// ```
///
/// After every call the pending buffer is either empty or holds a strict prefix of a
/// sequence (`ESC`, `ESC [ 1 ;`, `ESC [ M` plus fewer than 3 chars, an unterminated OSC
/// or DCS, ...). The output is the same no matter how the input was split into chunks.
///
/// When the tail is still incomplete after [`Self::sequence_timeout()`] it is emitted
/// verbatim as one unit. The buffer owns no timer: the owner polls
/// [`next_deadline()`](Self::next_deadline) and calls
/// [`handle_deadline()`](Self::handle_deadline).
///
/// Bracketed paste payloads are captured whole, however many chunks they span, and come
/// out as [`StdinBufferOutput::Paste`]. Nothing inside a paste is emitted as a sequence.
#[derive(Debug)]
pub struct StdinBuffer {
    pending: String,
    decoder: Utf8ChunkDecoder,
    paste: PasteCaptureState,
    deadline: FlushDeadline,
    is_destroyed: bool,
}

impl Default for StdinBuffer {
    fn default() -> Self { Self::new(DEFAULT_SEQUENCE_TIMEOUT) }
}

impl StdinBuffer {
    #[must_use]
    pub fn new(sequence_timeout: Duration) -> Self {
        Self {
            pending: String::new(),
            decoder: Utf8ChunkDecoder::new(),
            paste: PasteCaptureState::Inactive,
            deadline: FlushDeadline::new(sequence_timeout),
            is_destroyed: false,
        }
    }

    #[must_use]
    pub fn sequence_timeout(&self) -> Duration { self.deadline.duration() }

    /// Appends `chunk` and returns every unit that is now complete, in arrival order.
    ///
    /// An empty chunk with nothing pending is passed through as one empty
    /// [`StdinBufferOutput::Sequence`]. After [`destroy()`](Self::destroy) this returns
    /// nothing.
    pub fn process(&mut self, chunk: impl Into<InputChunk>) -> Vec<StdinBufferOutput> {
        if self.is_destroyed {
            return vec![];
        }

        let (text, is_decoded) = match chunk.into() {
            InputChunk::Text(text) => (text, false),
            InputChunk::Bytes(bytes) => (self.decoder.decode(&bytes), true),
        };

        if text.is_empty()
            && self.pending.is_empty()
            && !self.decoder.has_pending()
            && !self.is_pasting()
        {
            return vec![StdinBufferOutput::Sequence(String::new())];
        }

        self.pending.push_str(&text);
        let output = self.drain_complete();
        if !is_decoded {
            self.decoder.set_pasting(self.is_pasting());
        }
        self.update_deadline();
        output
    }

    /// Emits whatever is pending right now, as if the timeout had fired. An open paste
    /// stays open and emits nothing.
    pub fn flush(&mut self) -> Vec<StdinBufferOutput> {
        if self.is_destroyed || self.is_pasting() {
            return vec![];
        }

        self.deadline.disarm();
        let held = self.decoder.flush();
        self.pending.push_str(&held);

        if self.pending.is_empty() {
            return vec![];
        }

        let unit = std::mem::take(&mut self.pending);
        DEBUG_TUI_INPUT_PARSING.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(message = "StdinBuffer flushed partial sequence", unit = ?unit);
        });
        vec![StdinBufferOutput::Sequence(unit)]
    }

    /// When the flush deadline is pending, the instant at which it fires.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> { self.deadline.get() }

    /// Flushes if the deadline has passed at `now`, otherwise does nothing.
    pub fn handle_deadline(&mut self, now: Instant) -> Vec<StdinBufferOutput> {
        if self.deadline.is_due(now) { self.flush() } else { vec![] }
    }

    /// Drops pending input and any open paste without emitting anything.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.decoder.clear();
        self.paste = PasteCaptureState::Inactive;
        self.deadline.disarm();
    }

    /// Clears everything. Later calls are no-ops.
    pub fn destroy(&mut self) {
        self.clear();
        self.is_destroyed = true;
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool { self.is_destroyed }

    /// The incomplete tail that is waiting for more input.
    #[must_use]
    pub fn get_buffer(&self) -> &str { &self.pending }

    #[must_use]
    pub fn is_pasting(&self) -> bool {
        matches!(self.paste, PasteCaptureState::Accumulating(_))
    }

    fn drain_complete(&mut self) -> Vec<StdinBufferOutput> {
        let mut output = vec![];
        let mut pos = 0;

        loop {
            if let PasteCaptureState::Accumulating(payload) = &mut self.paste {
                let rest = &self.pending[pos..];
                if let Some(end_idx) = rest.find(PASTE_END) {
                    payload.push_str(&rest[..end_idx]);
                    pos += end_idx + PASTE_END.len();
                    let payload = std::mem::take(payload);
                    self.paste = PasteCaptureState::Inactive;
                    output.push(StdinBufferOutput::Paste(payload));
                    continue;
                }
                // Keep a possible partial end marker, take everything before it.
                let keep = partial_suffix_len(rest, PASTE_END);
                let take = rest.len() - keep;
                payload.push_str(&rest[..take]);
                pos += take;
                break;
            }

            if pos >= self.pending.len() {
                break;
            }

            match scan_sequence(&self.pending[pos..]) {
                ScanOutcome::Complete(len) => {
                    let unit = &self.pending[pos..pos + len];
                    pos += len;
                    if unit == PASTE_START {
                        self.paste = PasteCaptureState::Accumulating(String::new());
                        continue;
                    }
                    DEBUG_TUI_INPUT_PARSING.then(|| {
                        tracing::debug!(message = "StdinBuffer emitted sequence", unit = ?unit);
                    });
                    output.push(StdinBufferOutput::Sequence(unit.to_string()));
                }
                ScanOutcome::Incomplete => break,
            }
        }

        self.pending.drain(..pos);
        output
    }

    fn update_deadline(&mut self) {
        let has_partial = !self.pending.is_empty() || self.decoder.has_pending();
        if has_partial && !self.is_pasting() {
            self.deadline.arm();
        } else {
            self.deadline.disarm();
        }
    }
}

/// Length of the longest proper suffix of `haystack` that is a prefix of `marker`.
fn partial_suffix_len(haystack: &str, marker: &str) -> usize {
    (1..marker.len())
        .rev()
        .find(|&len| {
            haystack.len() >= len
                && haystack.is_char_boundary(haystack.len() - len)
                && marker.starts_with(&haystack[haystack.len() - len..])
        })
        .unwrap_or(0)
}


#[cfg(test)]
mod tests_sequences {
    use super::{test_fixtures::*, *};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_chars_one_unit_each() {
        let mut buffer = StdinBuffer::default();
        assert_eq!(buffer.process("hé😀"), vec![seq("h"), seq("é"), seq("😀")]);
        assert_eq!(buffer.get_buffer(), "");
        assert!(buffer.next_deadline().is_none());
    }

    #[test]
    fn test_lone_esc_waits_for_flush() {
        let mut buffer = StdinBuffer::default();
        assert_eq!(buffer.process("\x1b"), vec![]);
        assert_eq!(buffer.get_buffer(), "\x1b");
        assert!(buffer.next_deadline().is_some());
        assert_eq!(buffer.flush(), vec![seq("\x1b")]);
        assert_eq!(buffer.get_buffer(), "");
        assert_eq!(buffer.flush(), vec![]);
    }

    #[test]
    fn test_split_csi_is_reassembled() {
        let mut buffer = StdinBuffer::default();
        assert_eq!(buffer.process("\x1b["), vec![]);
        assert_eq!(buffer.process("1;5"), vec![]);
        assert_eq!(buffer.get_buffer(), "\x1b[1;5");
        assert_eq!(buffer.process("Ax"), vec![seq("\x1b[1;5A"), seq("x")]);
        assert!(buffer.next_deadline().is_none());
    }

    #[test]
    fn test_x10_mouse_takes_exactly_three_chars() {
        let mut buffer = StdinBuffer::default();
        assert_eq!(buffer.process("\x1b[M ab"), vec![seq("\x1b[M ab")]);
        assert_eq!(buffer.process("c"), vec![seq("c")]);
        assert_eq!(buffer.get_buffer(), "");

        let mut buffer = StdinBuffer::default();
        assert_eq!(buffer.process("\x1b[M a"), vec![]);
        assert_eq!(buffer.process("bc"), vec![seq("\x1b[M ab"), seq("c")]);
    }

    #[test]
    fn test_x10_mouse_from_raw_bytes() {
        let mut buffer = StdinBuffer::default();
        // Button 0 at column 200 (byte 0xE9 is not valid UTF-8 on its own).
        let output = buffer.process(&[0x1b, b'[', b'M', 0x20, 0xE9, 0x21][..]);
        assert_eq!(output, vec![seq("\x1b[M \u{e9}!")]);
    }

    #[test]
    fn test_empty_chunk_passes_through() {
        let mut buffer = StdinBuffer::default();
        assert_eq!(buffer.process(""), vec![seq("")]);

        buffer.process("\x1b");
        assert_eq!(buffer.process(""), vec![]);
        assert_eq!(buffer.get_buffer(), "\x1b");
    }

    #[test]
    fn test_osc_reply_split_mid_terminator() {
        let mut buffer = StdinBuffer::default();
        assert_eq!(buffer.process("\x1b]11;rgb:0000/0000/0000\x1b"), vec![]);
        assert_eq!(
            buffer.process("\\q"),
            vec![seq("\x1b]11;rgb:0000/0000/0000\x1b\\"), seq("q")]
        );
    }

    #[test]
    fn test_split_multibyte_bytes() {
        let mut buffer = StdinBuffer::default();
        let bytes = "€".as_bytes();
        assert_eq!(buffer.process(&bytes[..1]), vec![]);
        assert!(buffer.next_deadline().is_some());
        assert_eq!(buffer.process(&bytes[1..]), vec![seq("€")]);
        assert!(buffer.next_deadline().is_none());
    }
}

#[cfg(test)]
mod tests_chunk_independence {
    use super::{test_fixtures::*, *};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("abc" ; "plain")]
    #[test_case("\x1b[A\x1b[1;5B\x1bOP\x1b[15~" ; "keys")]
    #[test_case("\x1b[<0;10;5M\x1b[<0;10;5mz" ; "sgr mouse")]
    #[test_case("\x1b[M !!\x1b[M#!!" ; "x10 mouse")]
    #[test_case("\x1b]4;1;rgb:ffff/0000/0000\x07\x1b]10;#ffffff\x1b\\" ; "osc replies")]
    #[test_case("\x1bP>|kitty(0.40.1)\x1b\\\x1b[?62;c" ; "capability replies")]
    #[test_case("a\x1b[200~pasted \x1b[31mred\x1b[0m text\x1b[201~b" ; "paste")]
    #[test_case("\x1ba\x1b\x1b[A日本😀👍🏽" ; "meta and unicode")]
    fn test_char_by_char_equals_whole(input: &str) {
        assert_eq!(feed_char_by_char(input), feed_whole(input));
    }

    #[test]
    fn test_every_split_point_matches() {
        let input = "x\x1b[1;2A\x1b[200~p\x1b[201~\x1b]11;#000000\x07\x1b[<35;1;1M";
        let expected = feed_whole(input);
        for split in 1..input.len() {
            if !input.is_char_boundary(split) {
                continue;
            }
            let mut buffer = StdinBuffer::default();
            let mut output = buffer.process(&input[..split]);
            output.extend(buffer.process(&input[split..]));
            output.extend(buffer.flush());
            assert_eq!(output, expected, "split at {split}");
        }
    }

    #[test]
    fn test_byte_by_byte_equals_whole() {
        let input = "é\x1b[A😀\x1b[M !!";
        let mut buffer = StdinBuffer::default();
        let mut output = vec![];
        for byte in input.as_bytes() {
            output.extend(buffer.process(std::slice::from_ref(byte)));
        }
        assert_eq!(sequences(output), sequences(feed_whole(input)));
    }
}
