// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Streaming scanner for OSC color replies mixed in with any other input.

use super::parse_color_value;
use crate::{DEBUG_TUI_INPUT_PARSING, Utf8ChunkDecoder};
use regex::Regex;
use std::sync::LazyLock;

/// Once the unparsed text grows past this, old text is dropped.
pub const OSC_BUFFER_MAX_LEN: usize = 8 * 1024;

/// How much of the most recent text is kept when [`OSC_BUFFER_MAX_LEN`] is exceeded.
pub const OSC_BUFFER_KEEP_LEN: usize = 4 * 1024;

/// `ESC ] 4 ; <index> ; <color> (BEL|ST)` or `ESC ] 1<digit> ; <color> (BEL|ST)`.
static OSC_COLOR_REPLY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\x1b\](?:4;(?P<index>\d{1,3})|(?P<code>1[0-9]));(?P<color>[^\x07\x1b]*)(?:\x07|\x1b\\)",
    )
    .expect("Invalid OSC color reply regex")
});

/// One color reply, with the color already normalized to `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscColorReply {
    /// OSC 4, a palette slot.
    Palette { index: u8, color: String },
    /// OSC 10 to 19.
    Special { code: u8, color: String },
}

/// Accumulates raw input and pulls out every complete OSC color reply.
///
/// Replies can arrive batched in one chunk, split anywhere (even inside `ESC \`), or
/// mixed with mouse reports and keystrokes. Each [`push()`](Self::push) rescans the
/// retained text from the start, then drops everything up to the end of the last match.
/// Junk that never forms a reply is bounded by [`OSC_BUFFER_MAX_LEN`].
#[derive(Debug, Default)]
pub struct OscResponseBuffer {
    text: String,
    decoder: Utf8ChunkDecoder,
}

impl OscResponseBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Appends `chunk` and returns the replies that are now complete, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<OscColorReply> {
        let decoded = self.decoder.decode(chunk);
        self.text.push_str(&decoded);

        let mut replies = vec![];
        let mut consumed = 0;
        for captures in OSC_COLOR_REPLY_REGEX.captures_iter(&self.text) {
            if let Some(whole) = captures.get(0) {
                consumed = whole.end();
            }
            let Some(color) = captures.name("color").and_then(|it| parse_color_value(it.as_str()))
            else {
                continue;
            };
            let index = captures.name("index").and_then(|it| it.as_str().parse::<u8>().ok());
            let code = captures.name("code").and_then(|it| it.as_str().parse::<u8>().ok());
            match (index, code) {
                (Some(index), _) => replies.push(OscColorReply::Palette { index, color }),
                (None, Some(code)) => replies.push(OscColorReply::Special { code, color }),
                (None, None) => {}
            }
        }

        self.text.drain(..consumed);
        self.enforce_cap();

        DEBUG_TUI_INPUT_PARSING.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(
                message = "OSC buffer scanned",
                replies = ?replies,
                retained_len = %self.text.len()
            );
        });
        replies
    }

    /// Text that did not form a reply (yet).
    #[must_use]
    pub fn get_buffer(&self) -> &str { &self.text }

    pub fn clear(&mut self) {
        self.text.clear();
        self.decoder.clear();
    }

    fn enforce_cap(&mut self) {
        if self.text.len() <= OSC_BUFFER_MAX_LEN {
            return;
        }
        let mut cut = self.text.len() - OSC_BUFFER_KEEP_LEN;
        while !self.text.is_char_boundary(cut) {
            cut += 1;
        }
        self.text.drain(..cut);
    }
}
