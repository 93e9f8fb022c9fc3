// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words multibyte

//! Streaming bytes to text conversion for raw stdin reads.
//!
//! A read from stdin can end in the middle of a multibyte UTF-8 character, and legacy
//! X10 mouse reports put raw bytes (which may be `>= 0x80`) right after `ESC [ M`.
//! [`Utf8ChunkDecoder`] handles both:
//!
//! ```text
//! bytes          0x1b '[' 'M' 0x20 0xC3 0xA9 | 0xE2 0x82 ...chunk ends
//!                └── X10 ──┘ └─── raw ────┘   └ held until the next chunk ┘
//! decoded text   "\x1b[M" ' ' 'Ã' '©'
//! ```
//!
//! Invalid bytes are never dropped; each one becomes the Latin-1 char with the same
//! value, so the mouse parser can recover the original byte with `ch as u32`.
//!
//! `ESC [ M` only starts an X10 payload outside a bracketed paste. Inside one it is
//! plain text and the bytes after it are decoded as UTF-8 like everything else. OSC,
//! DCS, and APC bodies need no tracking, since any `ESC` other than ST ends them.

use crate::{PASTE_END, PASTE_START};
use smallvec::SmallVec;

const X10_MOUSE_PREFIX: &[u8] = b"\x1b[M";

/// Number of raw (not UTF-8 decoded) bytes that follow `ESC [ M`.
pub const X10_PAYLOAD_LEN: u8 = 3;

/// Longest marker the decoder looks for (`ESC [ 2 0 0 ~`).
const MARKER_WINDOW: usize = 6;

#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    /// Leading bytes of a multibyte char that was cut off at the end of a chunk.
    incomplete: SmallVec<[u8; 4]>,
    /// The last few ASCII bytes, for spotting markers split across chunks.
    recent: SmallVec<[u8; MARKER_WINDOW]>,
    is_pasting: bool,
    /// Bytes still to be passed through verbatim for an X10 mouse report.
    raw_remaining: u8,
}

impl Utf8ChunkDecoder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Whether a partial multibyte char (or X10 payload) is being held.
    #[must_use]
    pub fn has_pending(&self) -> bool { !self.incomplete.is_empty() || self.raw_remaining > 0 }

    /// Decodes `bytes`, prefixed by whatever was held from the previous call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut work: SmallVec<[u8; 256]> = SmallVec::new();
        work.extend(self.incomplete.drain(..));
        work.extend_from_slice(bytes);

        let mut text = String::with_capacity(work.len());
        let mut idx = 0;

        while idx < work.len() {
            let byte = work[idx];

            if self.raw_remaining > 0 {
                self.raw_remaining -= 1;
                text.push(char::from(byte));
                idx += 1;
                continue;
            }

            if byte.is_ascii() {
                self.track_context(byte);
                text.push(char::from(byte));
                idx += 1;
                continue;
            }

            self.recent.clear();
            let width = utf8_width(byte);
            if width == 0 {
                text.push(char::from(byte));
                idx += 1;
                continue;
            }

            let available = work.len() - idx;
            if available < width {
                // Hold the tail only if it can still become a valid char.
                if work[idx + 1..].iter().all(|it| is_continuation(*it)) {
                    self.incomplete.extend_from_slice(&work[idx..]);
                    break;
                }
                text.push(char::from(byte));
                idx += 1;
                continue;
            }

            match std::str::from_utf8(&work[idx..idx + width]) {
                Ok(decoded) => {
                    text.push_str(decoded);
                    idx += width;
                }
                Err(_) => {
                    text.push(char::from(byte));
                    idx += 1;
                }
            }
        }

        text
    }

    /// Brings the paste state in line with a caller that saw the markers in text it did
    /// not pass through this decoder.
    pub fn set_pasting(&mut self, is_pasting: bool) {
        if self.is_pasting != is_pasting {
            self.is_pasting = is_pasting;
            self.recent.clear();
        }
    }

    /// Gives up on any held bytes and returns them as Latin-1 chars.
    pub fn flush(&mut self) -> String {
        let text = self.incomplete.drain(..).map(char::from).collect();
        self.raw_remaining = 0;
        self.recent.clear();
        text
    }

    /// Drops held bytes and forgets any open paste.
    pub fn clear(&mut self) {
        self.incomplete.clear();
        self.recent.clear();
        self.is_pasting = false;
        self.raw_remaining = 0;
    }

    fn track_context(&mut self, byte: u8) {
        if self.recent.len() == MARKER_WINDOW {
            self.recent.remove(0);
        }
        self.recent.push(byte);
        let recent = self.recent.as_slice();

        if self.is_pasting {
            if recent.ends_with(PASTE_END.as_bytes()) {
                self.is_pasting = false;
                self.recent.clear();
            }
        } else if recent.ends_with(PASTE_START.as_bytes()) {
            self.is_pasting = true;
            self.recent.clear();
        } else if recent.ends_with(X10_MOUSE_PREFIX) {
            self.raw_remaining = X10_PAYLOAD_LEN;
            self.recent.clear();
        }
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn is_continuation(byte: u8) -> bool { byte & 0xC0 == 0x80 }
