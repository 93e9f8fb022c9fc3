// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words keycap

//! Coalesces the one-event-per-code-point bursts that the Kitty protocol sends for
//! emoji back into one key event per grapheme cluster.

use super::{KeyEvent, KeyEventType, KeySource, is_kitty_functional_key};
use crate::{DEBUG_TUI_INPUT_PARSING, DEFAULT_GRAPHEME_TIMEOUT, FlushDeadline};
use std::time::Duration;
use tokio::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

const COMBINING_ENCLOSING_KEYCAP: char = '\u{20E3}';
const CANCEL_TAG: char = '\u{E007F}';
const REGIONAL_INDICATOR_FIRST: u32 = 0x1F1E6;
const REGIONAL_INDICATOR_LAST: u32 = 0x1F1FF;

/// The cluster being accumulated.
#[derive(Debug, Clone)]
struct PendingCluster {
    text: String,
    raw: String,
    events: Vec<KeyEvent>,
}

impl PendingCluster {
    fn new(ch: char, key: KeyEvent) -> Self {
        Self {
            text: ch.to_string(),
            raw: key.raw.clone(),
            events: vec![key],
        }
    }

    fn push(&mut self, ch: char, key: KeyEvent) {
        self.text.push(ch);
        self.raw.push_str(&key.raw);
        self.events.push(key);
    }

    /// A full flag, a keycap, or a tag sequence closed by the cancel tag.
    fn is_complete(&self) -> bool {
        let Some(last) = self.text.chars().last() else {
            return false;
        };
        last == COMBINING_ENCLOSING_KEYCAP
            || last == CANCEL_TAG
            || self.text.chars().filter(|&ch| is_regional_indicator(ch)).count() >= 2
    }

    fn into_key(mut self) -> KeyEvent {
        if self.events.len() == 1 {
            return self.events.remove(0);
        }

        let mut merged = KeyEvent {
            sequence: self.text.clone(),
            source: KeySource::Kitty,
            ..KeyEvent::new(self.text, self.raw)
        };
        for key in &self.events {
            merged.merge_modifiers(key);
        }
        merged
    }
}

/// State machine that turns Kitty key events for single code points back into grapheme
/// clusters.
///
/// ```text
///            ┌──────── extend ─────────┐
///            ▼                         │
/// Idle ── start ──► Buffering ─────────┘
///  ▲                   │
///  └── flush ──────────┘  (timeout, complete cluster, non-extending input,
///                          release, explicit flush)
/// ```
///
/// A cluster only starts on a code point that can begin an emoji: a pictograph, a
/// regional indicator, or a keycap base (`0-9`, `#`, `*`). Whether the next code point
/// extends it is decided by the Unicode extended grapheme cluster rules. Modifier flags
/// from every event in the burst are OR'ed into the merged event.
///
/// Like [`crate::StdinBuffer`] it owns no timer; see
/// [`next_deadline()`](Self::next_deadline).
#[derive(Debug)]
pub struct GraphemeReassembler {
    pending: Option<PendingCluster>,
    deadline: FlushDeadline,
}

impl Default for GraphemeReassembler {
    fn default() -> Self { Self::new(DEFAULT_GRAPHEME_TIMEOUT) }
}

impl GraphemeReassembler {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: None,
            deadline: FlushDeadline::new(timeout),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool { self.pending.is_some() }

    /// Feeds one parsed key event, returning the events that are ready, in order.
    pub fn push(&mut self, key: KeyEvent) -> Vec<KeyEvent> {
        let mut output = vec![];

        let Some(ch) = candidate_char(&key) else {
            output.extend(self.flush());
            output.push(key);
            return output;
        };

        if let Some(pending) = &mut self.pending {
            if extends_cluster(&pending.text, ch) {
                pending.push(ch, key);
                if pending.is_complete() {
                    output.extend(self.flush());
                } else {
                    self.deadline.arm();
                }
                return output;
            }
            output.extend(self.flush());
        }

        if starts_cluster(ch) {
            self.pending = Some(PendingCluster::new(ch, key));
            self.deadline.arm();
        } else {
            output.push(key);
        }
        output
    }

    /// Emits the buffered cluster, if any.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        self.deadline.disarm();
        let Some(pending) = self.pending.take() else {
            return vec![];
        };
        let key = pending.into_key();
        DEBUG_TUI_INPUT_PARSING.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Grapheme cluster flushed", name = %key.name);
        });
        vec![key]
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> { self.deadline.get() }

    /// Flushes if the deadline has passed at `now`.
    pub fn handle_deadline(&mut self, now: Instant) -> Vec<KeyEvent> {
        if self.deadline.is_due(now) { self.flush() } else { vec![] }
    }

    /// Drops the buffered cluster without emitting it.
    pub fn clear(&mut self) {
        self.pending = None;
        self.deadline.disarm();
    }
}

/// The single code point a press event carries, if it can take part in a cluster.
fn candidate_char(key: &KeyEvent) -> Option<char> {
    if key.event_type != KeyEventType::Press {
        return None;
    }
    let mut chars = key.sequence.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || ch.is_control() || is_kitty_functional_key(ch as u32) {
        return None;
    }
    Some(ch)
}

fn extends_cluster(text: &str, ch: char) -> bool {
    let mut candidate = String::with_capacity(text.len() + ch.len_utf8());
    candidate.push_str(text);
    candidate.push(ch);
    candidate.graphemes(true).nth(1).is_none()
}

fn is_regional_indicator(ch: char) -> bool {
    (REGIONAL_INDICATOR_FIRST..=REGIONAL_INDICATOR_LAST).contains(&(ch as u32))
}

/// Code points that can begin an emoji grapheme cluster.
fn starts_cluster(ch: char) -> bool {
    matches!(ch, '0'..='9' | '#' | '*') || is_regional_indicator(ch) || is_pictographic(ch)
}

/// Approximation of `Extended_Pictographic` that covers the emoji ranges terminals send.
fn is_pictographic(ch: char) -> bool {
    matches!(
        ch as u32,
        0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x2194..=0x2199
            | 0x21A9..=0x21AA
            | 0x231A..=0x231B
            | 0x2328
            | 0x23CF
            | 0x23E9..=0x23F3
            | 0x23F8..=0x23FA
            | 0x24C2
            | 0x25AA..=0x25AB
            | 0x25B6
            | 0x25C0
            | 0x25FB..=0x25FE
            | 0x2600..=0x27BF
            | 0x2934..=0x2935
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x1F000..=0x1FAFF
            | 0x1FC00..=0x1FFFD
    )
}
