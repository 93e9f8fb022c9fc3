// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Decoding of mouse reports. Both encodings share the button byte layout:
//!
//! | Bits | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0-1  | button: 0 left, 1 middle, 2 right, 3 none / released |
//! | 2    | shift                                                |
//! | 3    | alt                                                  |
//! | 4    | ctrl                                                 |
//! | 5    | motion                                               |
//! | 6    | scroll wheel, bits 0-1 are then the direction        |
//!
//! SGR sends it as decimal text and uses the final byte (`M` / `m`) for press and
//! release. X10 sends each of the three values as one char offset by 32, and reports any
//! release as button 3.

use super::{MouseEvent, MouseEventKind, MouseModifiers, ScrollDirection};
use crate::{DEBUG_TUI_INPUT_PARSING, SGR_MOUSE_PREFIX, X10_MOUSE_PREFIX};
use smallvec::SmallVec;

const BUTTON_MASK: u32 = 0b11;
const BUTTON_NONE: u8 = 3;
const MOD_SHIFT: u32 = 1 << 2;
const MOD_ALT: u32 = 1 << 3;
const MOD_CTRL: u32 = 1 << 4;
const FLAG_MOTION: u32 = 1 << 5;
const FLAG_SCROLL: u32 = 1 << 6;

/// X10 values are sent as `value + 32`.
const X10_OFFSET: u32 = 32;
const X10_PAYLOAD_CHARS: usize = 3;

/// Whether `seq` is a complete SGR or X10 mouse report.
#[must_use]
pub fn is_mouse_sequence(seq: &str) -> bool {
    if let Some(body) = seq.strip_prefix(SGR_MOUSE_PREFIX) {
        return body.len() > 1
            && (body.ends_with('M') || body.ends_with('m'))
            && body[..body.len() - 1].bytes().all(|b| b.is_ascii_digit() || b == b';');
    }
    seq.strip_prefix(X10_MOUSE_PREFIX)
        .is_some_and(|payload| payload.chars().count() == X10_PAYLOAD_CHARS)
}

/// Stateful mouse report decoder.
///
/// The only state is the set of buttons held down, which is what tells a drag from a
/// plain move. A release clears the whole set, since X10 does not say which button went
/// up. Call [`reset()`](Self::reset) between input sessions (eg: after a resize or focus
/// loss) so a stale press does not turn the next move into a drag.
#[derive(Debug, Clone, Default)]
pub struct MouseParser {
    pressed_buttons: SmallVec<[u8; 4]>,
}

impl MouseParser {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Decodes the mouse report at the start of `data`. Returns the event and how many
    /// bytes of `data` it used, or [`None`] if `data` does not start with a complete
    /// report.
    pub fn parse(&mut self, data: &str) -> Option<(MouseEvent, usize)> {
        let (raw, consumed) = if data.starts_with(SGR_MOUSE_PREFIX) {
            parse_sgr(data)?
        } else if data.starts_with(X10_MOUSE_PREFIX) {
            parse_x10(data)?
        } else {
            return None;
        };

        let event = self.decode(raw);
        DEBUG_TUI_INPUT_PARSING.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Mouse report parsed", event = ?event, consumed = %consumed);
        });
        Some((event, consumed))
    }

    /// Forgets every held button.
    pub fn reset(&mut self) { self.pressed_buttons.clear(); }

    #[must_use]
    pub fn pressed_buttons(&self) -> &[u8] { &self.pressed_buttons }

    fn decode(&mut self, raw: RawReport) -> MouseEvent {
        let RawReport { code, x, y, is_release } = raw;
        #[allow(clippy::cast_possible_truncation)]
        let button = (code & BUTTON_MASK) as u8;
        let modifiers = MouseModifiers {
            shift: code & MOD_SHIFT != 0,
            alt: code & MOD_ALT != 0,
            ctrl: code & MOD_CTRL != 0,
        };

        let event = if code & FLAG_SCROLL != 0 {
            let direction = match button {
                0 => ScrollDirection::Up,
                1 => ScrollDirection::Down,
                2 => ScrollDirection::Left,
                _ => ScrollDirection::Right,
            };
            MouseEvent::new(MouseEventKind::Scroll, button, x, y).with_scroll(direction)
        } else if code & FLAG_MOTION != 0 {
            match (button, self.pressed_buttons.first()) {
                (BUTTON_NONE, None) => MouseEvent::new(MouseEventKind::Move, button, x, y),
                (BUTTON_NONE, Some(&held)) => MouseEvent::new(MouseEventKind::Drag, held, x, y),
                _ => MouseEvent::new(MouseEventKind::Drag, button, x, y),
            }
        } else if is_release {
            let button = match button {
                BUTTON_NONE => self.pressed_buttons.first().copied().unwrap_or(button),
                _ => button,
            };
            self.pressed_buttons.clear();
            MouseEvent::new(MouseEventKind::Up, button, x, y)
        } else {
            if button != BUTTON_NONE && !self.pressed_buttons.contains(&button) {
                self.pressed_buttons.push(button);
            }
            MouseEvent::new(MouseEventKind::Down, button, x, y)
        };

        event.with_modifiers(modifiers)
    }
}

/// The numbers of one report, before any state is applied. Coordinates are already 0
/// based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawReport {
    code: u32,
    x: u32,
    y: u32,
    is_release: bool,
}

/// `ESC [ < code ; x ; y (M|m)`
fn parse_sgr(data: &str) -> Option<(RawReport, usize)> {
    let body = &data[SGR_MOUSE_PREFIX.len()..];
    let end = body.find(['M', 'm'])?;
    let params = &body[..end];
    let is_release = body[end..].starts_with('m');

    let mut fields = params.split(';');
    let code = parse_number(fields.next()?)?;
    let x = parse_number(fields.next()?)?;
    let y = parse_number(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }

    let report = RawReport {
        code,
        x: x.saturating_sub(1),
        y: y.saturating_sub(1),
        is_release,
    };
    Some((report, SGR_MOUSE_PREFIX.len() + end + 1))
}

/// `ESC [ M` followed by exactly three chars. Chars past `0x7f` come from raw bytes that
/// the decoder mapped to Latin-1, so the value is the code point. Chars below the offset
/// (which no terminal should send) count as 0.
fn parse_x10(data: &str) -> Option<(RawReport, usize)> {
    let payload = &data[X10_MOUSE_PREFIX.len()..];
    let mut values = SmallVec::<[u32; X10_PAYLOAD_CHARS]>::new();
    let mut payload_len = 0;
    for ch in payload.chars().take(X10_PAYLOAD_CHARS) {
        values.push((ch as u32).saturating_sub(X10_OFFSET));
        payload_len += ch.len_utf8();
    }
    let [code, x, y] = values.as_slice() else {
        return None;
    };

    // X10 has no release final byte. A release is button 3 with no motion or scroll.
    let is_release = *code & (BUTTON_MASK | FLAG_MOTION | FLAG_SCROLL) == BUTTON_MASK;
    let report = RawReport {
        code: *code,
        x: x.saturating_sub(1),
        y: y.saturating_sub(1),
        is_release,
    };
    Some((report, X10_MOUSE_PREFIX.len() + payload_len))
}

fn parse_number(it: &str) -> Option<u32> {
    if it.is_empty() || !it.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    it.parse().ok()
}

#[cfg(test)]
mod tests_sgr {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_left_press() {
        let mut parser = MouseParser::new();
        let (event, consumed) = parser.parse("\x1b[<0;10;5M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Down);
        assert_eq!(event.button, 0);
        assert_eq!((event.x, event.y), (9, 4));
        assert_eq!(consumed, 10);
        assert_eq!(parser.pressed_buttons(), &[0]);
    }

    #[test]
    fn test_consumed_leaves_trailing_input() {
        let mut parser = MouseParser::new();
        let data = "\x1b[<2;100;200mrest";
        let (event, consumed) = parser.parse(data).unwrap();
        assert_eq!(event.kind, MouseEventKind::Up);
        assert_eq!(event.button, 2);
        assert_eq!((event.x, event.y), (99, 199));
        assert_eq!(&data[consumed..], "rest");
    }

    #[test]
    fn test_scroll() {
        let mut parser = MouseParser::new();
        let (event, _) = parser.parse("\x1b[<64;1;1M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Scroll);
        let scroll = event.scroll.unwrap();
        assert_eq!(scroll.direction, ScrollDirection::Up);
        assert_eq!(scroll.delta, 1);

        let (event, _) = parser.parse("\x1b[<65;1;1M").unwrap();
        assert_eq!(event.scroll.unwrap().direction, ScrollDirection::Down);
        let (event, _) = parser.parse("\x1b[<66;1;1M").unwrap();
        assert_eq!(event.scroll.unwrap().direction, ScrollDirection::Left);
        let (event, _) = parser.parse("\x1b[<67;1;1M").unwrap();
        assert_eq!(event.scroll.unwrap().direction, ScrollDirection::Right);
        assert!(parser.pressed_buttons().is_empty());
    }

    #[test]
    fn test_move_then_drag_then_release() {
        let mut parser = MouseParser::new();
        let (event, _) = parser.parse("\x1b[<35;3;3M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Move);

        parser.parse("\x1b[<0;3;3M").unwrap();
        let (event, _) = parser.parse("\x1b[<32;4;3M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Drag);
        assert_eq!(event.button, 0);

        let (event, _) = parser.parse("\x1b[<35;5;3M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Drag, "held button, no button bits");
        assert_eq!(event.button, 0);

        let (event, _) = parser.parse("\x1b[<0;5;3m").unwrap();
        assert_eq!(event.kind, MouseEventKind::Up);
        let (event, _) = parser.parse("\x1b[<35;6;3M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Move);
    }

    #[test]
    fn test_release_clears_every_button() {
        let mut parser = MouseParser::new();
        parser.parse("\x1b[<0;1;1M");
        parser.parse("\x1b[<2;1;1M");
        assert_eq!(parser.pressed_buttons(), &[0, 2]);
        parser.parse("\x1b[<2;1;1m");
        assert!(parser.pressed_buttons().is_empty());
    }

    #[test]
    fn test_button_three_is_never_held() {
        let mut parser = MouseParser::new();
        let (event, _) = parser.parse("\x1b[<3;1;1M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Down);
        assert_eq!(event.button, 3);
        assert!(parser.pressed_buttons().is_empty());
    }

    #[test]
    fn test_modifiers() {
        let mut parser = MouseParser::new();
        let (event, _) = parser.parse("\x1b[<28;1;1M").unwrap();
        assert_eq!(event.modifiers, MouseModifiers { shift: true, alt: true, ctrl: true });
        assert_eq!(event.kind, MouseEventKind::Down);
    }

    #[test]
    fn test_reset_forgets_press() {
        let mut parser = MouseParser::new();
        parser.parse("\x1b[<0;1;1M");
        parser.reset();
        let (event, _) = parser.parse("\x1b[<35;2;2M").unwrap();
        assert_eq!(event.kind, MouseEventKind::Move);
    }

    #[test]
    fn test_malformed() {
        let mut parser = MouseParser::new();
        assert_eq!(parser.parse("\x1b[<0;1M"), None);
        assert_eq!(parser.parse("\x1b[<0;1;1;1M"), None);
        assert_eq!(parser.parse("\x1b[<0;1;1"), None);
        assert_eq!(parser.parse("\x1b[<a;1;1M"), None);
        assert_eq!(parser.parse("\x1b[A"), None);
    }
}
