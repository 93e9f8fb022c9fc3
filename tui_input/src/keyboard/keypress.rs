// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{KeyEvent, parse_kitty_keyboard, parse_legacy_keypress};
use crate::KeyboardProtocol;

/// Parses one complete sequence from [`crate::StdinBuffer`] into a key event.
///
/// The protocol is configured, never sniffed from the bytes, because some sequences
/// mean different things in each. In [`KeyboardProtocol::Kitty`] mode anything that is
/// not a Kitty sequence is parsed as a legacy key, since Kitty only re-encodes the keys
/// it was asked to.
///
/// Returns [`None`] when the sequence is not a key this crate knows. Callers that must
/// not drop input fall back to [`KeyEvent::unnamed()`].
#[must_use]
pub fn parse_keypress(seq: &str, protocol: KeyboardProtocol) -> Option<KeyEvent> {
    match protocol {
        KeyboardProtocol::Legacy => parse_legacy_keypress(seq),
        KeyboardProtocol::Kitty => {
            parse_kitty_keyboard(seq).or_else(|| parse_legacy_keypress(seq))
        }
    }
}
