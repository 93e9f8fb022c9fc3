// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words kovidgoyal

//! Kitty keyboard protocol. More info:
//! <https://sw.kovidgoyal.net/kitty/keyboard-protocol/>
//!
//! ```text
//! ESC [ code[:shifted[:base]] [; mods[:event]] [; text[:text...]] u
//! ESC [ 1 ; mods:event <A-D|E|F|H|P|Q|S>
//! ESC [ number ; mods:event ~
//! ```
//!
//! `mods - 1` is a bit set:
//!
//! | Bit | Modifier  |
//! |-----|-----------|
//! | 0   | shift     |
//! | 1   | alt       |
//! | 2   | ctrl      |
//! | 3   | super     |
//! | 4   | hyper     |
//! | 5   | caps lock |
//! | 6   | num lock  |

use super::{KeyEvent, KeyEventType, KeySource, kitty_functional_key_name,
            legacy_keypress::lookup_code};
use crate::{CSI, DEBUG_TUI_INPUT_PARSING};

const MOD_SHIFT: u32 = 1;
const MOD_ALT: u32 = 1 << 1;
const MOD_CTRL: u32 = 1 << 2;
const MOD_SUPER: u32 = 1 << 3;
const MOD_HYPER: u32 = 1 << 4;
const MOD_CAPS_LOCK: u32 = 1 << 5;
const MOD_NUM_LOCK: u32 = 1 << 6;

/// Parses a Kitty keyboard protocol sequence. Returns [`None`] for anything else,
/// including code points past `U+10FFFF` and functional letter / tilde forms that carry
/// no explicit event type (those are plain legacy keys).
#[must_use]
pub fn parse_kitty_keyboard(seq: &str) -> Option<KeyEvent> {
    let body = seq.strip_prefix(CSI)?;
    let final_char = body.chars().last()?;
    let params = &body[..body.len() - final_char.len_utf8()];

    let it = match final_char {
        'u' => parse_csi_u(params, seq),
        'A'..='F' | 'H' | 'P' | 'Q' | 'S' | '~' => parse_functional(params, final_char, seq),
        _ => None,
    };

    DEBUG_TUI_INPUT_PARSING.then(|| {
        // % is Display, ? is Debug.
        tracing::debug!(message = "Kitty key parsed", seq = ?seq, key = ?it);
    });
    it
}

/// `params` is everything between `ESC [` and `u`.
fn parse_csi_u(params: &str, raw: &str) -> Option<KeyEvent> {
    let mut fields = params.split(';');
    let key_codes = fields.next()?;
    let modifier_field = fields.next();
    let text_field = fields.next();
    if fields.next().is_some() {
        return None;
    }

    let mut codes = key_codes.split(':');
    let code = parse_code_point(codes.next()?)?;
    let shifted_code = parse_optional_code_point(codes.next())?;
    let base_code = parse_optional_code_point(codes.next())?;

    let (modifiers, event_field) = parse_modifier_field(modifier_field)?;

    let text = match text_field {
        Some(text_field) => Some(
            text_field
                .split(':')
                .map(|it| parse_code_point(it).and_then(char::from_u32))
                .collect::<Option<String>>()?,
        ),
        None => None,
    };

    let ch = char::from_u32(code)?;
    let mut key = KeyEvent {
        shifted_code,
        base_code,
        source: KeySource::Kitty,
        ..KeyEvent::new(key_name(code, ch), raw)
    };
    apply_kitty_modifiers(&mut key, modifiers);
    apply_event_type(&mut key, event_field);

    if ch.is_ascii_uppercase() {
        key.shift = true;
    }
    key.number = ch.is_ascii_digit();
    key.sequence = match text {
        Some(text) => text,
        None => display_sequence(&key, code, ch, raw),
    };
    Some(key)
}

/// Letter and tilde forms, which Kitty uses for arrows, paging, and F keys.
fn parse_functional(params: &str, final_char: char, raw: &str) -> Option<KeyEvent> {
    let (number, modifier_field) = params.split_once(';')?;
    // Without `:event` this is an ordinary xterm sequence.
    if !modifier_field.contains(':') {
        return None;
    }

    let code = if final_char == '~' {
        format!("[{number}~")
    } else if number.is_empty() || number == "1" {
        format!("[{final_char}")
    } else {
        return None;
    };

    let (name, _, _) = lookup_code(&code)?;
    let (modifiers, event_field) = parse_modifier_field(Some(modifier_field))?;
    let mut key = KeyEvent {
        code: Some(code),
        source: KeySource::Kitty,
        ..KeyEvent::new(name, raw)
    };
    apply_kitty_modifiers(&mut key, modifiers);
    apply_event_type(&mut key, event_field);
    Some(key)
}

fn key_name(code: u32, ch: char) -> String {
    match code {
        8 | 127 => "backspace".to_string(),
        9 => "tab".to_string(),
        13 => "return".to_string(),
        27 => "escape".to_string(),
        32 => "space".to_string(),
        _ => kitty_functional_key_name(code)
            .unwrap_or_else(|| ch.to_lowercase().collect()),
    }
}

/// The text a key inserts when the terminal did not send it explicitly.
fn display_sequence(key: &KeyEvent, code: u32, ch: char, raw: &str) -> String {
    match code {
        8 | 127 => "\x7f".to_string(),
        9 => "\t".to_string(),
        13 => "\r".to_string(),
        27 => "\x1b".to_string(),
        32 => " ".to_string(),
        _ if kitty_functional_key_name(code).is_some() => raw.to_string(),
        _ if key.shift => match key.shifted_code.and_then(char::from_u32) {
            Some(shifted) => shifted.to_string(),
            None => ch.to_uppercase().collect(),
        },
        _ => ch.to_string(),
    }
}

/// `mods[:event]`. Missing means no modifiers and a press.
fn parse_modifier_field(field: Option<&str>) -> Option<(u32, Option<&str>)> {
    let Some(field) = field else {
        return Some((0, None));
    };
    let (mods, event) = match field.split_once(':') {
        Some((mods, event)) => (mods, Some(event)),
        None => (field, None),
    };
    let mods = if mods.is_empty() { 1 } else { parse_number(mods)? };
    Some((mods.saturating_sub(1), event))
}

fn apply_kitty_modifiers(key: &mut KeyEvent, bits: u32) {
    key.shift = bits & MOD_SHIFT != 0;
    key.meta = bits & MOD_ALT != 0;
    key.option = key.meta;
    key.ctrl = bits & MOD_CTRL != 0;
    key.super_key = bits & MOD_SUPER != 0;
    key.hyper = bits & MOD_HYPER != 0;
    key.caps_lock = bits & MOD_CAPS_LOCK != 0;
    key.num_lock = bits & MOD_NUM_LOCK != 0;
}

/// `1` press, `2` repeat, `3` release. Anything else is a press.
fn apply_event_type(key: &mut KeyEvent, event: Option<&str>) {
    match event {
        Some("2") => {
            key.event_type = KeyEventType::Press;
            key.repeated = true;
        }
        Some("3") => key.event_type = KeyEventType::Release,
        _ => key.event_type = KeyEventType::Press,
    }
}

/// A decimal code point no larger than `U+10FFFF`.
fn parse_code_point(it: &str) -> Option<u32> {
    parse_number(it).filter(|&code| code <= 0x10FFFF)
}

/// Outer [`None`] is a parse failure, inner [`None`] is an absent or empty field.
fn parse_optional_code_point(it: Option<&str>) -> Option<Option<u32>> {
    match it {
        None | Some("") => Some(None),
        Some(it) => parse_code_point(it).map(Some),
    }
}

fn parse_number(it: &str) -> Option<u32> {
    if it.is_empty() || !it.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    it.parse().ok()
}
