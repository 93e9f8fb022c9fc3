// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words decrpm xtversion

//! Tells terminal replies to capability probes apart from keystrokes.
//!
//! | Reply              | Form                          |
//! |--------------------|-------------------------------|
//! | DECRPM             | `ESC [ ? <mode> ; <value> $ y` (`?` absent for ANSI modes) |
//! | CPR (width probe)  | `ESC [ 1 ; 2 R`, `ESC [ 1 ; 3 R` |
//! | XTVersion          | `ESC P > \| <name>(<ver>) ESC \` |
//! | Kitty graphics ack | `ESC _ G ... ESC \`           |
//! | DA1                | `ESC [ ? <params> c`          |
//! | Kitty keyboard     | `ESC [ ? <flags> u`           |
//! | Pixel resolution   | `ESC [ 4 ; <height> ; <width> t` |
//!
//! Plain CPR replies (`ESC [ <row> ; <col> R`) are left alone, because apps ask for them
//! to track the cursor. Only the two exact values used by width probes count. Note that
//! `ESC [ 1 ; 2 R` is also what some terminals send for shift+F3; apps that probe widths
//! accept that ambiguity.

use crate::{APC, CSI, DCS, ST};

/// Whether `seq` is a reply to a capability query rather than user input. Never panics
/// and never errors.
#[must_use]
pub fn is_capability_response(seq: &str) -> bool {
    is_decrpm_response(seq)
        || is_width_probe_cpr(seq)
        || is_xtversion_response(seq)
        || is_kitty_graphics_response(seq)
        || is_da1_response(seq)
        || is_kitty_keyboard_query_response(seq)
}

/// `ESC [ ? <mode> ; <value> $ y`, or `ESC [ <mode> ; <value> $ y` for ANSI modes.
#[must_use]
pub fn is_decrpm_response(seq: &str) -> bool { parse_decrpm(seq).is_some() }

/// `ESC [ 1 ; 2 R` or `ESC [ 1 ; 3 R`, and nothing else.
#[must_use]
pub fn is_width_probe_cpr(seq: &str) -> bool { matches!(seq, "\x1b[1;2R" | "\x1b[1;3R") }

/// `ESC P > | <name> ESC \`
#[must_use]
pub fn is_xtversion_response(seq: &str) -> bool {
    seq.starts_with("\x1bP>|") && seq.ends_with(ST)
}

/// `ESC _ G ... ESC \`
#[must_use]
pub fn is_kitty_graphics_response(seq: &str) -> bool {
    seq.strip_prefix(APC)
        .is_some_and(|rest| rest.starts_with('G') && rest.ends_with(ST))
}

/// `ESC [ ? <params> c` where params are digits and `;`.
#[must_use]
pub fn is_da1_response(seq: &str) -> bool {
    private_csi_body(seq, 'c').is_some_and(|params| {
        !params.is_empty() && params.chars().all(|ch| ch.is_ascii_digit() || ch == ';')
    })
}

/// `ESC [ ? <flags> u`
#[must_use]
pub fn is_kitty_keyboard_query_response(seq: &str) -> bool {
    parse_kitty_keyboard_flags(seq).is_some()
}

/// Returns the progressive enhancement flags from a Kitty keyboard query reply.
#[must_use]
pub fn parse_kitty_keyboard_flags(seq: &str) -> Option<u32> {
    let params = private_csi_body(seq, 'u')?;
    if params.is_empty() || !params.bytes().all(|it| it.is_ascii_digit()) {
        return None;
    }
    params.parse().ok()
}

/// State of a mode, as reported by DECRPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum DecrpmValue {
    #[strum(serialize = "not recognized")]
    NotRecognized,
    #[strum(serialize = "set")]
    Set,
    #[strum(serialize = "reset")]
    Reset,
    #[strum(serialize = "permanently set")]
    PermanentlySet,
    #[strum(serialize = "permanently reset")]
    PermanentlyReset,
}

impl DecrpmValue {
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NotRecognized),
            1 => Some(Self::Set),
            2 => Some(Self::Reset),
            3 => Some(Self::PermanentlySet),
            4 => Some(Self::PermanentlyReset),
            _ => None,
        }
    }

    /// The terminal knows the mode (whatever its current state).
    #[must_use]
    pub fn is_supported(self) -> bool { self != Self::NotRecognized }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecrpmReport {
    pub mode: u32,
    /// DEC private mode (`?` form) rather than an ANSI mode.
    pub is_private: bool,
    pub value: DecrpmValue,
}

/// Parses `ESC [ ? <mode> ; <value> $ y` (reply to DECRQM for a DEC private mode) and
/// `ESC [ <mode> ; <value> $ y` (the same for an ANSI mode).
#[must_use]
pub fn parse_decrpm(seq: &str) -> Option<DecrpmReport> {
    let body = seq.strip_prefix(CSI)?.strip_suffix("$y")?;
    let (body, is_private) = match body.strip_prefix('?') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    let (mode, value) = body.split_once(';')?;
    let mode = parse_digits::<u32>(mode)?;
    let value = DecrpmValue::from_code(parse_digits::<u8>(value)?)?;
    Some(DecrpmReport { mode, is_private, value })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalVersion {
    pub name: String,
    /// Empty when the terminal only reports a name.
    pub version: String,
}

/// Parses an XTVersion reply. Both `name(version)` and `name version` are used in the
/// wild (kitty and foot use the former, xterm the latter).
#[must_use]
pub fn parse_xtversion(seq: &str) -> Option<TerminalVersion> {
    let body = seq.strip_prefix(DCS)?.strip_prefix(">|")?.strip_suffix(ST)?;
    if body.is_empty() {
        return None;
    }

    if let Some((name, rest)) = body.split_once('(') {
        let version = rest.strip_suffix(')').unwrap_or(rest);
        return Some(TerminalVersion {
            name: name.trim().to_string(),
            version: version.to_string(),
        });
    }

    Some(match body.split_once(' ') {
        Some((name, version)) => TerminalVersion {
            name: name.to_string(),
            version: version.trim().to_string(),
        },
        None => TerminalVersion {
            name: body.to_string(),
            version: String::new(),
        },
    })
}

/// Terminal size in pixels, from the reply to `CSI 14 t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelResolution {
    pub width: u32,
    pub height: u32,
}

/// `ESC [ 4 ; <height> ; <width> t`
#[must_use]
pub fn is_pixel_resolution_response(seq: &str) -> bool { parse_pixel_resolution(seq).is_some() }

/// Parses `ESC [ 4 ; <height> ; <width> t`. The wire sends height first; the result
/// has them in the right fields.
#[must_use]
pub fn parse_pixel_resolution(seq: &str) -> Option<PixelResolution> {
    let body = seq.strip_prefix(CSI)?.strip_prefix("4;")?.strip_suffix('t')?;
    let (height, width) = body.split_once(';')?;
    Some(PixelResolution {
        width: parse_digits(width)?,
        height: parse_digits(height)?,
    })
}

/// Body of `ESC [ ? <body> <final>`.
fn private_csi_body(seq: &str, final_char: char) -> Option<&str> {
    seq.strip_prefix("\x1b[?")?.strip_suffix(final_char)
}

/// Like `str::parse` but rejects signs and empty strings.
fn parse_digits<T: std::str::FromStr>(it: &str) -> Option<T> {
    if it.is_empty() || !it.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    it.parse().ok()
}
