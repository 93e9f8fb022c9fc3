// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words ECMA

//! Finds where the next terminal sequence ends. See [`scan_sequence()`].
//!
//! ```text
//! ESC [ < digits ; digits ; digits (M|m)   SGR mouse        (CSI subset)
//! ESC [ M b x y                             X10 mouse        exactly 3 chars after M
//! ESC [ [ c                                 linux console F-keys
//! ESC [ params* intermediates* final        CSI (ECMA-48)
//! ESC (] | P | _) ... (BEL | ESC \)         OSC / DCS / APC
//! ESC O c                                   SS3
//! ESC ESC <sequence>                        meta + sequence
//! ESC c                                     meta + char
//! c                                         one char
//! ```

use crate::{ANSI_ESC_CHAR, BEL_CHAR};

/// Result of looking for one complete sequence at the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The first `usize` bytes form one unit. Malformed CSI sequences also end up
    /// here: the unit stops right before the offending char so scanning can resync.
    Complete(usize),
    /// The input is a strict prefix of a sequence that needs more bytes.
    Incomplete,
}

/// Parameter bytes of a CSI sequence (`0-9 : ; < = > ?`).
const CSI_PARAM: std::ops::RangeInclusive<char> = '\u{30}'..='\u{3F}';
/// Intermediate bytes of a CSI sequence (space, `!"#$%&'()*+,-./`).
const CSI_INTERMEDIATE: std::ops::RangeInclusive<char> = '\u{20}'..='\u{2F}';
/// Final bytes of a CSI sequence (`@`, `A-Z`, `[\]^_`, backtick, `a-z{|}~`).
const CSI_FINAL: std::ops::RangeInclusive<char> = '\u{40}'..='\u{7E}';

/// Scans `input` (which must not be empty) for one complete sequence.
#[must_use]
pub fn scan_sequence(input: &str) -> ScanOutcome {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return ScanOutcome::Incomplete;
    };

    if first != ANSI_ESC_CHAR {
        return ScanOutcome::Complete(first.len_utf8());
    }

    let Some(second) = chars.next() else {
        // Lone ESC: could be the escape key or the start of anything.
        return ScanOutcome::Incomplete;
    };

    let after_intro = 1 + second.len_utf8();
    match second {
        '[' => scan_csi(input, after_intro),
        ']' | 'P' | '_' => scan_string_sequence(input, after_intro),
        'O' => match chars.next() {
            Some(third) => ScanOutcome::Complete(after_intro + third.len_utf8()),
            None => ScanOutcome::Incomplete,
        },
        ANSI_ESC_CHAR => match scan_sequence(&input[1..]) {
            ScanOutcome::Complete(len) => ScanOutcome::Complete(1 + len),
            ScanOutcome::Incomplete => ScanOutcome::Incomplete,
        },
        _ => ScanOutcome::Complete(after_intro),
    }
}

/// `input[..body_start]` is `ESC [`.
fn scan_csi(input: &str, body_start: usize) -> ScanOutcome {
    let body = &input[body_start..];
    let mut chars = body.char_indices();

    match chars.next() {
        None => ScanOutcome::Incomplete,

        // X10 mouse: the 3 payload chars are taken as-is, whatever they look like.
        Some((_, 'M')) => {
            let mut payload = body[1..].char_indices().skip(2);
            match payload.next() {
                Some((offset, ch)) => {
                    ScanOutcome::Complete(body_start + 1 + offset + ch.len_utf8())
                }
                None => ScanOutcome::Incomplete,
            }
        }

        // Linux console function keys: `ESC [ [ A` .. `ESC [ [ E`.
        Some((_, '[')) => match chars.next() {
            Some((offset, ch)) => ScanOutcome::Complete(body_start + offset + ch.len_utf8()),
            None => ScanOutcome::Incomplete,
        },

        Some(first) => scan_csi_body(body_start, std::iter::once(first).chain(chars)),
    }
}

/// Walks ECMA-48 CSI syntax: parameters, then intermediates, then one final byte.
///
/// rxvt reports shifted editing keys as `ESC [ <n> $` with no final byte. A `$` right
/// after a plain number is taken as the end of such a key.
fn scan_csi_body(
    body_start: usize,
    chars: impl Iterator<Item = (usize, char)>,
) -> ScanOutcome {
    let mut seen_intermediate = false;
    let mut digits_only = true;
    for (offset, ch) in chars {
        if ch == '$' && digits_only && offset > 0 {
            return ScanOutcome::Complete(body_start + offset + 1);
        }
        if CSI_PARAM.contains(&ch) && !seen_intermediate {
            digits_only &= ch.is_ascii_digit();
            continue;
        }
        if CSI_INTERMEDIATE.contains(&ch) {
            seen_intermediate = true;
            continue;
        }
        if CSI_FINAL.contains(&ch) {
            return ScanOutcome::Complete(body_start + offset + ch.len_utf8());
        }
        // Invalid byte: cut the malformed prefix off here.
        return ScanOutcome::Complete(body_start + offset);
    }
    ScanOutcome::Incomplete
}

/// OSC, DCS, and APC run until BEL or ST (`ESC \`). An `ESC` followed by anything
/// else aborts the string, and the unit ends right before that `ESC`.
fn scan_string_sequence(input: &str, body_start: usize) -> ScanOutcome {
    let mut chars = input[body_start..].char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            BEL_CHAR => return ScanOutcome::Complete(body_start + offset + 1),
            ANSI_ESC_CHAR => {
                return match chars.peek() {
                    Some((_, '\\')) => ScanOutcome::Complete(body_start + offset + 2),
                    Some(_) => ScanOutcome::Complete(body_start + offset),
                    None => ScanOutcome::Incomplete,
                };
            }
            _ => {}
        }
    }
    ScanOutcome::Incomplete
}

/// Splits `input` into complete units, returning them and the incomplete tail.
#[must_use]
pub fn split_sequences(input: &str) -> (Vec<&str>, &str) {
    let mut units = vec![];
    let mut pos = 0;
    while pos < input.len() {
        match scan_sequence(&input[pos..]) {
            ScanOutcome::Complete(len) => {
                units.push(&input[pos..pos + len]);
                pos += len;
            }
            ScanOutcome::Incomplete => break,
        }
    }
    (units, &input[pos..])
}
