// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rxvt linefeed pageup pagedown

//! Legacy (xterm, rxvt, linux console) key encodings.
//!
//! A sequence is one of:
//!
//! | Shape                     | Example          | Meaning                  |
//! |---------------------------|------------------|--------------------------|
//! | one char                  | `a`, `\x01`      | text or ctrl+letter      |
//! | `ESC` + char              | `\x1ba`          | meta+char                |
//! | `ESC [` params final      | `\x1b[1;5A`      | xterm CSI key            |
//! | `ESC O` char              | `\x1bOP`         | SS3 key (f1, keypad)     |
//! | `ESC [ [` char            | `\x1b[[A`        | linux console f1..f5     |
//! | `ESC [` n (`$`\|`^`\|`@`) | `\x1b[3^`        | rxvt shift / ctrl key    |
//! | `ESC [ 27 ;` mod `;` code `~` | `\x1b[27;5;13~` | xterm `modifyOtherKeys` |
//!
//! Modifier parameters follow xterm: `mod - 1` is a bit set where 1 is shift, 2 is alt,
//! 4 is ctrl and 8 is meta.

use super::{KeyEvent, KeySource};
use crate::{ANSI_ESC_CHAR, DEBUG_TUI_INPUT_PARSING};

/// Parses one complete legacy sequence. Returns [`None`] for sequences this table does
/// not know, so the caller can decide on a fallback.
#[must_use]
pub fn parse_legacy_keypress(seq: &str) -> Option<KeyEvent> {
    let mut chars = seq.chars();
    let first = chars.next()?;

    let it = if first != ANSI_ESC_CHAR {
        if chars.next().is_some() {
            // Multi char text (eg: a grapheme cluster) is a key in its own right.
            return Some(text_key(seq, seq));
        }
        char_key(first, seq)
    } else {
        parse_escape(&seq[ANSI_ESC_CHAR.len_utf8()..], seq)
    };

    if it.is_none() {
        DEBUG_TUI_INPUT_PARSING.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Unknown legacy key sequence", seq = ?seq);
        });
    }
    it
}

fn parse_escape(rest: &str, raw: &str) -> Option<KeyEvent> {
    let mut chars = rest.chars();
    let Some(second) = chars.next() else {
        return Some(KeyEvent::new("escape", raw));
    };

    match second {
        // `ESC ESC <seq>` is meta applied to the inner sequence.
        ANSI_ESC_CHAR => {
            let mut inner = if rest.len() == 1 {
                KeyEvent::new("escape", raw)
            } else {
                parse_escape(&rest[1..], raw)?
            };
            set_alt(&mut inner);
            inner.raw = raw.to_string();
            inner.sequence = raw.to_string();
            Some(inner)
        }
        '[' if rest.len() > 1 => parse_csi(&rest[1..], raw),
        'O' if rest.len() > 1 => parse_ss3(&rest[1..], raw),
        _ if chars.next().is_none() => {
            let mut inner = char_key(second, raw)?;
            set_alt(&mut inner);
            inner.sequence = raw.to_string();
            Some(inner)
        }
        _ => None,
    }
}

/// `body` is everything after `ESC [`.
fn parse_csi(body: &str, raw: &str) -> Option<KeyEvent> {
    // Linux console: `ESC [ [ A` .. `ESC [ [ E`, and `ESC [ [ 5 ~`.
    if let Some(console) = body.strip_prefix('[') {
        let name = match console {
            "A" => "f1",
            "B" => "f2",
            "C" => "f3",
            "D" => "f4",
            "E" => "f5",
            "5~" => "pageup",
            "6~" => "pagedown",
            _ => return None,
        };
        return Some(named_key(name, &format!("[[{console}"), raw));
    }

    let final_char = body.chars().last()?;
    let params = &body[..body.len() - final_char.len_utf8()];

    // `ESC [ 27 ; mod ; code ~`
    if final_char == '~'
        && let Some(rest) = params.strip_prefix("27;")
    {
        return parse_modify_other_keys(rest, raw);
    }

    // rxvt: `$` adds shift, `^` adds ctrl, `@` adds both. Lower-case letter finals
    // (`ESC [ a`) are rxvt shift+arrow.
    let (rxvt_shift, rxvt_ctrl) = match final_char {
        '$' => (true, false),
        '^' => (false, true),
        '@' => (true, true),
        _ => (false, false),
    };

    let (code_params, modifier) = match params.split_once(';') {
        Some((code, modifier)) => (code, Some(parse_number(modifier)?)),
        None => (params, None),
    };

    let code = if rxvt_shift || rxvt_ctrl || final_char == '~' {
        format!("[{code_params}~")
    } else if code_params.is_empty() || code_params == "1" {
        format!("[{final_char}")
    } else {
        return None;
    };

    let (name, extra_shift, extra_ctrl) = lookup_code(&code)?;
    let mut key = named_key(name, &code, raw);
    key.shift |= extra_shift || rxvt_shift;
    key.ctrl |= extra_ctrl || rxvt_ctrl;
    if let Some(modifier) = modifier {
        apply_xterm_modifier(&mut key, modifier);
    }
    Some(key)
}

/// `body` is everything after `ESC O`.
fn parse_ss3(body: &str, raw: &str) -> Option<KeyEvent> {
    // Some terminals send `ESC O 5 P` style modifiers for f1..f4.
    let (modifier, final_part) = match body.len() {
        1 => (None, body),
        2 => {
            let (digits, final_part) = body.split_at(1);
            (Some(parse_number(digits)?), final_part)
        }
        _ => return None,
    };

    let code = format!("O{final_part}");
    let (name, extra_shift, extra_ctrl) = lookup_code(&code)?;
    let mut key = named_key(name, &code, raw);
    key.shift |= extra_shift;
    key.ctrl |= extra_ctrl;
    if let Some(modifier) = modifier {
        apply_xterm_modifier(&mut key, modifier);
    }
    Some(key)
}

/// `rest` is `mod ; code ~` with the `~` already removed.
fn parse_modify_other_keys(rest: &str, raw: &str) -> Option<KeyEvent> {
    let (modifier, code_point) = rest.split_once(';')?;
    let modifier = parse_number(modifier)?;
    let ch = char::from_u32(parse_number(code_point)?)?;
    let mut key = char_key(ch, raw)?;
    key.raw = raw.to_string();
    key.sequence = raw.to_string();
    apply_xterm_modifier(&mut key, modifier);
    Some(key)
}

/// Name and implied (shift, ctrl) for the identifying part of a legacy sequence.
pub(super) fn lookup_code(code: &str) -> Option<(&'static str, bool, bool)> {
    let plain = |name| Some((name, false, false));
    let shift = |name| Some((name, true, false));
    let ctrl = |name| Some((name, false, true));

    match code {
        // xterm / gnome SS3 and CSI function keys.
        "OP" | "[11~" | "[P" => plain("f1"),
        "OQ" | "[12~" | "[Q" => plain("f2"),
        "OR" | "[13~" | "[R" => plain("f3"),
        "OS" | "[14~" | "[S" => plain("f4"),
        "[15~" => plain("f5"),
        "[17~" => plain("f6"),
        "[18~" => plain("f7"),
        "[19~" => plain("f8"),
        "[20~" => plain("f9"),
        "[21~" => plain("f10"),
        "[23~" => plain("f11"),
        "[24~" => plain("f12"),
        "[25~" => plain("f13"),
        "[26~" => plain("f14"),
        "[28~" => plain("f15"),
        "[29~" => plain("f16"),
        "[31~" => plain("f17"),
        "[32~" => plain("f18"),
        "[33~" => plain("f19"),
        "[34~" => plain("f20"),

        // Cursor and editing keys.
        "[A" | "OA" => plain("up"),
        "[B" | "OB" => plain("down"),
        "[C" | "OC" => plain("right"),
        "[D" | "OD" => plain("left"),
        "[E" | "OE" => plain("clear"),
        "[F" | "OF" => plain("end"),
        "[H" | "OH" => plain("home"),
        "[1~" | "[7~" => plain("home"),
        "[2~" => plain("insert"),
        "[3~" => plain("delete"),
        "[4~" | "[8~" => plain("end"),
        "[5~" => plain("pageup"),
        "[6~" => plain("pagedown"),
        "OM" => plain("enter"),

        // rxvt shift and ctrl arrows.
        "[a" => shift("up"),
        "[b" => shift("down"),
        "[c" => shift("right"),
        "[d" => shift("left"),
        "[e" => shift("clear"),
        "Oa" => ctrl("up"),
        "Ob" => ctrl("down"),
        "Oc" => ctrl("right"),
        "Od" => ctrl("left"),
        "Oe" => ctrl("clear"),

        "[Z" => shift("tab"),
        _ => None,
    }
}

/// Key for a single char, with no escape prefix.
fn char_key(ch: char, raw: &str) -> Option<KeyEvent> {
    let it = match ch {
        '\r' => KeyEvent::new("return", raw),
        '\n' => KeyEvent::new("linefeed", raw),
        '\t' => KeyEvent::new("tab", raw),
        '\x7f' | '\x08' => KeyEvent::new("backspace", raw),
        ANSI_ESC_CHAR => KeyEvent::new("escape", raw),
        ' ' => KeyEvent::new("space", raw),
        '\x00' => KeyEvent {
            ctrl: true,
            ..KeyEvent::new("space", raw)
        },
        '\x01'..='\x1a' => {
            let letter = char::from(b'a' + (ch as u8 - 1));
            KeyEvent {
                ctrl: true,
                ..KeyEvent::new(letter.to_string(), raw)
            }
        }
        '\x1c'..='\x1f' => {
            let name = match ch {
                '\x1c' => "\\",
                '\x1d' => "]",
                '\x1e' => "^",
                _ => "_",
            };
            KeyEvent {
                ctrl: true,
                ..KeyEvent::new(name, raw)
            }
        }
        _ => text_key(&ch.to_string(), raw),
    };
    Some(it)
}

fn text_key(text: &str, raw: &str) -> KeyEvent {
    let mut chars = text.chars();
    let single = match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    };

    match single {
        Some(ch) if ch.is_ascii_uppercase() => KeyEvent {
            shift: true,
            sequence: ch.to_string(),
            ..KeyEvent::new(ch.to_ascii_lowercase().to_string(), raw)
        },
        Some(ch) if ch.is_ascii_digit() => KeyEvent {
            number: true,
            ..KeyEvent::new(ch.to_string(), raw)
        },
        _ => KeyEvent {
            sequence: text.to_string(),
            ..KeyEvent::new(text, raw)
        },
    }
}

fn named_key(name: &str, code: &str, raw: &str) -> KeyEvent {
    KeyEvent {
        code: Some(code.to_string()),
        source: KeySource::Raw,
        ..KeyEvent::new(name, raw)
    }
}

fn set_alt(key: &mut KeyEvent) {
    key.meta = true;
    key.option = true;
}

/// xterm modifier parameter: `value - 1` is a bit set.
fn apply_xterm_modifier(key: &mut KeyEvent, value: u32) {
    let bits = value.saturating_sub(1);
    key.shift |= bits & 1 != 0;
    if bits & 2 != 0 {
        set_alt(key);
    }
    key.ctrl |= bits & 4 != 0;
    key.meta |= bits & 8 != 0;
}

fn parse_number(it: &str) -> Option<u32> {
    if it.is_empty() || !it.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    it.parse().ok()
}

#[cfg(test)]
mod tests_plain_chars {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("\r", "return" ; "carriage return")]
    #[test_case("\n", "linefeed" ; "linefeed")]
    #[test_case("\t", "tab" ; "tab")]
    #[test_case("\x7f", "backspace" ; "del")]
    #[test_case("\x08", "backspace" ; "bs")]
    #[test_case("\x1b", "escape" ; "escape")]
    #[test_case(" ", "space" ; "space")]
    #[test_case("a", "a" ; "letter")]
    #[test_case("é", "é" ; "non ascii")]
    fn test_name(seq: &str, name: &str) {
        let key = parse_legacy_keypress(seq).unwrap();
        assert_eq!(key.name, name);
        assert_eq!(key.raw, seq);
        assert!(!key.ctrl && !key.meta && !key.shift);
    }

    #[test_case("\x01", "a" ; "ctrl a")]
    #[test_case("\x1a", "z" ; "ctrl z")]
    #[test_case("\x00", "space" ; "ctrl space")]
    #[test_case("\x1c", "\\" ; "ctrl backslash")]
    #[test_case("\x1f", "_" ; "ctrl underscore")]
    fn test_ctrl(seq: &str, name: &str) {
        let key = parse_legacy_keypress(seq).unwrap();
        assert_eq!(key.name, name);
        assert!(key.ctrl);
    }

    #[test]
    fn test_upper_case_is_shift() {
        let key = parse_legacy_keypress("A").unwrap();
        assert_eq!(key.name, "a");
        assert_eq!(key.sequence, "A");
        assert!(key.shift);
    }

    #[test]
    fn test_digit_sets_number() {
        let key = parse_legacy_keypress("7").unwrap();
        assert_eq!(key.name, "7");
        assert!(key.number);
    }

    #[test]
    fn test_grapheme_cluster_is_one_key() {
        let key = parse_legacy_keypress("👍🏽").unwrap();
        assert_eq!(key.name, "👍🏽");
        assert_eq!(key.sequence, "👍🏽");
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(parse_legacy_keypress(""), None);
    }
}


#[cfg(test)]
mod tests_function_keys {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("\x1bOP", "f1" ; "ss3 f1")]
    #[test_case("\x1b[11~", "f1" ; "csi f1")]
    #[test_case("\x1b[[A", "f1" ; "console f1")]
    #[test_case("\x1b[[E", "f5" ; "console f5")]
    #[test_case("\x1b[15~", "f5" ; "f5")]
    #[test_case("\x1b[24~", "f12" ; "f12")]
    #[test_case("\x1b[34~", "f20" ; "f20")]
    #[test_case("\x1b[A", "up" ; "up")]
    #[test_case("\x1bOD", "left" ; "ss3 left")]
    #[test_case("\x1b[H", "home" ; "home")]
    #[test_case("\x1b[1~", "home" ; "home tilde")]
    #[test_case("\x1b[4~", "end" ; "end tilde")]
    #[test_case("\x1b[2~", "insert" ; "insert")]
    #[test_case("\x1b[3~", "delete" ; "delete")]
    #[test_case("\x1b[5~", "pageup" ; "pageup")]
    #[test_case("\x1b[[6~", "pagedown" ; "console pagedown")]
    #[test_case("\x1bOM", "enter" ; "keypad enter")]
    #[test_case("\x1b[E", "clear" ; "clear")]
    fn test_name(seq: &str, name: &str) {
        let key = parse_legacy_keypress(seq).unwrap();
        assert_eq!(key.name, name);
        assert!(!key.shift && !key.ctrl && !key.meta, "{key:?}");
    }

    #[test]
    fn test_code_is_recorded() {
        let key = parse_legacy_keypress("\x1b[15~").unwrap();
        assert_eq!(key.code.as_deref(), Some("[15~"));
        assert_eq!(parse_legacy_keypress("\x1b[1;5A").unwrap().code.as_deref(), Some("[A"));
    }

    #[test]
    fn test_xterm_modifiers() {
        let key = parse_legacy_keypress("\x1b[1;5A").unwrap();
        assert_eq!(key.name, "up");
        assert!(key.ctrl && !key.shift);

        let key = parse_legacy_keypress("\x1b[1;2B").unwrap();
        assert!(key.shift);

        let key = parse_legacy_keypress("\x1b[3;3~").unwrap();
        assert_eq!(key.name, "delete");
        assert!(key.meta && key.option);

        let key = parse_legacy_keypress("\x1b[15;6~").unwrap();
        assert_eq!(key.name, "f5");
        assert!(key.ctrl && key.shift);
    }

    #[test]
    fn test_rxvt_variants() {
        let key = parse_legacy_keypress("\x1b[a").unwrap();
        assert_eq!(key.name, "up");
        assert!(key.shift);

        let key = parse_legacy_keypress("\x1bOd").unwrap();
        assert_eq!(key.name, "left");
        assert!(key.ctrl);

        let key = parse_legacy_keypress("\x1b[3$").unwrap();
        assert_eq!(key.name, "delete");
        assert!(key.shift && !key.ctrl);

        let key = parse_legacy_keypress("\x1b[5^").unwrap();
        assert_eq!(key.name, "pageup");
        assert!(key.ctrl && !key.shift);

        let key = parse_legacy_keypress("\x1b[2@").unwrap();
        assert!(key.ctrl && key.shift);
    }

    #[test]
    fn test_shift_tab() {
        let key = parse_legacy_keypress("\x1b[Z").unwrap();
        assert_eq!(key.name, "tab");
        assert!(key.shift);
    }

    #[test]
    fn test_modify_other_keys() {
        let key = parse_legacy_keypress("\x1b[27;5;13~").unwrap();
        assert_eq!(key.name, "return");
        assert!(key.ctrl);

        let key = parse_legacy_keypress("\x1b[27;2;65~").unwrap();
        assert_eq!(key.name, "a");
        assert!(key.shift);
    }

    #[test]
    fn test_unknown_is_none() {
        assert_eq!(parse_legacy_keypress("\x1b[99~"), None);
        assert_eq!(parse_legacy_keypress("\x1b[<0;1;1M"), None);
        assert_eq!(parse_legacy_keypress("\x1bxyz"), None);
        assert_eq!(parse_legacy_keypress("\x1b[2;5;7A"), None);
    }
}
