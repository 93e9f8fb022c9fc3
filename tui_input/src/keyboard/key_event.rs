// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Preventable;

/// Press or release. A Kitty repeat is a press with [`KeyEvent::repeated`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum KeyEventType {
    #[default]
    #[strum(serialize = "press")]
    Press,
    #[strum(serialize = "release")]
    Release,
}

/// Which parser produced a [`KeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum KeySource {
    /// Legacy xterm / rxvt / linux console encodings, or plain text.
    #[default]
    #[strum(serialize = "raw")]
    Raw,
    /// The Kitty keyboard protocol.
    #[strum(serialize = "kitty")]
    Kitty,
}

/// One key press, repeat, or release.
///
/// - `name` is the logical key: `"a"`, `"up"`, `"f5"`, `"return"`, or a whole grapheme
///   cluster for emoji. Empty when the sequence was not recognized.
/// - `sequence` is the text the key would insert (so `"A"` for shift+a).
/// - `raw` is exactly what came over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub name: String,
    pub sequence: String,
    pub raw: String,
    pub ctrl: bool,
    /// Alt, or the legacy `ESC` prefix.
    pub meta: bool,
    pub shift: bool,
    /// Alt / option. Set together with [`Self::meta`].
    pub option: bool,
    pub super_key: bool,
    pub hyper: bool,
    pub caps_lock: bool,
    pub num_lock: bool,
    /// The key is a digit.
    pub number: bool,
    pub event_type: KeyEventType,
    pub repeated: bool,
    /// Codepoint of the key in the base (US) layout, when the terminal reports it.
    pub base_code: Option<u32>,
    /// Codepoint with shift applied, when the terminal reports it.
    pub shifted_code: Option<u32>,
    /// The identifying part of a legacy escape sequence, eg: `"[A"` or `"[15~"`.
    pub code: Option<String>,
    pub source: KeySource,
    pub(crate) default_prevented: bool,
}

impl KeyEvent {
    #[must_use]
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            name: name.into(),
            sequence: raw.clone(),
            raw,
            ..Default::default()
        }
    }

    /// Best-effort event for input no parser recognized, so it still reaches listeners.
    #[must_use]
    pub fn unnamed(raw: impl Into<String>) -> Self { Self::new("", raw) }

    #[must_use]
    pub fn is_press(&self) -> bool { self.event_type == KeyEventType::Press }

    #[must_use]
    pub fn is_release(&self) -> bool { self.event_type == KeyEventType::Release }

    /// `ctrl+shift+a` style description, handy for logs and keybinding tables.
    #[must_use]
    pub fn to_binding_string(&self) -> String {
        let mut parts: Vec<&str> = vec![];
        if self.ctrl {
            parts.push("ctrl");
        }
        if self.option {
            parts.push("alt");
        } else if self.meta {
            parts.push("meta");
        }
        if self.shift {
            parts.push("shift");
        }
        if self.super_key {
            parts.push("super");
        }
        if self.hyper {
            parts.push("hyper");
        }
        parts.push(&self.name);
        parts.join("+")
    }

    /// ORs every modifier flag of `other` into `self`.
    pub fn merge_modifiers(&mut self, other: &KeyEvent) {
        self.ctrl |= other.ctrl;
        self.meta |= other.meta;
        self.shift |= other.shift;
        self.option |= other.option;
        self.super_key |= other.super_key;
        self.hyper |= other.hyper;
        self.caps_lock |= other.caps_lock;
        self.num_lock |= other.num_lock;
    }
}

impl Preventable for KeyEvent {
    fn prevent_default(&mut self) { self.default_prevented = true; }

    fn is_default_prevented(&self) -> bool { self.default_prevented }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_copies_raw_into_sequence() {
        let key = KeyEvent::new("up", "\x1b[A");
        assert_eq!(key.sequence, "\x1b[A");
        assert_eq!(key.event_type, KeyEventType::Press);
        assert_eq!(key.source, KeySource::Raw);
        assert!(!key.is_default_prevented());
    }

    #[test]
    fn test_binding_string() {
        let key = KeyEvent {
            ctrl: true,
            shift: true,
            meta: true,
            option: true,
            ..KeyEvent::new("a", "\x1b[97;8u")
        };
        assert_eq!(key.to_binding_string(), "ctrl+alt+shift+a");
        assert_eq!(KeySource::Kitty.to_string(), "kitty");
        assert_eq!(KeyEventType::Release.to_string(), "release");
    }

    #[test]
    fn test_merge_modifiers_is_or() {
        let mut key = KeyEvent::new("x", "x");
        key.merge_modifiers(&KeyEvent { ctrl: true, ..KeyEvent::default() });
        key.merge_modifiers(&KeyEvent { shift: true, ..KeyEvent::default() });
        assert!(key.ctrl && key.shift && !key.meta);
    }

    #[test]
    fn test_prevent_default() {
        let mut key = KeyEvent::unnamed("\x1b[99~");
        key.prevent_default();
        assert!(key.is_default_prevented());
    }
}
