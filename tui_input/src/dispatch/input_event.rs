// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DispatchEvent, Preventable};
use crate::{KeyEvent, MouseEvent};

/// The event names listeners register for. Parses from and displays as the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display,
         strum_macros::IntoStaticStr, strum_macros::EnumIter, strum_macros::EnumString)]
pub enum InputEventKind {
    #[strum(serialize = "keypress")]
    KeyPress,
    #[strum(serialize = "keyrelease")]
    KeyRelease,
    #[strum(serialize = "paste")]
    Paste,
    #[strum(serialize = "mouse")]
    Mouse,
    #[strum(serialize = "capability")]
    CapabilityResponse,
}

/// One complete bracketed paste, markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    pub text: String,
    default_prevented: bool,
}

impl PasteEvent {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            default_prevented: false,
        }
    }
}

impl Preventable for PasteEvent {
    fn prevent_default(&mut self) { self.default_prevented = true; }

    fn is_default_prevented(&self) -> bool { self.default_prevented }
}

/// A terminal reply to a capability query, eg: DECRPM or XTVersion. Listeners can
/// decode it with the parsers in [`crate::capability`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityResponseEvent {
    pub sequence: String,
    default_prevented: bool,
}

impl CapabilityResponseEvent {
    #[must_use]
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            default_prevented: false,
        }
    }
}

impl Preventable for CapabilityResponseEvent {
    fn prevent_default(&mut self) { self.default_prevented = true; }

    fn is_default_prevented(&self) -> bool { self.default_prevented }
}

/// Everything [`InputDispatcher`](crate::InputDispatcher) emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    Paste(PasteEvent),
    Mouse(MouseEvent),
    CapabilityResponse(CapabilityResponseEvent),
}

impl InputEvent {
    /// Wraps `key` as [`Self::KeyPress`] or [`Self::KeyRelease`].
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Self {
        if key.is_release() {
            Self::KeyRelease(key)
        } else {
            Self::KeyPress(key)
        }
    }

    #[must_use]
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::KeyPress(key) | Self::KeyRelease(key) => Some(key),
            _ => None,
        }
    }
}

impl Preventable for InputEvent {
    fn prevent_default(&mut self) {
        match self {
            Self::KeyPress(it) | Self::KeyRelease(it) => it.prevent_default(),
            Self::Paste(it) => it.prevent_default(),
            Self::Mouse(it) => it.prevent_default(),
            Self::CapabilityResponse(it) => it.prevent_default(),
        }
    }

    fn is_default_prevented(&self) -> bool {
        match self {
            Self::KeyPress(it) | Self::KeyRelease(it) => it.is_default_prevented(),
            Self::Paste(it) => it.is_default_prevented(),
            Self::Mouse(it) => it.is_default_prevented(),
            Self::CapabilityResponse(it) => it.is_default_prevented(),
        }
    }
}

impl DispatchEvent for InputEvent {
    type Kind = InputEventKind;

    fn kind(&self) -> InputEventKind {
        match self {
            Self::KeyPress(_) => InputEventKind::KeyPress,
            Self::KeyRelease(_) => InputEventKind::KeyRelease,
            Self::Paste(_) => InputEventKind::Paste,
            Self::Mouse(_) => InputEventKind::Mouse,
            Self::CapabilityResponse(_) => InputEventKind::CapabilityResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyEventType, MouseEventKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_key_picks_kind() {
        let press = InputEvent::from_key(KeyEvent::new("a", "a"));
        assert_eq!(press.kind(), InputEventKind::KeyPress);

        let release = InputEvent::from_key(KeyEvent {
            event_type: KeyEventType::Release,
            ..KeyEvent::new("a", "\x1b[97;1:3u")
        });
        assert_eq!(release.kind(), InputEventKind::KeyRelease);
        assert_eq!(release.as_key().map(|it| it.name.as_str()), Some("a"));
    }

    #[test]
    fn test_prevent_default_reaches_inner_event() {
        let mut event = InputEvent::Mouse(MouseEvent::new(MouseEventKind::Down, 0, 1, 1));
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
        let InputEvent::Mouse(mouse) = event else { unreachable!() };
        assert!(mouse.is_default_prevented());
    }

    #[test]
    fn test_kind_names() {
        let name: &'static str = InputEventKind::CapabilityResponse.into();
        assert_eq!(name, "capability");
        assert_eq!(InputEventKind::KeyPress.to_string(), "keypress");
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!("keyrelease".parse::<InputEventKind>(), Ok(InputEventKind::KeyRelease));
        assert_eq!("mouse".parse::<InputEventKind>(), Ok(InputEventKind::Mouse));
        assert_eq!(
            "resize".parse::<InputEventKind>(),
            Err(strum::ParseError::VariantNotFound)
        );
    }
}
