// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::OscColorReply;

/// Result of [`TerminalPalette::detect()`]. Every color is lower case `#rrggbb`, or
/// [`None`] when the terminal did not answer for it.
///
/// [`TerminalPalette::detect()`]: crate::TerminalPalette::detect
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminalColors {
    /// One entry per queried slot, so its length is the requested size.
    pub palette: Vec<Option<String>>,
    /// OSC 10.
    pub default_foreground: Option<String>,
    /// OSC 11.
    pub default_background: Option<String>,
    /// OSC 12.
    pub cursor_color: Option<String>,
    /// OSC 13.
    pub mouse_foreground: Option<String>,
    /// OSC 14.
    pub mouse_background: Option<String>,
    /// OSC 15.
    pub tek_foreground: Option<String>,
    /// OSC 16.
    pub tek_background: Option<String>,
    /// OSC 17.
    pub highlight_background: Option<String>,
    /// OSC 18.
    pub tek_cursor: Option<String>,
    /// OSC 19.
    pub highlight_foreground: Option<String>,
}

impl TerminalColors {
    /// All unanswered, with `size` palette slots.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        Self {
            palette: vec![None; size],
            ..Default::default()
        }
    }

    /// Records one reply. Palette indices past the requested size are ignored.
    pub fn apply(&mut self, reply: OscColorReply) {
        match reply {
            OscColorReply::Palette { index, color } => {
                if let Some(slot) = self.palette.get_mut(usize::from(index)) {
                    *slot = Some(color);
                }
            }
            OscColorReply::Special { code, color } => {
                if let Some(slot) = self.special_mut(code) {
                    *slot = Some(color);
                }
            }
        }
    }

    /// The special color for OSC `code` (10 to 19).
    #[must_use]
    pub fn special(&self, code: u8) -> Option<&str> {
        let it = match code {
            10 => &self.default_foreground,
            11 => &self.default_background,
            12 => &self.cursor_color,
            13 => &self.mouse_foreground,
            14 => &self.mouse_background,
            15 => &self.tek_foreground,
            16 => &self.tek_background,
            17 => &self.highlight_background,
            18 => &self.tek_cursor,
            19 => &self.highlight_foreground,
            _ => return None,
        };
        it.as_deref()
    }

    fn special_mut(&mut self, code: u8) -> Option<&mut Option<String>> {
        let it = match code {
            10 => &mut self.default_foreground,
            11 => &mut self.default_background,
            12 => &mut self.cursor_color,
            13 => &mut self.mouse_foreground,
            14 => &mut self.mouse_background,
            15 => &mut self.tek_foreground,
            16 => &mut self.tek_background,
            17 => &mut self.highlight_background,
            18 => &mut self.tek_cursor,
            19 => &mut self.highlight_foreground,
            _ => return None,
        };
        Some(it)
    }

    /// Number of palette slots and special colors that got an answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        let palette = self.palette.iter().flatten().count();
        let special = (10..=19).filter(|&code| self.special(code).is_some()).count();
        palette + special
    }
}
