// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tunables for the input pipeline and for palette detection.

use std::time::Duration;

/// How long a partial escape sequence waits for more bytes before it is flushed as-is.
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(10);

/// How long a buffered emoji cluster waits for its next codepoint.
pub const DEFAULT_GRAPHEME_TIMEOUT: Duration = Duration::from_millis(10);

pub const ENV_SEQUENCE_TIMEOUT_MS: &str = "R3BL_TUI_INPUT_SEQUENCE_TIMEOUT_MS";
pub const ENV_GRAPHEME_TIMEOUT_MS: &str = "R3BL_TUI_INPUT_GRAPHEME_TIMEOUT_MS";
pub const ENV_KITTY: &str = "R3BL_TUI_INPUT_KITTY";

/// Which keyboard encoding the terminal was asked to use.
///
/// This is a fixed input to the parser and is never sniffed per sequence, because some
/// byte patterns mean different things in each encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum KeyboardProtocol {
    /// Classic xterm / rxvt / linux console encodings.
    #[default]
    #[strum(serialize = "legacy")]
    Legacy,
    /// The Kitty progressive enhancement protocol (`CSI u`). Falls back to
    /// [`Self::Legacy`] parsing for anything that isn't a Kitty sequence.
    #[strum(serialize = "kitty")]
    Kitty,
}

/// Configuration for [`InputDispatcher`] and the components it owns.
///
/// [`InputDispatcher`]: crate::InputDispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub sequence_timeout: Duration,
    pub grapheme_timeout: Duration,
    pub keyboard_protocol: KeyboardProtocol,
    /// Remove `ESC[...m` color codes from pasted text before it reaches listeners.
    pub strip_paste_ansi: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sequence_timeout: DEFAULT_SEQUENCE_TIMEOUT,
            grapheme_timeout: DEFAULT_GRAPHEME_TIMEOUT,
            keyboard_protocol: KeyboardProtocol::Legacy,
            strip_paste_ansi: true,
        }
    }
}

impl InputConfig {
    /// Defaults, overridden by any of [`ENV_SEQUENCE_TIMEOUT_MS`],
    /// [`ENV_GRAPHEME_TIMEOUT_MS`], and [`ENV_KITTY`] that are set and parse cleanly.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env()`] but reads values through `lookup`, so tests don't
    /// have to touch the process environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut it = Self::default();

        if let Some(ms) = lookup(ENV_SEQUENCE_TIMEOUT_MS).and_then(|v| parse_millis(ENV_SEQUENCE_TIMEOUT_MS, &v)) {
            it.sequence_timeout = ms;
        }
        if let Some(ms) = lookup(ENV_GRAPHEME_TIMEOUT_MS).and_then(|v| parse_millis(ENV_GRAPHEME_TIMEOUT_MS, &v)) {
            it.grapheme_timeout = ms;
        }
        if let Some(value) = lookup(ENV_KITTY) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => it.keyboard_protocol = KeyboardProtocol::Kitty,
                "0" | "false" | "no" => it.keyboard_protocol = KeyboardProtocol::Legacy,
                _ => tracing::debug!(message = "Ignoring unparseable env var", key = ENV_KITTY, value = %value),
            }
        }

        it
    }

    #[must_use]
    pub fn with_keyboard_protocol(mut self, protocol: KeyboardProtocol) -> Self {
        self.keyboard_protocol = protocol;
        self
    }

    #[must_use]
    pub fn with_sequence_timeout(mut self, timeout: Duration) -> Self {
        self.sequence_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_grapheme_timeout(mut self, timeout: Duration) -> Self {
        self.grapheme_timeout = timeout;
        self
    }
}

fn parse_millis(key: &str, value: &str) -> Option<Duration> {
    match value.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(error) => {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Ignoring unparseable env var", key, value, error = %error);
            None
        }
    }
}

/// Maximum number of palette slots that can be queried with OSC 4.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Options for [`TerminalPalette::detect()`].
///
/// [`TerminalPalette::detect()`]: crate::TerminalPalette::detect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteDetectOptions {
    /// Number of palette slots to query, starting at index 0. Clamped to
    /// [`MAX_PALETTE_SIZE`].
    pub size: usize,
    /// Overall budget for each collection loop.
    pub timeout: Duration,
    /// A collection loop finishes once this long has passed without a new reply.
    pub idle_timeout: Duration,
    /// How long to wait for the OSC 4 support probe.
    pub probe_timeout: Duration,
}

impl Default for PaletteDetectOptions {
    fn default() -> Self {
        Self {
            size: 16,
            timeout: Duration::from_millis(5000),
            idle_timeout: Duration::from_millis(150),
            probe_timeout: Duration::from_millis(300),
        }
    }
}

impl PaletteDetectOptions {
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn clamped_size(&self) -> usize { self.size.min(MAX_PALETTE_SIZE) }
}
