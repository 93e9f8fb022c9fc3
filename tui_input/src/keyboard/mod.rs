// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Key event parsing, for both legacy encodings and the Kitty keyboard protocol, plus
//! reassembly of emoji that Kitty splits into one event per code point.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod grapheme_reassembler;
pub mod key_event;
pub mod keypress;
pub mod kitty_functional_keys;
pub mod kitty_keyboard;
pub mod legacy_keypress;

// Re-export.
pub use grapheme_reassembler::*;
pub use key_event::*;
pub use keypress::*;
pub use kitty_functional_keys::*;
pub use kitty_keyboard::*;
pub use legacy_keypress::*;
