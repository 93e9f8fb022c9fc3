// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Asking the terminal for its colors with OSC 4 (palette slots) and OSC 10..19
//! (foreground, background, cursor, and friends), and making sense of the replies.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod color_value;
pub mod osc_query;
pub mod osc_response_buffer;
pub mod terminal_colors;
pub mod terminal_palette;

// Re-export.
pub use color_value::*;
pub use osc_query::*;
pub use osc_response_buffer::*;
pub use terminal_colors::*;
pub use terminal_palette::*;
