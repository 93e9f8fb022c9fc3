// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mouse reports, in the SGR (`ESC [ < b ; x ; y M`) and X10 (`ESC [ M bxy`) encodings.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod mouse_event;
pub mod mouse_parser;

// Re-export.
pub use mouse_event::*;
pub use mouse_parser::*;
