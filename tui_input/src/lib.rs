// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words decrpm xtversion keycap

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! # Terminal input stream framing and classification
//!
//! Terminals report keystrokes, mouse activity, pasted text, and replies to capability
//! probes over a single byte stream. Those bytes arrive in chunks of arbitrary size, and
//! several grammars (legacy xterm keys, the Kitty keyboard protocol, SGR and X10 mouse
//! reports, OSC color replies, DECRPM reports) share prefixes. This crate turns that
//! stream into typed events.
//!
//! ```text
//! raw chunks ──► StdinBuffer ──► complete sequences ─┬─► capability classifier
//!                    │                                ├─► MouseParser
//!                    └─► paste payloads               └─► key parser ─► GraphemeReassembler
//!                                                                        │
//!                          InputDispatcher ◄─────────────────────────────┘
//!                                │
//!                    regular listeners ─► internal listeners
//! ```
//!
//! # Layers
//!
//! 1. [`StdinBuffer`] splits chunks into complete sequences, holds ambiguous partial
//!    input until more data arrives or a [`FlushDeadline`] expires, and captures
//!    bracketed paste payloads.
//! 2. Pure classifiers: [`is_capability_response()`], [`parse_keypress()`],
//!    [`MouseParser::parse()`], and the OSC color reply scanner in
//!    [`OscResponseBuffer`].
//! 3. [`InputDispatcher`] glues the two together and fans events out through an
//!    [`EventEmitter`] that runs application listeners before internal ones.
//!
//! [`TerminalPalette`] is the one async component: it writes OSC 4 and OSC 10..19
//! queries and collects the replies from a shared [`InputSource`].
//!
//! # Timers
//!
//! Nothing in this crate spawns a task or owns a timer. Components that need bounded
//! latency expose `next_deadline()` and `handle_deadline(now)`, and
//! [`InputDispatcher::run()`] drives them from a `tokio::select!` loop. Tests drive the
//! same transitions with a paused tokio clock.

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

// Enable clippy::unwrap_in_result for production code only.
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod capability;
pub mod core;
pub mod dispatch;
pub mod keyboard;
pub mod mouse;
pub mod osc_palette;
pub mod stdin_buffer;

// Re-export.
pub use capability::*;
pub use core::*;
pub use dispatch::*;
pub use keyboard::*;
pub use mouse::*;
pub use osc_palette::*;
pub use stdin_buffer::*;
