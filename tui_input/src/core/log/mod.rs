// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup for binaries and tests that use this crate. The library itself only
//! emits `tracing` events; nothing here is installed implicitly.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;

/// Set to `true` to log every sequence the stdin buffer emits and every event the
/// dispatcher routes. Very noisy.
pub const DEBUG_TUI_INPUT_PARSING: bool = false;
