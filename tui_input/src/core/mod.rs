// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Infrastructure shared by every input layer: errors, configuration, logging, timer
//! deadlines, and the stream abstractions that the async parts of the crate consume.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod ansi_codes;
pub mod config;
pub mod error;
pub mod flush_deadline;
pub mod input_source;
pub mod log;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod test_fixtures;

// Re-export.
pub use ansi_codes::*;
pub use config::*;
pub use error::*;
pub use flush_deadline::*;
pub use input_source::*;
pub use log::*;
#[cfg(any(test, feature = "test-fixtures"))]
pub use test_fixtures::*;
