// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fakes for the stream seams in [`crate::core::input_source`], usable from unit tests
//! here and from downstream crates that want to test without a real TTY.

// Attach sources.
pub mod input_source_mock;
pub mod query_writer_mock;

// Re-export.
pub use input_source_mock::*;
pub use query_writer_mock::*;
