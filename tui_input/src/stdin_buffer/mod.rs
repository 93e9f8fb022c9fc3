// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Sequence boundary detection: raw chunks in, complete terminal sequences and paste
//! payloads out.
//!
//! - [`Utf8ChunkDecoder`] turns raw stdin bytes into text without losing bytes that are
//!   split across reads or that aren't valid UTF-8.
//! - [`scan_sequence()`] decides where one sequence ends.
//! - [`StdinBuffer`] holds the incomplete tail between chunks and captures bracketed
//!   paste.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod sequence_scanner;
pub mod stdin_buffer_impl;
pub mod utf8_chunk_decoder;

// Re-export.
pub use sequence_scanner::*;
pub use stdin_buffer_impl::*;
pub use utf8_chunk_decoder::*;
