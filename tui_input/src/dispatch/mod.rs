// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The public face of the crate: [`InputDispatcher`] turns raw chunks into typed
//! [`InputEvent`]s and hands them to listeners registered on an [`EventEmitter`].

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod dispatch_event;
pub mod event_emitter;
pub mod input_dispatcher;
pub mod input_event;

// Re-export.
pub use dispatch_event::*;
pub use event_emitter::*;
pub use input_dispatcher::*;
pub use input_event::*;
