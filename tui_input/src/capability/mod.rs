// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Classifier for terminal replies to capability queries.

// Attach sources.
pub mod capability_response;

// Re-export.
pub use capability_response::*;
