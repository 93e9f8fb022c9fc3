// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug, hash::Hash};

/// An event whose default handling can be cancelled by a listener.
///
/// Once set the flag stays set for the rest of that dispatch pass, and
/// [`EventEmitter::emit()`](crate::EventEmitter::emit) stops calling listeners.
pub trait Preventable {
    fn prevent_default(&mut self);

    fn is_default_prevented(&self) -> bool;
}

/// An event that can go through an [`EventEmitter`](crate::EventEmitter).
pub trait DispatchEvent: Preventable {
    /// The "event name" that listeners subscribe to.
    type Kind: Copy + Eq + Hash + Debug + Into<&'static str>;

    fn kind(&self) -> Self::Kind;
}
