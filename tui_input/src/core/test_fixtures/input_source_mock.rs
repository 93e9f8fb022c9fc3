// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BroadcastInputSource, InputSource};
use std::time::Duration;
use tokio::sync::broadcast;

/// Fake terminal input. Tests push chunks with [`send()`](Self::send) or schedule them
/// with [`send_after()`](Self::send_after).
#[derive(Debug, Clone)]
pub struct InputSourceMock {
    inner: BroadcastInputSource,
}

impl InputSourceMock {
    #[must_use]
    pub fn new_tty() -> Self { Self { inner: BroadcastInputSource::new(true) } }

    #[must_use]
    pub fn new_piped() -> Self { Self { inner: BroadcastInputSource::new(false) } }

    pub fn send(&self, chunk: impl Into<Vec<u8>>) -> usize { self.inner.send(chunk) }

    /// Sends each chunk after `delay`, in order, from a spawned task.
    pub fn send_after(&self, delay: Duration, chunks: Vec<Vec<u8>>) {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            for chunk in chunks {
                inner.send(chunk);
            }
        });
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize { self.inner.subscriber_count() }

    #[must_use]
    pub fn sender(&self) -> broadcast::Sender<Vec<u8>> { self.inner.sender() }
}

impl InputSource for InputSourceMock {
    fn is_tty(&self) -> bool { self.inner.is_tty() }

    fn subscribe(&self) -> broadcast::Receiver<Vec<u8>> { self.inner.subscribe() }
}
