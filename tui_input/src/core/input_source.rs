// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The two stream seams of the crate: where input bytes come from ([`InputSource`]) and
//! where terminal queries go ([`QueryWriter`]).
//!
//! Input fans out over a [`tokio::sync::broadcast`] channel. Subscribing is how a
//! component attaches a listener to the stream and dropping the receiver detaches it,
//! so a temporary subscriber (like [`TerminalPalette::detect()`]) can never leak its
//! listener past the call that created it.
//!
//! [`TerminalPalette::detect()`]: crate::TerminalPalette::detect

use crate::TuiInputError;
use std::io::{IsTerminal, Write};
use tokio::{io::AsyncReadExt, sync::broadcast, task::JoinHandle};

/// Number of chunks buffered per subscriber before a slow one starts lagging.
pub const INPUT_CHANNEL_CAPACITY: usize = 1024;

/// Size of each read from stdin in [`spawn_stdin_reader()`].
pub const STDIN_READ_BUFFER_SIZE: usize = 256;

/// A byte stream that can be observed by several subscribers at once.
pub trait InputSource {
    /// Whether the stream is connected to a real terminal.
    fn is_tty(&self) -> bool;

    /// Attaches a new listener. Only chunks sent after this call are delivered.
    fn subscribe(&self) -> broadcast::Receiver<Vec<u8>>;
}

/// The sink for terminal query escape sequences.
pub trait QueryWriter {
    /// Whether the sink is connected to a real terminal.
    fn is_tty(&self) -> bool;

    /// Writes (and flushes) one batch of query bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream rejects the write.
    fn write_query(&mut self, query: &str) -> miette::Result<()>;
}

/// [`InputSource`] backed by a broadcast channel. Whoever reads the real stdin (see
/// [`spawn_stdin_reader()`]) pushes chunks in with [`send()`](Self::send).
#[derive(Debug, Clone)]
pub struct BroadcastInputSource {
    sender: broadcast::Sender<Vec<u8>>,
    is_tty: bool,
}

impl BroadcastInputSource {
    #[must_use]
    pub fn new(is_tty: bool) -> Self {
        let (sender, _) = broadcast::channel(INPUT_CHANNEL_CAPACITY);
        Self { sender, is_tty }
    }

    /// Source whose TTY flag reflects the process's real stdin.
    #[must_use]
    pub fn for_stdin() -> Self { Self::new(std::io::stdin().is_terminal()) }

    /// Delivers `chunk` to every current subscriber. Returns how many received it (zero
    /// when nobody is listening, which is not an error).
    pub fn send(&self, chunk: impl Into<Vec<u8>>) -> usize {
        self.sender.send(chunk.into()).unwrap_or(0)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize { self.sender.receiver_count() }

    #[must_use]
    pub fn sender(&self) -> broadcast::Sender<Vec<u8>> { self.sender.clone() }
}

impl InputSource for BroadcastInputSource {
    fn is_tty(&self) -> bool { self.is_tty }

    fn subscribe(&self) -> broadcast::Receiver<Vec<u8>> { self.sender.subscribe() }
}

/// Reads the process's stdin on a tokio task and forwards every chunk to `source`.
/// The task ends at EOF or on the first read error (which is logged).
#[must_use]
pub fn spawn_stdin_reader(source: BroadcastInputSource) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buffer = [0_u8; STDIN_READ_BUFFER_SIZE];
        loop {
            match stdin.read(&mut buffer).await {
                Ok(0) => break,
                Ok(n) => {
                    source.send(&buffer[..n]);
                }
                Err(error) => {
                    // % is Display, ? is Debug.
                    tracing::error!(message = "stdin read failed", error = %error);
                    break;
                }
            }
        }
    })
}

/// [`QueryWriter`] that writes to the process's stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutQueryWriter;

impl QueryWriter for StdoutQueryWriter {
    fn is_tty(&self) -> bool { std::io::stdout().is_terminal() }

    fn write_query(&mut self, query: &str) -> miette::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(query.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| TuiInputError::QueryWrite { query_name: "stdout", source }.into())
    }
}

/// [`QueryWriter`] that hands every query to a caller supplied function. Use this to
/// observe or transform outgoing bytes, or to route them over another transport.
pub struct FnQueryWriter<F>
where
    F: FnMut(&str) -> miette::Result<()>,
{
    write_fn: F,
    is_tty: bool,
}

impl<F> FnQueryWriter<F>
where
    F: FnMut(&str) -> miette::Result<()>,
{
    #[must_use]
    pub fn new(is_tty: bool, write_fn: F) -> Self { Self { write_fn, is_tty } }
}

impl<F> std::fmt::Debug for FnQueryWriter<F>
where
    F: FnMut(&str) -> miette::Result<()>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnQueryWriter")
            .field("is_tty", &self.is_tty)
            .finish_non_exhaustive()
    }
}

impl<F> QueryWriter for FnQueryWriter<F>
where
    F: FnMut(&str) -> miette::Result<()>,
{
    fn is_tty(&self) -> bool { self.is_tty }

    fn write_query(&mut self, query: &str) -> miette::Result<()> { (self.write_fn)(query) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_broadcast_source_delivers_to_all_subscribers() {
        let source = BroadcastInputSource::new(true);
        assert_eq!(source.send("dropped"), 0);

        let mut rx_1 = source.subscribe();
        let mut rx_2 = source.subscribe();
        assert_eq!(source.subscriber_count(), 2);
        assert_eq!(source.send("a"), 2);

        assert_eq!(rx_1.recv().await.unwrap(), b"a".to_vec());
        assert_eq!(rx_2.recv().await.unwrap(), b"a".to_vec());

        drop(rx_1);
        assert_eq!(source.subscriber_count(), 1);
    }

    #[test]
    fn test_fn_query_writer_forwards_bytes() {
        let mut captured = String::new();
        {
            let mut writer = FnQueryWriter::new(true, |query: &str| {
                captured.push_str(query);
                Ok(())
            });
            assert!(writer.is_tty());
            writer.write_query("\x1b]4;0;?\x07").unwrap();
        }
        assert_eq!(captured, "\x1b]4;0;?\x07");
    }
}
