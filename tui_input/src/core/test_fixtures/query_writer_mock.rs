// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{QueryWriter, TuiInputError};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Decides what the fake terminal answers for one written query batch. Each returned
/// chunk is delivered to the input stream separately.
pub type ResponderFn = dyn FnMut(&str) -> Vec<Vec<u8>> + Send;

/// Fake terminal output. Records every written query and, when wired to an input
/// channel, replies to it immediately through a [`ResponderFn`].
///
/// Clones share the same record, so a test can keep one handle and give the other to
/// the code under test.
#[derive(Clone)]
pub struct QueryWriterMock {
    written: Arc<Mutex<Vec<String>>>,
    reply: Option<(broadcast::Sender<Vec<u8>>, Arc<Mutex<Box<ResponderFn>>>)>,
    is_tty: bool,
    fail_writes: bool,
}

impl std::fmt::Debug for QueryWriterMock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryWriterMock")
            .field("written", &self.get_writes())
            .field("is_tty", &self.is_tty)
            .finish_non_exhaustive()
    }
}

impl QueryWriterMock {
    /// A TTY writer that records queries and never answers.
    #[must_use]
    pub fn new_silent() -> Self {
        Self {
            written: Arc::default(),
            reply: None,
            is_tty: true,
            fail_writes: false,
        }
    }

    /// A TTY writer that answers each write via `responder`, sending the answers to
    /// `input` (usually [`InputSourceMock::sender()`]).
    ///
    /// [`InputSourceMock::sender()`]: crate::InputSourceMock::sender
    #[must_use]
    pub fn new_responding(
        input: broadcast::Sender<Vec<u8>>,
        responder: impl FnMut(&str) -> Vec<Vec<u8>> + Send + 'static,
    ) -> Self {
        let responder: Box<ResponderFn> = Box::new(responder);
        Self {
            reply: Some((input, Arc::new(Mutex::new(responder)))),
            ..Self::new_silent()
        }
    }

    #[must_use]
    pub fn new_piped() -> Self {
        Self {
            is_tty: false,
            ..Self::new_silent()
        }
    }

    /// Every write fails with a broken pipe.
    #[must_use]
    pub fn new_failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new_silent()
        }
    }

    #[must_use]
    pub fn get_writes(&self) -> Vec<String> {
        self.written.lock().map(|it| it.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn get_writes_joined(&self) -> String { self.get_writes().concat() }
}

impl QueryWriter for QueryWriterMock {
    fn is_tty(&self) -> bool { self.is_tty }

    fn write_query(&mut self, query: &str) -> miette::Result<()> {
        if self.fail_writes {
            return Err(TuiInputError::QueryWrite {
                query_name: "mock",
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "mock"),
            }
            .into());
        }

        if let Ok(mut written) = self.written.lock() {
            written.push(query.to_string());
        }

        if let Some((sender, responder)) = &self.reply {
            let replies = match responder.lock() {
                Ok(mut responder) => (**responder)(query),
                Err(_) => vec![],
            };
            for reply in replies {
                // No subscribers is fine, the reply is just lost like on a real tty.
                sender.send(reply).ok();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputSource, InputSourceMock};

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_responding_mock_echoes_into_input() {
        let input = InputSourceMock::new_tty();
        let mut rx = input.subscribe();
        let mut writer = QueryWriterMock::new_responding(input.sender(), |query| {
            vec![format!("echo:{query}").into_bytes()]
        });

        writer.write_query("ping").unwrap();

        assert_eq!(writer.get_writes(), vec!["ping".to_string()]);
        assert_eq!(rx.recv().await.unwrap(), b"echo:ping".to_vec());
    }

    #[test]
    fn test_failing_mock_returns_error() {
        let mut writer = QueryWriterMock::new_failing();
        assert!(writer.write_query("x").is_err());
        assert!(writer.get_writes().is_empty());
    }
}
