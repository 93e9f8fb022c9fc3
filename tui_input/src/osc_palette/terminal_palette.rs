// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words palette

//! Active color detection. See [`TerminalPalette`].

use super::{OscColorReply, OscResponseBuffer, TerminalColors, palette_queries, palette_query,
            special_queries, SPECIAL_COLOR_CODES};
use crate::{DEBUG_TUI_INPUT_PARSING, InputSource, PaletteDetectOptions, QueryWriter,
            TuiInputError};
use std::{collections::HashSet, time::Duration};
use tokio::{sync::broadcast::{self, error::RecvError},
            time::{Instant, sleep_until}};

/// Which reply a collection loop is still waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ReplyKey {
    Palette(u8),
    Special(u8),
}

impl ReplyKey {
    fn of(reply: &OscColorReply) -> Self {
        match reply {
            OscColorReply::Palette { index, .. } => Self::Palette(*index),
            OscColorReply::Special { code, .. } => Self::Special(*code),
        }
    }
}

/// Asks the terminal for its palette and special colors.
///
/// ```text
/// detect()
///   ├─ not a tty? ─────────────────────────────► all None, nothing written
///   ├─ probe: ESC]4;0;?  ── no reply in time ──► all None
///   ├─ write ESC]4;0;? ESC]4;1;? ... (one write)
///   ├─ write ESC]10;? ... ESC]19;?   (one write)
///   └─ collect both sets at once, each done when every key answered,
///      or idle timeout since the batch or its last reply, or overall timeout,
///      or the input stream closing
/// ```
///
/// Replies are read through a fresh [`InputSource::subscribe()`] per call, so other
/// consumers of the same input keep seeing every chunk, and nothing is left attached
/// once a call returns. Calls must not overlap, since both would read the same replies.
///
/// The writer is injectable: [`FnQueryWriter`](crate::FnQueryWriter) routes queries
/// through any function, which is how tests (and multiplexers) observe the bytes.
#[derive(Debug)]
pub struct TerminalPalette<I, W>
where
    I: InputSource,
    W: QueryWriter,
{
    input: I,
    writer: W,
    is_cleaned_up: bool,
}

impl<I, W> TerminalPalette<I, W>
where
    I: InputSource,
    W: QueryWriter,
{
    #[must_use]
    pub fn new(input: I, writer: W) -> Self {
        Self {
            input,
            writer,
            is_cleaned_up: false,
        }
    }

    /// Both ends are real terminals.
    #[must_use]
    pub fn is_tty(&self) -> bool { self.input.is_tty() && self.writer.is_tty() }

    /// Sends one OSC 4 query for slot 0 and waits up to `timeout` for the answer.
    ///
    /// Returns `false` right away, without writing, when either end is not a terminal.
    /// A failed write or a closed input stream also count as "not supported".
    pub async fn detect_osc_support(&mut self, timeout: Duration) -> bool {
        if self.is_cleaned_up || !self.is_tty() {
            return false;
        }

        let mut receiver = self.input.subscribe();
        if let Err(report) = self.writer.write_query(&palette_query(0)) {
            // % is Display, ? is Debug.
            tracing::warn!(message = "OSC 4 probe write failed", error = ?report);
            return false;
        }

        let mut buffer = OscResponseBuffer::new();
        let wait_for_reply = async {
            loop {
                match receiver.recv().await {
                    Ok(chunk) => {
                        let answered = buffer
                            .push(&chunk)
                            .iter()
                            .any(|it| matches!(it, OscColorReply::Palette { index: 0, .. }));
                        if answered {
                            return true;
                        }
                    }
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => return false,
                }
            }
        };

        let is_supported = tokio::time::timeout(timeout, wait_for_reply).await.unwrap_or(false);
        DEBUG_TUI_INPUT_PARSING.then(|| {
            tracing::debug!(message = "OSC 4 probe finished", is_supported = %is_supported);
        });
        is_supported
    }

    /// Queries `options.size` palette slots (at most 256) plus OSC 10 to 19.
    ///
    /// Slots the terminal never answers stay [`None`]. When the terminal fails the
    /// support probe, or either end is not a terminal, every entry is [`None`] and only
    /// the probe (or nothing) is written. If the input stream closes while replies are
    /// being collected, the replies received so far are kept.
    ///
    /// # Errors
    ///
    /// The writer rejects the palette or special color batch.
    pub async fn detect(
        &mut self,
        options: PaletteDetectOptions,
    ) -> miette::Result<TerminalColors> {
        let size = options.clamped_size();
        let mut colors = TerminalColors::empty(size);

        if !self.detect_osc_support(options.probe_timeout).await {
            return Ok(colors);
        }

        // Subscribe before writing so no reply can slip past.
        let palette_receiver = self.input.subscribe();
        let special_receiver = self.input.subscribe();
        self.writer.write_query(&palette_queries(size))?;
        self.writer.write_query(&special_queries())?;

        let palette_keys = (0..=u8::MAX).take(size).map(ReplyKey::Palette).collect();
        let special_keys = SPECIAL_COLOR_CODES.map(ReplyKey::Special).collect();
        let (palette, special) = tokio::join!(
            collect_replies(palette_receiver, palette_keys, options),
            collect_replies(special_receiver, special_keys, options),
        );

        for reply in palette.into_iter().chain(special) {
            colors.apply(reply);
        }

        DEBUG_TUI_INPUT_PARSING.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(
                message = "OSC color detection finished",
                answered = %colors.answered_count(),
                size = %size
            );
        });
        Ok(colors)
    }

    /// Stops this instance from sending any more queries. Later calls return the
    /// "unsupported" result immediately.
    pub fn cleanup(&mut self) { self.is_cleaned_up = true; }

    #[must_use]
    pub fn is_cleaned_up(&self) -> bool { self.is_cleaned_up }
}

/// Reads replies until every key in `remaining` is answered, the idle timeout passes
/// without a new reply, the overall timeout passes, or the stream closes. The idle
/// timer starts when the batch is written and restarts with every new reply.
async fn collect_replies(
    mut receiver: broadcast::Receiver<Vec<u8>>,
    mut remaining: HashSet<ReplyKey>,
    options: PaletteDetectOptions,
) -> Vec<OscColorReply> {
    let mut buffer = OscResponseBuffer::new();
    let mut replies = vec![];
    let overall_deadline = Instant::now() + options.timeout;
    let mut idle_deadline = Instant::now() + options.idle_timeout;

    while !remaining.is_empty() {
        tokio::select! {
            () = sleep_until(overall_deadline) => break,
            () = sleep_until(idle_deadline) => break,
            chunk = receiver.recv() => match chunk {
                Ok(chunk) => {
                    for reply in buffer.push(&chunk) {
                        if remaining.remove(&ReplyKey::of(&reply)) {
                            replies.push(reply);
                            idle_deadline = Instant::now() + options.idle_timeout;
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // % is Display, ? is Debug.
                    tracing::warn!(message = "OSC reply collection lagged", skipped = %skipped);
                }
                Err(RecvError::Closed) => {
                    // % is Display, ? is Debug.
                    tracing::debug!(
                        message = "OSC reply collection stopped early",
                        error = %TuiInputError::InputStreamClosed,
                        received = %replies.len(),
                        missing = %remaining.len()
                    );
                    break;
                }
            }
        }
    }

    replies
}

#[cfg(test)]
mod test_fixtures {
    use crate::{InputSource, InputSourceMock, QueryWriterMock};
    use std::sync::{Arc, Mutex};
    use tokio::sync::broadcast;

    /// Terminal input whose reader can be shut down by dropping the shared sender.
    #[derive(Debug, Clone)]
    pub struct ClosableSource(pub Arc<Mutex<Option<broadcast::Sender<Vec<u8>>>>>);

    impl Default for ClosableSource {
        fn default() -> Self {
            let (sender, _) = broadcast::channel(16);
            Self(Arc::new(Mutex::new(Some(sender))))
        }
    }

    impl InputSource for ClosableSource {
        fn is_tty(&self) -> bool { true }

        fn subscribe(&self) -> broadcast::Receiver<Vec<u8>> {
            match self.0.lock().unwrap().as_ref() {
                Some(sender) => sender.subscribe(),
                None => broadcast::channel(1).1,
            }
        }
    }

    /// Fake terminal that answers OSC 4 for slots below `answered_slots` and OSC 10 and
    /// 11, splitting each batch of answers into three chunks.
    pub fn answering_terminal(
        input: &InputSourceMock,
        answered_slots: usize,
    ) -> QueryWriterMock {
        QueryWriterMock::new_responding(input.sender(), move |query| {
            let mut answers = String::new();
            for part in query.split('\x07').filter(|it| !it.is_empty()) {
                let Some(body) = part.strip_prefix("\x1b]") else { continue };
                if let Some(index) = body.strip_prefix("4;").and_then(|it| it.strip_suffix(";?")) {
                    let Ok(index) = index.parse::<usize>() else { continue };
                    if index < answered_slots {
                        answers.push_str(&format!(
                            "\x1b]4;{index};rgb:{index:02X}{index:02X}/0000/ffff\x1b\\"
                        ));
                    }
                }
                match body {
                    "10;?" => answers.push_str("\x1b]10;rgb:cdcd/d6d6/f4f4\x07"),
                    "11;?" => answers.push_str("\x1b]11;#1E1E2E\x07"),
                    _ => {}
                }
            }
            let bytes = answers.into_bytes();
            let third = bytes.len() / 3;
            vec![
                bytes[..third].to_vec(),
                bytes[third..2 * third].to_vec(),
                bytes[2 * third..].to_vec(),
            ]
        })
    }
}
