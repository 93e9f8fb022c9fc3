// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CapabilityResponseEvent, DispatchEvent, EventEmitter, InputEvent,
            InputEventKind, ListenerId, PasteEvent};
use crate::{DEBUG_TUI_INPUT_PARSING, GraphemeReassembler, InputChunk, InputConfig,
            InputSource, KeyEvent, KeyboardProtocol, MouseParser, StdinBuffer,
            StdinBufferOutput, earliest_deadline, is_capability_response,
            is_mouse_sequence, is_pixel_resolution_response, parse_keypress};
use regex::Regex;
use std::sync::LazyLock;
use tokio::{sync::broadcast::error::RecvError, time::Instant};

/// SGR color and attribute codes that some apps leave in copied text.
static PASTE_ANSI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("Invalid paste ANSI regex"));

/// Turns raw terminal input into [`InputEvent`]s and hands them to listeners.
///
/// Each complete unit from the [`StdinBuffer`] is routed like this:
///
/// | Unit                            | Emitted as                          |
/// |---------------------------------|-------------------------------------|
/// | bracketed paste payload         | [`InputEventKind::Paste`]           |
/// | capability or pixel size reply  | [`InputEventKind::CapabilityResponse`] |
/// | SGR or X10 mouse report         | [`InputEventKind::Mouse`]           |
/// | anything else                   | [`InputEventKind::KeyPress`] or [`InputEventKind::KeyRelease`] |
///
/// Key sequences that no parser recognizes are still emitted, as
/// [`KeyEvent::unnamed()`], so no input is silently dropped. In
/// [`KeyboardProtocol::Kitty`] mode keys pass through the [`GraphemeReassembler`] first,
/// and any non-key unit flushes a buffered cluster so events stay in arrival order.
///
/// Nothing here owns a timer. Either call [`run()`](Self::run), or poll
/// [`next_deadline()`](Self::next_deadline) yourself and call
/// [`handle_deadline()`](Self::handle_deadline) when it passes.
#[derive(Debug)]
pub struct InputDispatcher {
    config: InputConfig,
    stdin_buffer: StdinBuffer,
    mouse_parser: MouseParser,
    grapheme_reassembler: GraphemeReassembler,
    emitter: EventEmitter<InputEvent>,
    is_destroyed: bool,
}

impl Default for InputDispatcher {
    fn default() -> Self { Self::new(InputConfig::default()) }
}

impl InputDispatcher {
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self {
            stdin_buffer: StdinBuffer::new(config.sequence_timeout),
            mouse_parser: MouseParser::new(),
            grapheme_reassembler: GraphemeReassembler::new(config.grapheme_timeout),
            emitter: EventEmitter::new(),
            is_destroyed: false,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &InputConfig { &self.config }

    #[must_use]
    pub fn is_destroyed(&self) -> bool { self.is_destroyed }

    pub fn emitter_mut(&mut self) -> &mut EventEmitter<InputEvent> { &mut self.emitter }

    /// Shortcut for [`EventEmitter::on()`].
    pub fn on(
        &mut self,
        kind: InputEventKind,
        callback: impl FnMut(&mut InputEvent) -> miette::Result<()> + Send + 'static,
    ) -> ListenerId {
        self.emitter.on(kind, callback)
    }

    /// Shortcut for [`EventEmitter::on_internal()`].
    pub fn on_internal(
        &mut self,
        kind: InputEventKind,
        callback: impl FnMut(&mut InputEvent) -> miette::Result<()> + Send + 'static,
    ) -> ListenerId {
        self.emitter.on_internal(kind, callback)
    }

    /// Switches key parsing. A cluster buffered under the old protocol is emitted first.
    pub fn set_keyboard_protocol(&mut self, protocol: KeyboardProtocol) {
        if self.config.keyboard_protocol == protocol {
            return;
        }
        let pending = self.grapheme_reassembler.flush();
        self.emit_keys(pending);
        self.config.keyboard_protocol = protocol;
    }

    /// Feeds one chunk of raw input and emits every event it completes. Listener
    /// failures never reach the caller. Returns `false` only once destroyed.
    pub fn process_input(&mut self, chunk: impl Into<InputChunk>) -> bool {
        if self.is_destroyed {
            return false;
        }
        let output = self.stdin_buffer.process(chunk);
        self.route_all(output);
        true
    }

    /// Emits one [`InputEventKind::Paste`] event for a complete paste payload, with
    /// SGR codes removed when [`InputConfig::strip_paste_ansi`] is set. Returns `false`
    /// only once destroyed.
    pub fn process_paste(&mut self, content: &str) -> bool {
        if self.is_destroyed {
            return false;
        }
        let pending = self.grapheme_reassembler.flush();
        self.emit_keys(pending);

        let text = if self.config.strip_paste_ansi {
            PASTE_ANSI_REGEX.replace_all(content, "").into_owned()
        } else {
            content.to_string()
        };
        self.emit(InputEvent::Paste(PasteEvent::new(text)));
        true
    }

    /// The earliest pending flush, from either the sequence buffer or the emoji buffer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest_deadline(
            self.stdin_buffer.next_deadline(),
            self.grapheme_reassembler.next_deadline(),
        )
    }

    /// Fires whichever flushes are due at `now`.
    pub fn handle_deadline(&mut self, now: Instant) {
        if self.is_destroyed {
            return;
        }
        let output = self.stdin_buffer.handle_deadline(now);
        self.route_all(output);
        let keys = self.grapheme_reassembler.handle_deadline(now);
        self.emit_keys(keys);
    }

    /// Emits everything held back, as if every deadline had passed.
    pub fn flush(&mut self) {
        if self.is_destroyed {
            return;
        }
        let output = self.stdin_buffer.flush();
        self.route_all(output);
        let keys = self.grapheme_reassembler.flush();
        self.emit_keys(keys);
    }

    /// Drops buffered input and every listener. Later calls do nothing.
    pub fn destroy(&mut self) {
        self.stdin_buffer.destroy();
        self.grapheme_reassembler.clear();
        self.mouse_parser.reset();
        self.emitter.remove_all_listeners();
        self.is_destroyed = true;
    }

    /// Reads chunks from `source` until its stream closes, firing deadlines as they
    /// pass. Whatever is still buffered when the stream closes is flushed.
    pub async fn run<S>(&mut self, source: &S)
    where
        S: InputSource + ?Sized,
    {
        let mut receiver = source.subscribe();

        while !self.is_destroyed {
            let deadline = self.next_deadline();
            let sleep = async move {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;
                result = receiver.recv() => match result {
                    Ok(chunk) => {
                        self.process_input(chunk);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // % is Display, ? is Debug.
                        tracing::warn!(message = "Input dispatcher lagged, chunks dropped", skipped = %skipped);
                    }
                    Err(RecvError::Closed) => {
                        self.flush();
                        return;
                    }
                },
                () = sleep => self.handle_deadline(Instant::now()),
            }
        }
    }

    fn route_all(&mut self, output: Vec<StdinBufferOutput>) {
        for unit in output {
            match unit {
                StdinBufferOutput::Paste(content) => {
                    self.process_paste(&content);
                }
                StdinBufferOutput::Sequence(seq) => self.route_sequence(seq),
            }
        }
    }

    fn route_sequence(&mut self, seq: String) {
        if seq.is_empty() {
            return;
        }

        DEBUG_TUI_INPUT_PARSING.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Routing sequence", seq = ?seq);
        });

        if is_capability_response(&seq) || is_pixel_resolution_response(&seq) {
            let pending = self.grapheme_reassembler.flush();
            self.emit_keys(pending);
            self.emit(InputEvent::CapabilityResponse(CapabilityResponseEvent::new(seq)));
            return;
        }

        if is_mouse_sequence(&seq) {
            let pending = self.grapheme_reassembler.flush();
            self.emit_keys(pending);
            match self.mouse_parser.parse(&seq) {
                Some((mouse, _consumed)) => {
                    self.emit(InputEvent::Mouse(mouse));
                }
                None => {
                    // Mouse shaped but out of range, never a keystroke.
                    tracing::debug!(message = "Dropping unparseable mouse report", seq = ?seq);
                }
            }
            return;
        }

        let protocol = self.config.keyboard_protocol;
        let key = parse_keypress(&seq, protocol).unwrap_or_else(|| KeyEvent::unnamed(seq));
        let keys = match protocol {
            KeyboardProtocol::Kitty => self.grapheme_reassembler.push(key),
            KeyboardProtocol::Legacy => vec![key],
        };
        self.emit_keys(keys);
    }

    fn emit_keys(&mut self, keys: Vec<KeyEvent>) {
        for key in keys {
            self.emit(InputEvent::from_key(key));
        }
    }

    fn emit(&mut self, mut event: InputEvent) -> bool {
        let kind = event.kind();
        self.emitter.emit(kind, &mut event)
    }
}


#[cfg(test)]
mod tests_routing {
    use super::{test_fixtures::*, *};
    use crate::{MouseEventKind, Preventable};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keys_in_order() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        assert!(dispatcher.process_input("a\x1b[A\x1b[1;5C"));
        assert_eq!(key_names(&take(&log)), vec!["a", "up", "right"]);
    }

    #[test]
    fn test_mouse_is_not_a_key() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        dispatcher.process_input("\x1b[<0;10;5M\x1b[<0;10;5m");

        let events = take(&log);
        assert_eq!(kinds(&events), vec![InputEventKind::Mouse, InputEventKind::Mouse]);
        let InputEvent::Mouse(down) = &events[0] else { unreachable!() };
        assert_eq!((down.kind, down.x, down.y), (MouseEventKind::Down, 9, 4));
        let InputEvent::Mouse(up) = &events[1] else { unreachable!() };
        assert_eq!(up.kind, MouseEventKind::Up);
    }

    #[test]
    fn test_out_of_range_mouse_reports_never_reach_key_listeners() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        // X10 payload bytes below 32, then an SGR column that overflows u32.
        dispatcher.process_input("\x1b[M\x00\x05!\x1b[<0;99999999999;1Mq");

        let events = take(&log);
        assert_eq!(kinds(&events), vec![InputEventKind::Mouse, InputEventKind::KeyPress]);
        assert_eq!(key_names(&events), vec!["q"]);
    }

    #[test]
    fn test_capability_replies_are_not_keys() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        dispatcher.process_input("\x1b[?2026;2$y\x1b[4;600;800tq");

        let events = take(&log);
        assert_eq!(
            kinds(&events),
            vec![
                InputEventKind::CapabilityResponse,
                InputEventKind::CapabilityResponse,
                InputEventKind::KeyPress,
            ]
        );
        let InputEvent::CapabilityResponse(reply) = &events[0] else { unreachable!() };
        assert_eq!(reply.sequence, "\x1b[?2026;2$y");
    }

    #[test]
    fn test_unknown_sequence_is_unnamed_key() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        dispatcher.process_input("\x1b[99z");

        let events = take(&log);
        let key = events[0].as_key().unwrap();
        assert_eq!(key.name, "");
        assert_eq!(key.raw, "\x1b[99z");
    }

    #[test]
    fn test_empty_chunk_emits_nothing() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        assert!(dispatcher.process_input(""));
        assert_eq!(take(&log), vec![]);
    }

    #[test]
    fn test_kitty_release() {
        let (mut dispatcher, log) = recording_dispatcher(kitty_config());
        dispatcher.process_input("\x1b[97u\x1b[97;1:3u");
        assert_eq!(
            kinds(&take(&log)),
            vec![InputEventKind::KeyPress, InputEventKind::KeyRelease]
        );
    }

    #[test]
    fn test_internal_listener_sees_unprevented_keys_only() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        let internal = EventLog::default();
        {
            let internal = internal.clone();
            dispatcher.on_internal(InputEventKind::KeyPress, move |event| {
                internal.lock().unwrap().push(event.clone());
                Ok(())
            });
        }
        dispatcher.on(InputEventKind::KeyPress, |event| {
            if event.as_key().is_some_and(|it| it.name == "q") {
                event.prevent_default();
            }
            Ok(())
        });

        dispatcher.process_input("aq");
        dispatcher.process_input("q");
        dispatcher.process_input("b");
        assert_eq!(key_names(&take(&log)), vec!["a", "q", "q", "b"]);
        assert_eq!(key_names(&take(&internal)), vec!["a", "b"]);
    }

    #[test]
    fn test_failing_listener_does_not_reach_caller() {
        let (mut dispatcher, log) = recording_dispatcher(InputConfig::default());
        dispatcher.on(InputEventKind::KeyPress, |_| Err(miette::miette!("bad listener")));
        assert!(dispatcher.process_input("x"));
        assert_eq!(key_names(&take(&log)), vec!["x"]);
    }
}
