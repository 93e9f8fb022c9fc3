// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Error types for the fallible edges of the crate.
//!
//! Parsing never fails with an error: classifiers return [`Option`] or [`bool`] and the
//! caller picks a fallback. Errors only come from I/O (writing queries to the terminal)
//! and from listeners that the application registers with an [`EventEmitter`].
//!
//! [`EventEmitter`]: crate::EventEmitter

/// Failures surfaced by [`TerminalPalette`] and by listener dispatch.
///
/// Each variant carries a miette [diagnostic code] so that a [`miette::Report`] built
/// from it renders with a stable identifier and a hint.
///
/// [`TerminalPalette`]: crate::TerminalPalette
/// [diagnostic code]: miette::Diagnostic::code
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TuiInputError {
    /// Writing an OSC query to the output stream failed.
    #[error("Failed to write terminal query ({query_name})")]
    #[diagnostic(
        code(r3bl_tui_input::osc::query_write),
        help("Make sure the output stream is still open and is a terminal.")
    )]
    QueryWrite {
        /// The sink that rejected the write, eg: `"stdout"`.
        query_name: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The input broadcast channel closed while replies were still being collected.
    #[error("Input stream closed while waiting for terminal replies")]
    #[diagnostic(
        code(r3bl_tui_input::osc::input_stream_closed),
        help("The reader that feeds the input source shut down before detection finished.")
    )]
    InputStreamClosed,

    /// A listener returned an error (or panicked) while handling an event. This is
    /// only ever logged; dispatch carries on with the next listener.
    #[error("Listener for `{event_kind}` failed: {message}")]
    #[diagnostic(code(r3bl_tui_input::dispatch::listener_failed))]
    ListenerFailed {
        event_kind: &'static str,
        message: String,
    },
}
