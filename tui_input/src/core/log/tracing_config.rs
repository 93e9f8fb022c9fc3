// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;
use tracing_core::LevelFilter;

pub const ENV_LOG_FILE: &str = "R3BL_TUI_INPUT_LOG_FILE";
pub const ENV_LOG_LEVEL: &str = "R3BL_TUI_INPUT_LOG_LEVEL";

/// File name used under [`std::env::temp_dir()`] when no log path is given.
pub const DEFAULT_LOG_FILE_NAME: &str = "r3bl_tui_input.log";

/// Where tracing output goes and at which level.
///
/// Once an app puts the terminal in raw mode and starts reading input, anything written
/// to the display garbles the screen and can even be read back as input. So the
/// constructors default to a log file, and display output is opt in.
///
/// Install it with [`TracingConfig::install_global()`] in a binary, or
/// [`TracingConfig::install_thread_local()`] in a test.
///
/// [`TracingConfig::install_global()`]: crate::TracingConfig::install_global
/// [`TracingConfig::install_thread_local()`]: crate::TracingConfig::install_thread_local
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

/// `String` payloads are the log file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl WriterConfig {
    #[must_use]
    pub fn display(&self) -> Option<DisplayPreference> {
        match self {
            Self::Display(it) | Self::DisplayAndFile(it, _) => Some(*it),
            Self::None | Self::File(_) => None,
        }
    }

    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::File(it) | Self::DisplayAndFile(_, it) => Some(it),
            Self::None | Self::Display(_) => None,
        }
    }
}

impl TracingConfig {
    /// Debug level output to `path`, or to [`default_log_file_path()`].
    #[must_use]
    pub fn new_file(path: Option<String>) -> Self {
        Self {
            writer_config: WriterConfig::File(path.unwrap_or_else(default_log_file_path)),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn new_file_and_display(
        path: Option<String>,
        preferred_display: DisplayPreference,
    ) -> Self {
        Self {
            writer_config: WriterConfig::DisplayAndFile(
                preferred_display,
                path.unwrap_or_else(default_log_file_path),
            ),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    /// Logging off unless [`ENV_LOG_FILE`] is set. [`ENV_LOG_LEVEL`] takes the usual
    /// names (`error` .. `trace`, `off`) and defaults to `debug`.
    #[must_use]
    pub fn from_env() -> Self { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Same as [`Self::from_env()`] but reads values through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level_filter = lookup(ENV_LOG_LEVEL)
            .and_then(|value| match value.trim().parse::<LevelFilter>() {
                Ok(it) => Some(it),
                Err(error) => {
                    // % is Display, ? is Debug.
                    tracing::debug!(message = "Ignoring unparseable env var", key = ENV_LOG_LEVEL, value = %value, error = %error);
                    None
                }
            })
            .unwrap_or(LevelFilter::DEBUG);

        let writer_config = match lookup(ENV_LOG_FILE) {
            Some(path) if !path.trim().is_empty() => WriterConfig::File(path.trim().to_string()),
            _ => WriterConfig::None,
        };

        Self { writer_config, level_filter }
    }
}

/// `<temp dir>/r3bl_tui_input.log`.
#[must_use]
pub fn default_log_file_path() -> String {
    let path: PathBuf = std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME);
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_is_the_default_sink() {
        let config = TracingConfig::new_file(None);
        assert_eq!(config.writer_config.file(), Some(default_log_file_path().as_str()));
        assert_eq!(config.writer_config.display(), None);
        assert!(default_log_file_path().ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_from_lookup() {
        let config = TracingConfig::from_lookup(|key| match key {
            ENV_LOG_FILE => Some("/tmp/input.log".to_string()),
            ENV_LOG_LEVEL => Some("trace".to_string()),
            _ => None,
        });
        assert_eq!(config.writer_config, WriterConfig::File("/tmp/input.log".into()));
        assert_eq!(config.level_filter, LevelFilter::TRACE);
    }

    #[test]
    fn test_from_lookup_defaults_to_off() {
        let config = TracingConfig::from_lookup(|key| match key {
            ENV_LOG_LEVEL => Some("loud".to_string()),
            _ => None,
        });
        assert_eq!(config.writer_config, WriterConfig::None);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
    }
}
