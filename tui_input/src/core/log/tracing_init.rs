// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, rolling_file_appender_impl};
use miette::IntoDiagnostic;
use tracing_subscriber::{Layer, Registry, fmt::writer::BoxMakeWriter, layer::SubscriberExt,
                         util::SubscriberInitExt};

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Builds the layers `tracing_config` describes without installing them: the level
/// filter first, then one `fmt` layer per sink. Returns `Ok(None)` when there is no
/// sink.
///
/// # Errors
///
/// Returns an error if the log file can't be opened.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<Registry>>>>> {
    let writer_config = &tracing_config.writer_config;
    let mut sinks: Vec<(BoxMakeWriter, bool)> = vec![];

    if let Some(display) = writer_config.display() {
        let writer = match display {
            DisplayPreference::Stdout => BoxMakeWriter::new(std::io::stdout),
            DisplayPreference::Stderr => BoxMakeWriter::new(std::io::stderr),
        };
        sinks.push((writer, true));
    }
    if let Some(path) = writer_config.file() {
        let appender = rolling_file_appender_impl::try_create(path)?;
        // No ANSI colors in the file, so it stays greppable.
        sinks.push((BoxMakeWriter::new(appender), false));
    }

    if sinks.is_empty() {
        return Ok(None);
    }

    let mut layers: Vec<Box<DynLayer<Registry>>> = vec![Box::new(tracing_config.level_filter)];
    for (writer, with_ansi) in sinks {
        layers.push(Box::new(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_ansi(with_ansi)
                .with_writer(writer)
                .with_filter(tracing_config.level_filter),
        ));
    }
    Ok(Some(layers))
}

impl TracingConfig {
    /// Installs the layers as the process wide default subscriber. Does nothing when
    /// there is no sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the layers can't be created or a global subscriber is
    /// already installed.
    pub fn install_global(&self) -> miette::Result<()> {
        if let Some(layers) = try_create_layers(self)? {
            tracing_subscriber::registry()
                .with(layers)
                .try_init()
                .into_diagnostic()?;
        }
        Ok(())
    }

    /// Installs the layers for the current thread only, until the returned guard is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the layers can't be created.
    pub fn install_thread_local(
        &self,
    ) -> miette::Result<Option<tracing::subscriber::DefaultGuard>> {
        Ok(try_create_layers(self)?.map(|layers| {
            tracing::subscriber::set_default(tracing_subscriber::registry().with(layers))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WriterConfig;
    use serial_test::serial;
    use tracing_core::LevelFilter;

    fn temp_log_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("r3bl_tui_input_{}", std::process::id()));
        dir.join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn test_layer_count_per_sink() {
        let display = TracingConfig::new_display(DisplayPreference::Stdout);
        assert_eq!(try_create_layers(&display).unwrap().unwrap().len(), 2);

        let both = TracingConfig::new_file_and_display(
            Some(temp_log_path("both_layers.log")),
            DisplayPreference::Stderr,
        );
        assert_eq!(try_create_layers(&both).unwrap().unwrap().len(), 3);
    }

    #[test]
    fn test_no_sink_creates_no_layers() {
        let config = TracingConfig {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::INFO,
        };
        assert!(try_create_layers(&config).unwrap().is_none());
        assert!(config.install_thread_local().unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_install_thread_local_writes_to_file() {
        let file_path = temp_log_path("thread_local.log");
        let config = TracingConfig::new_file(Some(file_path.clone()))
            .with_level_filter(LevelFilter::INFO);
        {
            let _guard = config.install_thread_local().unwrap();
            tracing::info!(message = "chunk routed", seq = "\\x1b[A");
            tracing::debug!(message = "filtered out");
        }
        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("chunk routed"));
        assert!(!contents.contains("filtered out"));
    }
}
