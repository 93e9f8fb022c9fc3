// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use std::path::Path;
use tracing_appender::rolling::RollingFileAppender;

/// Opens `path` for appending, creating its directory when needed. The file never
/// rotates, so one input session (which can be tailed from another terminal while the
/// app runs in raw mode) stays in one file.
///
/// # Errors
///
/// - `path` has no file name, eg: `/` or `..`.
/// - The parent directory can't be created.
pub fn try_create(path: &str) -> miette::Result<RollingFileAppender> {
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .ok_or_else(|| miette::miette!("Log path {} has no file name", path.display()))?;

    let dir = match path.parent() {
        Some(it) if !it.as_os_str().is_empty() => it,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).into_diagnostic()?;

    Ok(tracing_appender::rolling::never(dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_without_file_name_fails() {
        assert!(try_create("/").is_err());
    }

    #[test]
    fn test_missing_directory_is_created() {
        let dir = std::env::temp_dir()
            .join(format!("r3bl_tui_input_appender_{}", std::process::id()))
            .join("nested");
        let path = dir.join("input.log");
        assert!(try_create(path.to_str().unwrap()).is_ok());
        assert!(dir.is_dir());
    }
}
