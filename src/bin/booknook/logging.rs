use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

use booknook::config::{ConfigPaths, LoggingConfig};

/// Logs to a size-rotated file so the interactive chat keeps a clean stdout.
/// `RUST_LOG` takes precedence over the configured level.
///
/// The returned handle owns the file writer. Dropping it flushes and closes
/// the log, so `main` holds it until the command finishes.
pub fn init_logging(config: &LoggingConfig, paths: &ConfigPaths) -> anyhow::Result<LoggerHandle> {
    let (directory, basename) = log_file_spec(config.path.as_deref(), &paths.logs_dir);
    let handle = Logger::try_with_env_or_str(&config.level)?
        .log_to_file(FileSpec::default().directory(directory).basename(basename))
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?;
    Ok(handle)
}

/// Directory and file stem for the log. A configured path wins; a bare file
/// name stays in the default logs directory.
fn log_file_spec(configured: Option<&str>, logs_dir: &Path) -> (PathBuf, String) {
    let log_path = configured
        .map(PathBuf::from)
        .unwrap_or_else(|| logs_dir.join("booknook.log"));
    let directory = log_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| logs_dir.to_path_buf());
    let basename = log_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("booknook")
        .to_string();
    (directory, basename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_logs_dir() {
        let (dir, stem) = log_file_spec(None, Path::new("/var/logs"));
        assert_eq!(dir, PathBuf::from("/var/logs"));
        assert_eq!(stem, "booknook");
    }

    #[test]
    fn configured_path_overrides_location() {
        let (dir, stem) = log_file_spec(Some("/tmp/nook/eval.log"), Path::new("/var/logs"));
        assert_eq!(dir, PathBuf::from("/tmp/nook"));
        assert_eq!(stem, "eval");
    }

    #[test]
    fn bare_file_name_stays_in_logs_dir() {
        let (dir, stem) = log_file_spec(Some("chat.log"), Path::new("/var/logs"));
        assert_eq!(dir, PathBuf::from("/var/logs"));
        assert_eq!(stem, "chat");
    }
}
