// Process-wide tracing subscriber: stdout plus a plain-text log file.

use crate::config::LoggingConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// Install the global subscriber. Keep the returned guard alive for the life of the
/// process; dropping it flushes pending file writes.
pub fn init(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let (dir, file_name) = split_log_path(&config.file)?;
    std::fs::create_dir_all(&dir)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTimer))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()?;

    Ok(guard)
}

/// Split a log file path into (directory, file name). A bare file name lives in `.`.
pub fn split_log_path(path: &Path) -> anyhow::Result<(PathBuf, OsString)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log file {} has no file name", path.display()))?
        .to_os_string();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_uses_current_dir() {
        let (dir, name) = split_log_path(Path::new("memory_alarm.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("memory_alarm.log"));
    }

    #[test]
    fn nested_path_keeps_parent() {
        let (dir, name) = split_log_path(Path::new("logs/alarm/out.log")).unwrap();
        assert_eq!(dir, PathBuf::from("logs/alarm"));
        assert_eq!(name, OsString::from("out.log"));
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        assert!(split_log_path(Path::new("/")).is_err());
        assert!(split_log_path(Path::new("logs/..")).is_err());
    }
}
