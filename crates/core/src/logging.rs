use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive, e.g. `trailscope_java=debug`.
pub const LOG_FILTER_ENV: &str = "TRAILSCOPE_LOG";

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// File name prefix of the rolling log, e.g. `cli` gives `cli.2026-01-21`.
    pub component: String,
    pub to_stderr: bool,
    /// Defaults to `~/.trailscope/logs`.
    pub directory: Option<PathBuf>,
}

impl LoggingOptions {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            to_stderr: false,
            directory: None,
        }
    }

    pub fn with_stderr(mut self, to_stderr: bool) -> Self {
        self.to_stderr = to_stderr;
        self
    }

    pub fn log_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".trailscope")
                .join("logs")
        })
    }
}

/// Installs the global subscriber: a daily rolling file plus an optional
/// stderr layer. Keep the returned guard alive until shutdown so buffered
/// lines get flushed.
pub fn init_logging(options: &LoggingOptions) -> WorkerGuard {
    let log_dir = options.log_directory();
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, &options.component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if options.to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_wins() {
        let mut options = LoggingOptions::new("cli");
        options.directory = Some(PathBuf::from("/tmp/trailscope-logs"));
        assert_eq!(options.log_directory(), PathBuf::from("/tmp/trailscope-logs"));
        assert!(LoggingOptions::new("cli").log_directory().ends_with(".trailscope/logs"));
    }
}
