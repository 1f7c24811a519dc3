use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialise logging. In debug mode the default level is `debug`, otherwise
/// `info`. The level can be overridden via the `RUST_LOG` environment variable
/// only when debug logging is enabled.
///
/// When `log_file` is set, output is written to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // Without debug logging we force `info` so a stray `RUST_LOG` in the
    // user's environment cannot turn on verbose output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "content_dashboard.log".into());
            let appender = tracing_appender::rolling::never(dir, name);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(appender)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init();
        }
    }
}
