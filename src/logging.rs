use crate::error::{DocumenterError, Result};
use env_logger::{Builder, Env};
use log::{self, LevelFilter};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use yansi::Paint;

/// Handle on the process-wide logger.
///
/// Created once by [`init`] at startup and kept alive by `main`; dropping it
/// flushes the console logger and the log file.
pub struct LogGuard {
    file: Option<Arc<Mutex<File>>>,
}

impl LogGuard {
    /// Flushes buffered log output
    pub fn flush(&self) {
        log::logger().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Initializes the application's logging system with the specified log level
///
/// Valid log levels are: error, warn, info, debug, trace and off; anything
/// else means info. `RUST_LOG` takes precedence. When `log_file` is given
/// every record is also appended to it without colors.
pub fn init(log_level: &str, log_file: Option<&Path>) -> Result<LogGuard> {
    let level = parse_log_level(log_level).to_string();
    let env = Env::default()
        .filter_or("RUST_LOG", level)
        .write_style_or("RUST_LOG_STYLE", "auto");

    let file = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(Arc::new(Mutex::new(file)))
        }
        None => None,
    };

    let sink = file.clone();
    Builder::from_env(env)
        .format(move |buf, record| {
            if let Some(sink) = &sink {
                if let Ok(mut file) = sink.lock() {
                    let _ = writeln!(file, "{}", format_log(record, false));
                }
            }
            writeln!(buf, "{}", format_log(record, true))
        })
        .try_init()
        .map_err(|e| DocumenterError::Config(format!("Failed to initialize logger: {}", e)))?;

    Ok(LogGuard { file })
}

/// Formats a log record into a structured string
///
/// Returns a formatted string with timestamp, level, target and message
pub fn format_log(record: &log::Record, colored: bool) -> String {
    let label = match record.level() {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    let level = if colored {
        match record.level() {
            log::Level::Error => Paint::red(label).bold().to_string(),
            log::Level::Warn => Paint::yellow(label).bold().to_string(),
            log::Level::Info => Paint::cyan(label).bold().to_string(),
            log::Level::Debug => Paint::blue(label).bold().to_string(),
            log::Level::Trace => Paint::new(label).to_string(),
        }
    } else {
        label.to_string()
    };

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let target = if !record.target().is_empty() {
        record.target()
    } else {
        record.module_path().unwrap_or("unknown")
    };

    format!(
        "[{}] {} [{}] {}",
        timestamp,
        level,
        target,
        record.args()
    )
}

/// Parses a log level string into a LevelFilter
///
/// Returns the corresponding LevelFilter, defaulting to Info for invalid strings
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}
