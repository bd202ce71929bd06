//! Logger bootstrap.
//!
//! # Responsibility
//! - Initialize the `log` backend exactly once per process.
//! - Route records to stderr, or to rotated files under the data directory.
//!
//! # Invariants
//! - Initialization is idempotent for the same level and destination.
//! - Re-initialization with a different level or destination is rejected.
//! - Initialization never panics.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::PostureError;

const LOG_FILE_BASENAME: &str = "posturewatch";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const SUPPORTED_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    log_dir: Option<PathBuf>,
    _logger: LoggerHandle,
}

fn normalize_level(level: &str) -> Result<String, PostureError> {
    let normalized = level.trim().to_ascii_lowercase();
    if SUPPORTED_LEVELS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(PostureError::Logging(format!(
            "unsupported log level `{level}` (expected one of: {})",
            SUPPORTED_LEVELS.join(", ")
        )))
    }
}

fn check_same(
    state: &LoggingState,
    level: &str,
    log_dir: Option<&Path>,
) -> Result<(), PostureError> {
    if state.log_dir.as_deref() != log_dir {
        return Err(PostureError::Logging(format!(
            "logging already initialized with destination `{}`; refusing to switch",
            describe(state.log_dir.as_deref())
        )));
    }
    if state.level != level {
        return Err(PostureError::Logging(format!(
            "logging already initialized with level `{}`; refusing to switch to `{level}`",
            state.level
        )));
    }
    Ok(())
}

fn describe(log_dir: Option<&Path>) -> String {
    log_dir.map_or_else(|| "stderr".to_string(), |dir| dir.display().to_string())
}

/// Initialize logging at `level`, writing to `log_dir` when given and to
/// stderr otherwise.
///
/// # Errors
///
/// - Returns an error when `level` is unsupported.
/// - Returns an error when the log directory cannot be created.
/// - Returns an error when logging was already initialized differently.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<(), PostureError> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        return check_same(state, &level, log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, PostureError> {
        let logger = Logger::try_with_str(&level)
            .map_err(|err| PostureError::Logging(format!("invalid log level `{level}`: {err}")))?;

        let logger = match log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|err| {
                    PostureError::Logging(format!(
                        "failed to create log directory `{}`: {err}",
                        dir.display()
                    ))
                })?;
                logger
                    .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                    .rotate(
                        Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                        Naming::Numbers,
                        Cleanup::KeepLogFiles(MAX_LOG_FILES),
                    )
                    .write_mode(WriteMode::BufferAndFlush)
                    .append()
                    .format_for_files(flexi_logger::detailed_format)
            }
            None => logger
                .log_to_stderr()
                .format_for_stderr(flexi_logger::colored_default_format),
        };

        let handle = logger
            .start()
            .map_err(|err| PostureError::Logging(format!("failed to start logger: {err}")))?;

        info!(
            "event=logging_init level={} destination={} version={}",
            level,
            describe(log_dir),
            env!("CARGO_PKG_VERSION")
        );

        Ok(LoggingState {
            level: level.clone(),
            log_dir: log_dir.map(Path::to_path_buf),
            _logger: handle,
        })
    })?;

    check_same(state, &level, log_dir)
}

/// Active `(level, destination)` or `None` before initialization.
#[must_use]
pub fn logging_status() -> Option<(String, Option<PathBuf>)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level.clone(), state.log_dir.clone()))
}
