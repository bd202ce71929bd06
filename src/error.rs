//! Error types for posturewatch.

use thiserror::Error;

/// Errors surfaced by configuration, the control plane and the CLI host.
///
/// Per-frame processing never produces one of these: a frame that cannot be
/// evaluated is logged and skipped instead.
#[derive(Debug, Error)]
pub enum PostureError {
    /// Configuration is unreadable or violates a policy constraint.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A recorded frame or control event could not be applied.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Logger bootstrap failed.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// YAML (de)serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PostureError {
    /// Whether the error was caused by user-supplied input rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidInput(_))
    }
}
