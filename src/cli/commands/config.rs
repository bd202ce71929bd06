//! Config command implementation.

use std::path::Path;

use colored::Colorize;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::Config;
use crate::error::PostureError;
use crate::output::to_json;

/// Execute config subcommands against the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, written or rendered.
pub fn config(
    cmd: &ConfigCommands,
    path: &Path,
    format: OutputFormat,
) -> Result<String, PostureError> {
    match cmd {
        ConfigCommands::Show => show(path, format),
        ConfigCommands::Init { force } => init(path, *force, format),
        ConfigCommands::Path => Ok(path.display().to_string()),
    }
}

fn show(path: &Path, format: OutputFormat) -> Result<String, PostureError> {
    let config = Config::load_from_path(path)?;
    config.validate()?;

    match format {
        OutputFormat::Json => to_json(&config),
        OutputFormat::Pretty => {
            let yaml = serde_yaml::to_string(&config)?;
            Ok(format!(
                "{}\n{}",
                format!("# {}", path.display()).dimmed(),
                yaml.trim_end()
            ))
        }
    }
}

fn init(path: &Path, force: bool, format: OutputFormat) -> Result<String, PostureError> {
    if path.exists() && !force {
        return Err(PostureError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Config::default().save_to_path(path)?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "status": "written",
            "path": path.display().to_string(),
        })),
        OutputFormat::Pretty => Ok(format!(
            "{} {}",
            "✅ Default configuration written to".green(),
            path.display()
        )),
    }
}
