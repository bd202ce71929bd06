//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::PostureError;

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns `PostureError::InvalidInput` if the generated script is not UTF-8.
pub fn completions(shell: Shell) -> Result<String, PostureError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "posturewatch", &mut buf);
    String::from_utf8(buf).map_err(|e| PostureError::InvalidInput(format!("UTF-8 error: {e}")))
}
