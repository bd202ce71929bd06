use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "posturewatch")]
#[command(about = "Posture and screen-focus alerting driven by pose landmarks")]
#[command(long_about = "posturewatch - posture and screen-focus alerting

Feeds body-pose and face landmarks through a stateful detection engine that
flags sustained poor posture and long uninterrupted screen focus, with
throttled alerts and a pause/snooze lifecycle.

QUICK START:
  posturewatch replay session.jsonl          Replay a recorded session
  posturewatch replay session.jsonl -o json  Emit events as JSON lines
  posturewatch config init                   Write the default configuration

For more information on a specific command, run:
  posturewatch <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Configuration file (defaults to ~/.posturewatch/config.yaml)
    #[arg(long, global = true, env = "POSTUREWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level override (error, warn, info, debug, trace, off)
    #[arg(long, global = true, env = "POSTUREWATCH_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded landmark session through the engine
    ///
    /// Reads a JSON-lines file. Each line is either a frame:
    ///
    ///   {"t": 3.0, "pose": [{"x":0.5,"y":0.2,"visibility":0.9}, ...],
    ///    "face": [{"x":0.5,"y":0.4}, ...], "width": 640, "height": 480}
    ///
    /// or a control event:
    ///
    ///   {"t": 100, "control": "snooze", "seconds": 300}
    ///
    /// Controls: start, pause, snooze, status, stats, poll. Timestamps are
    /// seconds since the start of the recording and must not decrease.
    /// Blank lines and lines starting with '#' are ignored.
    ///
    /// # Examples
    ///
    ///   posturewatch replay session.jsonl
    ///   posturewatch replay session.jsonl --summary
    ///   posturewatch replay session.jsonl -o json | jq .
    #[command(alias = "r")]
    Replay(ReplayArgs),

    /// Show or initialize configuration
    ///
    /// # Examples
    ///
    ///   posturewatch config show
    ///   posturewatch config init --force
    ///   posturewatch config path
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: posturewatch completions zsh > ~/.zfunc/_posturewatch
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the replay command.
#[derive(Args)]
pub struct ReplayArgs {
    /// Recorded session (JSON lines)
    pub file: PathBuf,

    /// Print final statistics after the replay
    #[arg(long, short = 's')]
    pub summary: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_replay() {
        let cli = Cli::try_parse_from(["posturewatch", "replay", "session.jsonl"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Pretty);
        if let Commands::Replay(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("session.jsonl"));
            assert!(!args.summary);
        } else {
            panic!("Expected Replay command");
        }
    }

    #[test]
    fn test_cli_replay_alias_and_flags() {
        let cli = Cli::try_parse_from([
            "posturewatch",
            "r",
            "s.jsonl",
            "--summary",
            "-o",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        if let Commands::Replay(args) = cli.command {
            assert!(args.summary);
        } else {
            panic!("Expected Replay command");
        }
    }

    #[test]
    fn test_cli_config_init_force() {
        let cli = Cli::try_parse_from(["posturewatch", "config", "init", "--force"]).unwrap();
        if let Commands::Config(args) = cli.command {
            assert!(matches!(args.command, ConfigCommands::Init { force: true }));
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["posturewatch", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_shell() {
        assert!(Cli::try_parse_from(["posturewatch", "completions", "tcsh"]).is_err());
    }
}
