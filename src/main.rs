use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use posturewatch::cli::args::{Cli, Commands};
use posturewatch::cli::commands;
use posturewatch::config::{Config, Paths};
use posturewatch::logging::init_logging;
use posturewatch::PostureError;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PostureError>() {
        Some(e) if e.is_user_error() => 2,
        _ => 1,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let config_path = match cli.config {
        Some(path) => path,
        None => Paths::new()?.config_file,
    };

    let output = match cli.command {
        Commands::Config(args) => commands::config(&args.command, &config_path, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
        Commands::Replay(args) => {
            let config = Config::load_from_path(&config_path)?;
            let level = cli
                .log_level
                .unwrap_or_else(|| config.logging.level.clone());
            let log_dir = if config.logging.to_file {
                let paths = Paths::new()?;
                paths.ensure_dirs()?;
                Some(paths.logs)
            } else {
                None
            };
            init_logging(&level, log_dir.as_deref()).context("failed to initialize logging")?;

            commands::replay(&args, &config, format)
                .with_context(|| format!("replay of {} failed", args.file.display()))?
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
