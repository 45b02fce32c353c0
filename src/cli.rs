// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `scanlink`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scanlink",
    version,
    about = "Project dependency trees and run version-gated analysis sessions.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Scanlink.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Scanlink.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCANLINK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the dependency trees and run properties, don't start a session.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the analysis (same as `[scanner].skip = true`).
    #[arg(long)]
    pub skip: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
