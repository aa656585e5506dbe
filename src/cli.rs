// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `wfdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wfdag",
    version,
    about = "Turn a workflow description into a leveled plan and run it level by level.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workflow description (JSON).
    #[arg(value_name = "WORKFLOW")]
    pub workflow: PathBuf,

    /// Path to the run configuration (TOML).
    ///
    /// If omitted, `Wfdag.toml` in the current directory is used when present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory where tasks run and where `plan.json` / `report.json` go.
    ///
    /// Default: `[execution].work_dir` from the config, else `out`.
    #[arg(short, long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// Reuse the output directory if it already exists.
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Shorthand for `--log-level debug`.
    #[arg(short, long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WFDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Build and print the plan, but don't create anything or run any task.
    #[arg(long)]
    pub dry_run: bool,

    /// Run real commands instead of simulating them.
    ///
    /// Per-task `simulate` overrides in the config still apply.
    #[arg(long)]
    pub execute: bool,

    /// Print the plan (dry run) or the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Effective log level requested on the command line, if any.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        match (self.log_level, self.debug) {
            (Some(level), _) => Some(level),
            (None, true) => Some(LogLevel::Debug),
            (None, false) => None,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_match_long_ones() {
        let args =
            CliArgs::try_parse_from(["wfdag", "wf.json", "-o", "build", "-f", "-d"]).unwrap();
        assert_eq!(args.workflow, PathBuf::from("wf.json"));
        assert_eq!(args.output_directory, Some(PathBuf::from("build")));
        assert!(args.force_overwrite);
        assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn explicit_level_beats_debug_flag() {
        let args =
            CliArgs::try_parse_from(["wfdag", "wf.json", "-d", "--log-level", "warn"]).unwrap();
        assert_eq!(args.effective_log_level(), Some(LogLevel::Warn));
    }

    #[test]
    fn workflow_is_required() {
        assert!(CliArgs::try_parse_from(["wfdag"]).is_err());
    }
}
