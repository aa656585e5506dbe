// src/logging.rs

//! Tracing setup.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (or `--debug`), applied to every target;
//! 2. the `WFDAG_LOG` environment variable, in `EnvFilter` directive syntax,
//!    so targets can be tuned separately, e.g.
//!    `WFDAG_LOG=info,wfdag::dag=debug,wfdag::exec=warn`;
//! 3. `info`.
//!
//! Output goes to stderr; stdout is reserved for the plan and report JSON.

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "WFDAG_LOG";

/// Install the global subscriber. Call once, at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let (directives, rejected) = filter_directives(cli_level, env.as_deref());
    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| anyhow!("invalid log filter '{directives}': {e}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;

    if let Some(value) = rejected {
        warn!(value = %value, "ignoring invalid {}; logging at info", LOG_ENV_VAR);
    }
    Ok(())
}

/// Filter directives for a CLI level and the raw `WFDAG_LOG` value.
///
/// The second element is the environment value when it was consulted but is
/// not valid `EnvFilter` syntax.
fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> (String, Option<String>) {
    let default = LevelFilter::INFO.to_string();

    if let Some(level) = cli_level {
        return (LevelFilter::from(level).to_string(), None);
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) if EnvFilter::try_new(value).is_ok() => (value.to_string(), None),
        Some(value) => (default, Some(value.to_string())),
        None => (default, None),
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliArgs;
    use clap::Parser;

    fn directives(args: &[&str], env: Option<&str>) -> String {
        let mut argv = vec!["wfdag", "wf.json"];
        argv.extend_from_slice(args);
        let args = CliArgs::try_parse_from(argv).unwrap();
        filter_directives(args.effective_log_level(), env).0
    }

    #[test]
    fn log_level_flag_wins_over_everything() {
        assert_eq!(
            directives(&["--log-level", "error", "-d"], Some("trace")),
            LevelFilter::ERROR.to_string()
        );
    }

    #[test]
    fn debug_flag_wins_over_env() {
        assert_eq!(directives(&["-d"], Some("error")), LevelFilter::DEBUG.to_string());
    }

    #[test]
    fn env_directives_apply_without_flags() {
        assert_eq!(directives(&[], Some("warn")), "warn");
        assert_eq!(
            directives(&[], Some(" info,wfdag::dag=debug,wfdag::exec=warn ")),
            "info,wfdag::dag=debug,wfdag::exec=warn"
        );
    }

    #[test]
    fn default_is_info() {
        assert_eq!(directives(&[], None), LevelFilter::INFO.to_string());
        assert_eq!(directives(&[], Some("  ")), LevelFilter::INFO.to_string());
    }

    #[test]
    fn invalid_env_falls_back_to_info() {
        let (chosen, rejected) = filter_directives(None, Some("wfdag=loud"));
        assert_eq!(chosen, LevelFilter::INFO.to_string());
        assert_eq!(rejected.as_deref(), Some("wfdag=loud"));
    }

    #[test]
    fn every_level_yields_a_valid_filter() {
        let levels = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        for level in levels {
            let (chosen, _) = filter_directives(Some(level), None);
            assert!(EnvFilter::try_new(&chosen).is_ok(), "{chosen}");
        }
    }
}
