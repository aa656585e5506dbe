// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WfdagError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WfdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.execution, raw.simulation, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_simulation(cfg)?;
    validate_task_overrides(cfg)?;
    Ok(())
}

fn validate_simulation(cfg: &RawConfigFile) -> Result<()> {
    let min = cfg.simulation.min_execution_time;
    let max = cfg.simulation.max_execution_time;

    for (key, value) in [("min_execution_time", min), ("max_execution_time", max)] {
        // Also rules out NaN, infinities and negatives.
        if Duration::try_from_secs_f64(value).is_err() {
            return Err(WfdagError::ConfigError(format!(
                "[simulation].{key} must be a representable number of seconds >= 0 (got {value})"
            )));
        }
    }

    if min > max {
        return Err(WfdagError::ConfigError(format!(
            "[simulation].min_execution_time ({min}) must not exceed max_execution_time ({max})"
        )));
    }

    Ok(())
}

fn validate_task_overrides(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.task.keys() {
        if name.trim().is_empty() {
            return Err(WfdagError::ConfigError(
                "[task.<name>] sections need a non-empty task name".to_string(),
            ));
        }
    }
    Ok(())
}
