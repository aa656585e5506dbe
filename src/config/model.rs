// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Run configuration as read from a TOML file, before validation.
///
/// ```toml
/// [execution]
/// simulate = true
/// work_dir = "out"
///
/// [simulation]
/// min_execution_time = 0.1
/// max_execution_time = 1.1
/// seed = 42
///
/// [task.T1]
/// simulate = false
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub execution: ExecutionSection,

    #[serde(default)]
    pub simulation: SimulationSection,

    /// Per-task overrides from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskOverride>,
}

/// Validated run configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`Default`].
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub execution: ExecutionSection,
    pub simulation: SimulationSection,
    pub task: BTreeMap<String, TaskOverride>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        execution: ExecutionSection,
        simulation: SimulationSection,
        task: BTreeMap<String, TaskOverride>,
    ) -> Self {
        Self {
            execution,
            simulation,
            task,
        }
    }

    /// Whether `task` should be simulated rather than actually run.
    pub fn simulate_task(&self, task: &str) -> bool {
        self.task
            .get(task)
            .and_then(|o| o.simulate)
            .unwrap_or(self.execution.simulate)
    }
}

/// `[execution]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionSection {
    /// Simulate every task by default: sleep for a random duration and create
    /// the declared outputs instead of running the command.
    #[serde(default = "default_simulate")]
    pub simulate: bool,

    /// Directory in which tasks run and outputs are created.
    ///
    /// The `--output-directory` flag takes precedence.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
}

fn default_simulate() -> bool {
    true
}

impl Default for ExecutionSection {
    fn default() -> Self {
        Self {
            simulate: default_simulate(),
            work_dir: None,
        }
    }
}

/// `[simulation]` section. Times are in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSection {
    #[serde(default = "default_min_execution_time")]
    pub min_execution_time: f64,

    #[serde(default = "default_max_execution_time")]
    pub max_execution_time: f64,

    /// Seed for the simulated durations; random if absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_execution_time() -> f64 {
    0.1
}

fn default_max_execution_time() -> f64 {
    1.1
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            min_execution_time: default_min_execution_time(),
            max_execution_time: default_max_execution_time(),
            seed: None,
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskOverride {
    /// Overrides `execution.simulate` for this task.
    #[serde(default)]
    pub simulate: Option<bool>,
}
