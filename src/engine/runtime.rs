// src/engine/runtime.rs

use std::fmt;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::dag::LeveledPlan;
use crate::errors::{Result, WfdagError};
use crate::exec::ExecutorBackend;

use super::{RunReport, TaskOutcome, TaskReport, WorkUnit};

/// Drives a [`LeveledPlan`] through an `ExecutorBackend`.
///
/// All units of a level run concurrently. A level is closed once every one of
/// its units has reported; the next level only starts if they all succeeded.
pub struct Runtime<E: ExecutorBackend> {
    executor: E,
    config: ConfigFile,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(executor: E, config: ConfigFile) -> Self {
        Self { executor, config }
    }

    /// Work units of one level, in identifier order.
    pub fn units_for_level(&self, plan: &LeveledPlan, level: usize) -> Vec<WorkUnit> {
        plan.level(level)
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| plan.task(*id))
            .map(|task| WorkUnit::from_planned(task, self.config.simulate_task(task.name())))
            .collect()
    }

    /// Execute the whole plan.
    ///
    /// Stops with [`WfdagError::TaskFailed`] after the first level in which a
    /// unit failed; units of that level that were already running are still
    /// awaited.
    pub async fn run(&self, plan: &LeveledPlan) -> Result<RunReport> {
        self.warn_unknown_overrides(plan);
        info!(
            workflow = %plan.workflow_name(),
            levels = plan.len(),
            tasks = plan.task_count(),
            "runtime started"
        );

        let mut reports: Vec<TaskReport> = Vec::with_capacity(plan.task_count());

        for (level, _) in plan.iter() {
            let units = self.units_for_level(plan, level);
            info!(level, tasks = units.len(), "dispatching level");

            let mut join_set = JoinSet::new();
            for unit in units {
                debug!(task = %unit.name, id = %unit.id, simulate = unit.simulate, "spawning unit");
                join_set.spawn(self.executor.execute(unit));
            }

            let mut level_reports = Vec::with_capacity(join_set.len());
            while let Some(joined) = join_set.join_next().await {
                let report = joined.map_err(anyhow::Error::from)??;
                level_reports.push(report);
            }
            level_reports.sort_by_key(|r| r.id);

            if let Some(failed) = level_reports.iter().find(|r| !r.outcome.is_success()) {
                let code = match failed.outcome {
                    TaskOutcome::Failed(code) => code,
                    TaskOutcome::Success => 0,
                };
                warn!(
                    task = %failed.name,
                    level,
                    exit_code = code,
                    "level failed; not starting next level"
                );
                return Err(WfdagError::TaskFailed {
                    task: failed.name.clone(),
                    code,
                });
            }

            info!(level, "level completed");
            reports.extend(level_reports);
        }

        info!(tasks = reports.len(), "runtime finished");
        Ok(RunReport {
            workflow: plan.workflow_name().to_string(),
            tasks: reports,
        })
    }

    fn warn_unknown_overrides(&self, plan: &LeveledPlan) {
        for name in self.config.task.keys() {
            if plan.id_of(name).is_none() {
                warn!(task = %name, "[task.{}] in config matches no task in the workflow", name);
            }
        }
    }
}
