// src/engine/mod.rs

//! Plan execution.
//!
//! [`runtime::Runtime`] walks a [`LeveledPlan`](crate::dag::LeveledPlan)
//! level by level and hands one [`WorkUnit`] per task to an
//! [`ExecutorBackend`](crate::exec::ExecutorBackend). This module defines the
//! values exchanged between the two.

use serde::Serialize;

use crate::dag::{PlannedTask, TaskId};

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Outcome of one work unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOutcome {
    Success,
    Failed(i32),
}

impl TaskOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, TaskOutcome::Success)
    }
}

/// Everything an executor needs to run one planned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub id: TaskId,
    pub name: TaskName,
    pub level: usize,
    /// `None` means there is nothing to run; outputs are only created.
    pub command: Option<Vec<String>>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub simulate: bool,
}

impl WorkUnit {
    pub fn from_planned(task: &PlannedTask, simulate: bool) -> Self {
        Self {
            id: task.id,
            name: task.name().to_string(),
            level: task.level,
            command: task.record.command().map(<[String]>::to_vec),
            inputs: task.record.inputs().iter().cloned().collect(),
            outputs: task.record.outputs().iter().cloned().collect(),
            simulate,
        }
    }
}

/// What happened to one work unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskReport {
    pub id: TaskId,
    pub name: TaskName,
    pub level: usize,
    pub outcome: TaskOutcome,
    pub simulated: bool,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Wall-clock seconds.
    pub execution_time: f64,
}

impl TaskReport {
    pub fn new(unit: WorkUnit, outcome: TaskOutcome, execution_time: f64) -> Self {
        Self {
            id: unit.id,
            name: unit.name,
            level: unit.level,
            outcome,
            simulated: unit.simulate,
            inputs: unit.inputs,
            outputs: unit.outputs,
            execution_time,
        }
    }
}

/// Reports of a completed run, in level order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub workflow: String,
    pub tasks: Vec<TaskReport>,
}

pub mod runtime;

pub use runtime::Runtime;
