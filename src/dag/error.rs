// src/dag/error.rs

use thiserror::Error;

use crate::dag::node::TaskId;

/// Why a set of task records could not be turned into a leveled plan.
///
/// Every variant aborts the whole build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate task named '{name}'")]
    DuplicateTaskName { name: String },

    /// Two tasks claim the same artifact, or an artifact shares its name
    /// with a task.
    #[error("'{file}' declared by task '{task}' is already claimed by task '{existing}'")]
    DuplicateOutput {
        file: String,
        task: String,
        existing: String,
    },

    #[error("reference cycle while resolving '{symbol}': {}", visited.join(" -> "))]
    ReferenceCycle {
        symbol: String,
        visited: Vec<String>,
    },

    /// `remaining` lists every task that could not be leveled; `cyclic`
    /// names the tasks that actually sit on a cycle.
    #[error(
        "dependency cycle: {} task(s) cannot be leveled, cycle through [{}]",
        remaining.len(),
        cyclic.join(", ")
    )]
    DependencyCycle {
        remaining: Vec<TaskId>,
        cyclic: Vec<String>,
    },
}
