// src/dag/node.rs

//! Synthetic task identifiers and the builder's working node type.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::dag::references::Symbol;
use crate::workflow::TaskRecord;

/// Stable synthetic identifier of a task within one plan.
///
/// Assigned in input order and independent of the task's name. Renders as
/// `dv_<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the task in the input (and in the plan's task table).
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dv_{}", self.0)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A vertex of the DAG while it is being built.
///
/// References to other nodes are staged as raw [`Symbol`]s during the first
/// pass and replaced by identifiers during consolidation. Nodes never hold
/// each other directly; the builder's node table is indexed by
/// [`TaskId::index`].
#[derive(Debug, Clone)]
pub(crate) struct DagNode {
    pub id: TaskId,
    pub task: TaskRecord,
    /// Declared parents and inputs, not yet resolved.
    pub staged_parents: Vec<Symbol>,
    /// Declared children, not yet resolved.
    pub staged_children: Vec<Symbol>,
    pub dag_parents: BTreeSet<TaskId>,
    pub dag_children: BTreeSet<TaskId>,
}

impl DagNode {
    pub fn new(id: TaskId, task: TaskRecord) -> Self {
        Self {
            id,
            task,
            staged_parents: Vec::new(),
            staged_children: Vec::new(),
            dag_parents: BTreeSet::new(),
            dag_children: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.task.name()
    }
}
