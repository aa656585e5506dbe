// src/dag/plan.rs

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::ser::{Serialize, Serializer};

use crate::dag::node::{DagNode, TaskId};
use crate::workflow::TaskRecord;

/// One task of a built plan: the record as declared, plus its resolved edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    pub id: TaskId,
    pub level: usize,
    pub record: TaskRecord,
    pub parents: BTreeSet<TaskId>,
    pub children: BTreeSet<TaskId>,
}

impl PlannedTask {
    pub fn name(&self) -> &str {
        self.record.name()
    }
}

/// Read-only result of building a workflow DAG.
///
/// Level 0 holds the tasks without parents; every parent of a task at level
/// `i` sits at some level `j < i`. Tasks of one level are independent of each
/// other and may run concurrently. A downstream executor walks the levels
/// forward to dispatch work ([`LeveledPlan::iter`]) and may walk them
/// backward to collect results ([`LeveledPlan::iter_rev`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeveledPlan {
    workflow_name: String,
    /// Indexed by [`TaskId::index`].
    tasks: Vec<PlannedTask>,
    levels: Vec<Vec<TaskId>>,
    by_name: HashMap<String, TaskId>,
}

impl LeveledPlan {
    pub(crate) fn new(
        workflow_name: String,
        nodes: Vec<DagNode>,
        levels: Vec<Vec<TaskId>>,
    ) -> Self {
        let mut level_of = vec![0usize; nodes.len()];
        for (level, ids) in levels.iter().enumerate() {
            for id in ids {
                level_of[id.index()] = level;
            }
        }

        let tasks: Vec<PlannedTask> = nodes
            .into_iter()
            .map(|node| PlannedTask {
                id: node.id,
                level: level_of[node.id.index()],
                record: node.task,
                parents: node.dag_parents,
                children: node.dag_children,
            })
            .collect();

        let by_name = tasks
            .iter()
            .map(|t| (t.name().to_string(), t.id))
            .collect();

        Self {
            workflow_name,
            tasks,
            levels,
            by_name,
        }
    }

    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn levels(&self) -> &[Vec<TaskId>] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&[TaskId]> {
        self.levels.get(index).map(Vec::as_slice)
    }

    /// Levels in execution order, with their index.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, &[TaskId])> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, ids)| (i, ids.as_slice()))
    }

    /// Levels from last to first.
    pub fn iter_rev(&self) -> impl Iterator<Item = (usize, &[TaskId])> + '_ {
        self.iter().rev()
    }

    pub fn task(&self, id: TaskId) -> Option<&PlannedTask> {
        self.tasks.get(id.index())
    }

    /// All tasks, by identifier.
    pub fn tasks(&self) -> impl Iterator<Item = &PlannedTask> {
        self.tasks.iter()
    }

    pub fn id_of(&self, name: &str) -> Option<TaskId> {
        self.by_name.get(name).copied()
    }

    pub fn level_of(&self, id: TaskId) -> Option<usize> {
        self.task(id).map(|t| t.level)
    }

    pub fn parents_of(&self, id: TaskId) -> Option<&BTreeSet<TaskId>> {
        self.task(id).map(|t| &t.parents)
    }

    pub fn children_of(&self, id: TaskId) -> Option<&BTreeSet<TaskId>> {
        self.task(id).map(|t| &t.children)
    }
}

impl fmt::Display for LeveledPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, ids) in self.iter() {
            let tasks: Vec<String> = ids
                .iter()
                .filter_map(|id| self.task(*id))
                .map(|t| format!("{} ({})", t.id, t.name()))
                .collect();
            writeln!(f, "Level {level}: {}", tasks.join("; "))?;
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct PlanView<'a> {
    name: &'a str,
    levels: Vec<Vec<TaskView<'a>>>,
}

#[derive(serde::Serialize)]
struct TaskView<'a> {
    id: TaskId,
    name: &'a str,
    command: Option<&'a [String]>,
    inputs: &'a BTreeSet<String>,
    outputs: &'a BTreeSet<String>,
    parents: &'a BTreeSet<TaskId>,
    children: &'a BTreeSet<TaskId>,
}

impl Serialize for LeveledPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let levels = self
            .levels
            .iter()
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.task(*id))
                    .map(|t| TaskView {
                        id: t.id,
                        name: t.name(),
                        command: t.record.command(),
                        inputs: t.record.inputs(),
                        outputs: t.record.outputs(),
                        parents: &t.parents,
                        children: &t.children,
                    })
                    .collect()
            })
            .collect();

        PlanView {
            name: &self.workflow_name,
            levels,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use crate::dag::build_named;
    use crate::workflow::TaskRecord;

    fn sequence() -> super::LeveledPlan {
        build_named(
            "seq",
            [
                TaskRecord::new("T1").with_output("f1"),
                TaskRecord::new("T2").with_input("f1").with_command(["cat", "f1"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn display_lists_levels() {
        assert_eq!(
            sequence().to_string(),
            "Level 0: dv_0 (T1)\nLevel 1: dv_1 (T2)\n"
        );
    }

    #[test]
    fn reverse_iteration_starts_from_the_last_level() {
        let plan = sequence();
        let order: Vec<usize> = plan.iter_rev().map(|(i, _)| i).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn unknown_identifier_has_no_task() {
        let plan = sequence();
        assert!(plan.task(crate::dag::TaskId::new(7)).is_none());
        assert!(plan.id_of("nope").is_none());
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(sequence()).unwrap();
        assert_eq!(json["name"], "seq");
        assert_eq!(json["levels"][0][0]["id"], "dv_0");
        assert_eq!(json["levels"][0][0]["command"], serde_json::Value::Null);
        assert_eq!(json["levels"][0][0]["children"][0], "dv_1");
        assert_eq!(json["levels"][1][0]["name"], "T2");
        assert_eq!(json["levels"][1][0]["command"][1], "f1");
        assert_eq!(json["levels"][1][0]["parents"][0], "dv_0");
    }

    #[test]
    fn plan_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<super::LeveledPlan>();
    }
}
