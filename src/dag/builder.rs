// src/dag/builder.rs

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info};

use crate::dag::error::GraphError;
use crate::dag::leveling::assign_levels;
use crate::dag::node::{DagNode, TaskId};
use crate::dag::plan::LeveledPlan;
use crate::dag::references::{ReferenceTable, Symbol};
use crate::workflow::{TaskRecord, Workflow};

/// Collects task records and turns them into a [`LeveledPlan`].
///
/// Dependencies can be declared in four places (parents, children, input
/// files, output files) with no guarantee that both ends of a link mention
/// each other. Building happens in three steps:
///
/// 1. collect: give every task an identifier and register its name and
///    outputs in a [`ReferenceTable`]; stage everything it refers to;
/// 2. consolidate: resolve staged references to identifiers, dropping what
///    lives outside the workflow, then mirror every edge so parent and child
///    sets agree;
/// 3. level: see [`assign_levels`].
#[derive(Debug, Clone)]
pub struct DagBuilder {
    workflow_name: String,
    tasks: Vec<TaskRecord>,
    names: HashSet<String>,
}

impl DagBuilder {
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            tasks: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Add one task; its position fixes its identifier.
    pub fn add_task(&mut self, task: TaskRecord) -> Result<&mut Self, GraphError> {
        if !self.names.insert(task.name().to_string()) {
            return Err(GraphError::DuplicateTaskName {
                name: task.name().to_string(),
            });
        }
        self.tasks.push(task);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn build(self) -> Result<LeveledPlan, GraphError> {
        let mut nodes: Vec<DagNode> = self
            .tasks
            .into_iter()
            .enumerate()
            .map(|(index, task)| DagNode::new(TaskId::new(index), task))
            .collect();

        let references = collect_references(&mut nodes)?;
        consolidate(&mut nodes, &references)?;
        mirror_edges(&mut nodes);

        let levels = assign_levels(&nodes)?;
        info!(
            workflow = %self.workflow_name,
            tasks = nodes.len(),
            levels = levels.len(),
            "leveled plan built"
        );

        Ok(LeveledPlan::new(self.workflow_name, nodes, levels))
    }
}

/// Build a plan from task records, in order.
pub fn build(tasks: impl IntoIterator<Item = TaskRecord>) -> Result<LeveledPlan, GraphError> {
    build_named("workflow", tasks)
}

/// Same as [`build`], with a workflow name carried into the plan.
pub fn build_named(
    workflow_name: impl Into<String>,
    tasks: impl IntoIterator<Item = TaskRecord>,
) -> Result<LeveledPlan, GraphError> {
    let mut builder = DagBuilder::new(workflow_name);
    for task in tasks {
        builder.add_task(task)?;
    }
    builder.build()
}

impl LeveledPlan {
    /// Build the plan of a loaded [`Workflow`].
    pub fn from_workflow(workflow: &Workflow) -> Result<Self, GraphError> {
        build_named(workflow.name.clone(), workflow.tasks.iter().cloned())
    }
}

/// First pass: register every task and output, stage every reference.
fn collect_references(nodes: &mut [DagNode]) -> Result<ReferenceTable, GraphError> {
    let mut references = ReferenceTable::new();

    for index in 0..nodes.len() {
        let id = nodes[index].id;
        references.register_task(id);

        if let Err(existing) = references.register_name(nodes[index].name(), id) {
            // Task names are unique, so the name was taken by an output.
            let name = nodes[index].name().to_string();
            return Err(GraphError::DuplicateOutput {
                existing: owner_name(nodes, &existing),
                file: name.clone(),
                task: name,
            });
        }

        for output in nodes[index].task.outputs() {
            if let Err(existing) = references.register_name(output, id) {
                return Err(GraphError::DuplicateOutput {
                    file: output.clone(),
                    task: nodes[index].name().to_string(),
                    existing: owner_name(nodes, &existing),
                });
            }
        }

        let node = &mut nodes[index];
        node.staged_children = node.task.children().iter().map(Symbol::name).collect();
        node.staged_parents = node
            .task
            .parents()
            .iter()
            .chain(node.task.inputs())
            .map(Symbol::name)
            .collect();
    }

    debug!(symbols = references.len(), "reference table collected");
    Ok(references)
}

/// Second pass: replace staged symbols by identifiers.
fn consolidate(nodes: &mut [DagNode], references: &ReferenceTable) -> Result<(), GraphError> {
    for node in nodes.iter_mut() {
        for parent in std::mem::take(&mut node.staged_parents) {
            match references.resolve(&parent)? {
                Some(id) => {
                    node.dag_parents.insert(id);
                }
                None => {
                    info!(task = %node.name(), reference = %parent, "external input; dropping");
                }
            }
        }

        for child in std::mem::take(&mut node.staged_children) {
            match references.resolve(&child)? {
                Some(id) => {
                    node.dag_children.insert(id);
                }
                None => {
                    info!(task = %node.name(), reference = %child, "terminal output; dropping");
                }
            }
        }
    }
    Ok(())
}

/// Make parent and child sets the transpose of each other.
fn mirror_edges(nodes: &mut [DagNode]) {
    let mut edges: BTreeSet<(TaskId, TaskId)> = BTreeSet::new();
    for node in nodes.iter() {
        edges.extend(node.dag_parents.iter().map(|&parent| (parent, node.id)));
        edges.extend(node.dag_children.iter().map(|&child| (node.id, child)));
    }

    for (parent, child) in edges {
        nodes[child.index()].dag_parents.insert(parent);
        nodes[parent.index()].dag_children.insert(child);
    }
}

fn owner_name(nodes: &[DagNode], symbol: &Symbol) -> String {
    match symbol {
        Symbol::Task(id) => nodes
            .get(id.index())
            .map(|n| n.name().to_string())
            .unwrap_or_else(|| id.to_string()),
        Symbol::Name(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(plan: &LeveledPlan, names: &[&str]) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = names.iter().map(|n| plan.id_of(n).unwrap()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn duplicate_name_is_rejected_on_add() {
        let mut builder = DagBuilder::new("wf");
        builder.add_task(TaskRecord::new("T1")).unwrap();
        let err = builder.add_task(TaskRecord::new("T1")).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateTaskName {
                name: "T1".to_string()
            }
        );
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn identifiers_follow_input_order() {
        let plan = build([TaskRecord::new("b"), TaskRecord::new("a")]).unwrap();
        assert_eq!(plan.id_of("b").unwrap().index(), 0);
        assert_eq!(plan.id_of("a").unwrap().index(), 1);
    }

    #[test]
    fn forward_parent_reference_is_resolved() {
        let plan = build([
            TaskRecord::new("T2").with_parent("T1"),
            TaskRecord::new("T1"),
        ])
        .unwrap();

        assert_eq!(plan.level(0).unwrap(), ids(&plan, &["T1"]).as_slice());
        assert_eq!(plan.level(1).unwrap(), ids(&plan, &["T2"]).as_slice());
    }

    #[test]
    fn child_declared_on_one_side_only_still_orders() {
        let plan = build([
            TaskRecord::new("T1").with_child("T2"),
            TaskRecord::new("T2"),
        ])
        .unwrap();

        let t1 = plan.id_of("T1").unwrap();
        let t2 = plan.id_of("T2").unwrap();
        assert!(plan.parents_of(t2).unwrap().contains(&t1));
        assert_eq!(plan.level_of(t2), Some(1));
    }

    #[test]
    fn redundant_declarations_produce_one_edge() {
        let plan = build([
            TaskRecord::new("T1").with_output("f1").with_child("T2"),
            TaskRecord::new("T2").with_input("f1").with_parent("T1"),
        ])
        .unwrap();

        let t2 = plan.id_of("T2").unwrap();
        assert_eq!(plan.parents_of(t2).unwrap().len(), 1);
    }

    #[test]
    fn unknown_child_is_dropped() {
        let plan = build([TaskRecord::new("T1").with_child("somewhere-else")]).unwrap();
        let t1 = plan.id_of("T1").unwrap();
        assert!(plan.children_of(t1).unwrap().is_empty());
    }

    #[test]
    fn output_named_like_own_task_is_duplicate() {
        let err = build([TaskRecord::new("T1").with_output("T1")]).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DuplicateOutput { ref existing, .. } if existing == "T1"
        ));
    }

    #[test]
    fn output_named_like_other_task_is_duplicate() {
        let err = build([
            TaskRecord::new("T1"),
            TaskRecord::new("T2").with_output("T1"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            GraphError::DuplicateOutput {
                file: "T1".to_string(),
                task: "T2".to_string(),
                existing: "T1".to_string(),
            }
        );
    }

    #[test]
    fn task_named_like_earlier_output_is_duplicate() {
        let err = build([
            TaskRecord::new("T1").with_output("report"),
            TaskRecord::new("report"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            GraphError::DuplicateOutput {
                file: "report".to_string(),
                task: "report".to_string(),
                existing: "T1".to_string(),
            }
        );
    }

    #[test]
    fn task_named_like_an_identifier_is_just_a_name() {
        let plan = build([
            TaskRecord::new("first").with_parent("dv_1"),
            TaskRecord::new("dv_1"),
        ])
        .unwrap();

        let first = plan.id_of("first").unwrap();
        let dv1 = plan.id_of("dv_1").unwrap();
        assert_eq!(dv1.index(), 1);
        assert_eq!(
            plan.parents_of(first).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![dv1]
        );
    }

    #[test]
    fn reading_own_output_is_a_cycle() {
        let err = build([TaskRecord::new("T1").with_output("f").with_input("f")]).unwrap_err();
        match err {
            GraphError::DependencyCycle { remaining, cyclic } => {
                assert_eq!(remaining.len(), 1);
                assert_eq!(cyclic, vec!["T1".to_string()]);
            }
            other => panic!("expected DependencyCycle, got {other:?}"),
        }
    }

    #[test]
    fn from_workflow_carries_the_name() {
        let wf = Workflow::new("hello", vec![TaskRecord::new("T1")]);
        let plan = LeveledPlan::from_workflow(&wf).unwrap();
        assert_eq!(plan.workflow_name(), "hello");
    }
}
