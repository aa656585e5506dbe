// src/dag/leveling.rs

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::dag::error::GraphError;
use crate::dag::node::{DagNode, TaskId};

/// Assign every node to the lowest level above all of its parents.
///
/// Kahn's algorithm, one level at a time: the nodes whose remaining-parent
/// count is zero form the next level, and releasing them decrements the count
/// of each of their children. Expects `dag_parents` and `dag_children` to be
/// transposes of each other and `nodes[i].id.index() == i`.
///
/// Each level is sorted by identifier so the same input always yields the
/// same plan.
pub(crate) fn assign_levels(nodes: &[DagNode]) -> Result<Vec<Vec<TaskId>>, GraphError> {
    let mut remaining: Vec<usize> = nodes.iter().map(|n| n.dag_parents.len()).collect();
    let mut ready: Vec<TaskId> = nodes
        .iter()
        .filter(|n| n.dag_parents.is_empty())
        .map(|n| n.id)
        .collect();

    let mut levels: Vec<Vec<TaskId>> = Vec::new();
    let mut placed = 0usize;

    while !ready.is_empty() {
        ready.sort_unstable();

        let mut next = Vec::new();
        for id in &ready {
            for child in &nodes[id.index()].dag_children {
                let count = &mut remaining[child.index()];
                *count -= 1;
                if *count == 0 {
                    next.push(*child);
                }
            }
        }

        placed += ready.len();
        debug!(level = levels.len(), tasks = ready.len(), "level assigned");
        levels.push(std::mem::replace(&mut ready, next));
    }

    if placed < nodes.len() {
        let stuck: Vec<TaskId> = nodes
            .iter()
            .filter(|n| remaining[n.id.index()] > 0)
            .map(|n| n.id)
            .collect();
        let cyclic = cyclic_task_names(nodes, &stuck);
        warn!(
            stuck = stuck.len(),
            ?cyclic,
            "leveling made no progress; dependency cycle"
        );
        return Err(GraphError::DependencyCycle {
            remaining: stuck,
            cyclic,
        });
    }

    Ok(levels)
}

/// Names of the tasks among `stuck` that lie on a cycle.
///
/// `stuck` also contains tasks that merely sit downstream of a cycle; the
/// strongly connected components of the stuck subgraph separate the two.
fn cyclic_task_names(nodes: &[DagNode], stuck: &[TaskId]) -> Vec<String> {
    let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();
    for &id in stuck {
        graph.add_node(id);
    }
    for &id in stuck {
        for &child in &nodes[id.index()].dag_children {
            if graph.contains_node(child) {
                graph.add_edge(id, child, ());
            }
        }
    }

    let mut names: Vec<String> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .flatten()
        .map(|id| nodes[id.index()].name().to_string())
        .collect();
    names.sort();
    names
}
