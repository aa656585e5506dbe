// tests/common/mod.rs

#![allow(dead_code)]

pub use wfdag_test_utils::builders;
pub use wfdag_test_utils::fake_executor;
pub use wfdag_test_utils::{capture_logs, init_tracing, with_timeout};

use wfdag::dag::{LeveledPlan, TaskId};

/// Task names of every level, sorted within a level by identifier.
pub fn level_names(plan: &LeveledPlan) -> Vec<Vec<String>> {
    plan.iter()
        .map(|(_, ids)| {
            ids.iter()
                .filter_map(|id| plan.task(*id))
                .map(|t| t.name().to_string())
                .collect()
        })
        .collect()
}

pub fn id(plan: &LeveledPlan, name: &str) -> TaskId {
    plan.id_of(name)
        .unwrap_or_else(|| panic!("no task named {name} in plan"))
}
