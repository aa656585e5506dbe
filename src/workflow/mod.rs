// src/workflow/mod.rs

//! Workflow description input.
//!
//! - [`model`] is the serde mapping of the JSON document.
//! - [`task`] holds [`TaskRecord`], the immutable per-task input of the DAG
//!   builder.
//! - [`loader`] reads a document from disk or a string.

pub mod loader;
pub mod model;
pub mod task;

pub use loader::{load_from_path, load_from_str};
pub use task::TaskRecord;

/// A named list of task records, in declaration order.
///
/// Order matters: synthetic task identifiers are assigned in this order, so
/// the same document always produces the same plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub name: String,
    pub tasks: Vec<TaskRecord>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, tasks: Vec<TaskRecord>) -> Self {
        Self {
            name: name.into(),
            tasks,
        }
    }
}
