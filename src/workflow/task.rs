// src/workflow/task.rs

//! The immutable task record consumed by the DAG builder.

use std::collections::BTreeSet;

use tracing::warn;

use crate::types::FileLink;
use crate::workflow::model::RawTask;

/// Description of one workflow task, exactly as declared.
///
/// Parents, children, inputs and outputs are kept as sets of names; nothing
/// here is resolved. Names may point at tasks defined later in the workflow or
/// at things that are never defined at all (external inputs, terminal
/// outputs). Resolution is the job of [`crate::dag::DagBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    name: String,
    command: Option<Vec<String>>,
    parents: BTreeSet<String>,
    children: BTreeSet<String>,
    inputs: BTreeSet<String>,
    outputs: BTreeSet<String>,
}

impl TaskRecord {
    /// A task with the given name and no command or relationships.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            inputs: BTreeSet::new(),
            outputs: BTreeSet::new(),
        }
    }

    pub fn with_command<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = Some(arguments.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.insert(parent.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children.insert(child.into());
        self
    }

    pub fn with_input(mut self, file: impl Into<String>) -> Self {
        self.inputs.insert(file.into());
        self
    }

    pub fn with_output(mut self, file: impl Into<String>) -> Self {
        self.outputs.insert(file.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque argument list; `None` for a no-op task.
    pub fn command(&self) -> Option<&[String]> {
        self.command.as_deref()
    }

    pub fn parents(&self) -> &BTreeSet<String> {
        &self.parents
    }

    pub fn children(&self) -> &BTreeSet<String> {
        &self.children
    }

    pub fn inputs(&self) -> &BTreeSet<String> {
        &self.inputs
    }

    pub fn outputs(&self) -> &BTreeSet<String> {
        &self.outputs
    }
}

impl From<RawTask> for TaskRecord {
    fn from(raw: RawTask) -> Self {
        let mut task = TaskRecord::new(raw.name);
        task.command = raw.command.and_then(|c| c.arguments);
        task.parents.extend(raw.parents);
        task.children.extend(raw.children);

        for file in raw.files {
            match file.link {
                FileLink::Input => {
                    task.inputs.insert(file.name);
                }
                FileLink::Output => {
                    task.outputs.insert(file.name);
                }
                FileLink::Other(link) => {
                    warn!(
                        task = %task.name,
                        file = %file.name,
                        link = %link,
                        "unsupported file link (expected \"input\" or \"output\"); ignoring"
                    );
                }
            }
        }

        task
    }
}
