// src/workflow/model.rs

use serde::Deserialize;

use crate::types::FileLink;

/// Top-level workflow document as read from JSON.
///
/// Only the subset of the WfCommons format needed to build the DAG is mapped:
///
/// ```json
/// {
///   "name": "hello-world-sequence",
///   "workflow": {
///     "tasks": [
///       { "name": "T1", "files": [{ "name": "f1", "link": "output" }] },
///       { "name": "T2", "files": [{ "name": "f1", "link": "input" }] }
///     ]
///   }
/// }
/// ```
///
/// Any other field is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowFile {
    pub name: String,
    pub workflow: RawWorkflowSection,
}

/// The `workflow` object.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowSection {
    #[serde(default)]
    pub tasks: Vec<RawTask>,
}

/// One entry of `workflow.tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTask {
    pub name: String,

    /// Absent means the task only needs its outputs to exist.
    #[serde(default)]
    pub command: Option<RawCommand>,

    #[serde(default)]
    pub parents: Vec<String>,

    /// Spelled `childrens` in the source format; `children` is accepted too.
    #[serde(default, rename = "childrens", alias = "children")]
    pub children: Vec<String>,

    #[serde(default)]
    pub files: Vec<RawFile>,
}

/// `command` object. Only `arguments` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommand {
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

/// One entry of a task's `files` list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    pub name: String,
    pub link: FileLink,
}
